use serde_json::Value;

use sendarr_models::{ExternalIds, MediaType, ResolvedIds, TraktList};

use crate::http::{ApiRequest, HttpClient, HttpError, Transport};

pub const API_BASE: &str = "https://api.trakt.tv";

/// Headers for app-level endpoints (metadata): client id only.
fn app_headers(client_id: &str) -> Vec<(String, String)> {
    vec![
        ("Content-Type".to_string(), "application/json".to_string()),
        ("trakt-api-version".to_string(), "2".to_string()),
        ("trakt-api-key".to_string(), client_id.to_string()),
    ]
}

/// Headers for user-level endpoints: client id plus bearer token.
fn user_headers(client_id: &str, access_token: &str) -> Vec<(String, String)> {
    let mut headers = app_headers(client_id);
    headers.push((
        "Authorization".to_string(),
        format!("Bearer {}", access_token),
    ));
    headers
}

/// Resolve a canonical slug into the external identifier triplet via the
/// extended metadata record. Absent ids come back as `None`, never omitted.
pub async fn resolve_ids<T: Transport>(
    http: &HttpClient<T>,
    client_id: &str,
    media_type: MediaType,
    slug: &str,
) -> Result<ResolvedIds, HttpError> {
    let kind = match media_type {
        MediaType::Movie => "movies",
        MediaType::Show => "shows",
    };
    let url = format!(
        "{}/{}/{}?extended=full",
        API_BASE,
        kind,
        urlencoding::encode(slug)
    );

    let body = http
        .request(ApiRequest::get(url).with_headers(app_headers(client_id)))
        .await?
        .unwrap_or(Value::Null);

    let ids = body.get("ids").cloned().unwrap_or(Value::Null);
    Ok(ResolvedIds {
        ids: ExternalIds {
            imdb: ids
                .get("imdb")
                .and_then(Value::as_str)
                .map(|s| s.to_string()),
            tmdb: ids.get("tmdb").and_then(Value::as_u64),
            tvdb: ids.get("tvdb").and_then(Value::as_u64),
        },
        title: body
            .get("title")
            .and_then(Value::as_str)
            .map(|s| s.to_string()),
        year: body.get("year").and_then(Value::as_i64),
    })
}

/// Slug of the authenticated user, falling back to the plain username.
pub async fn current_user_slug<T: Transport>(
    http: &HttpClient<T>,
    client_id: &str,
    access_token: &str,
) -> Result<String, HttpError> {
    let url = format!("{}/users/me", API_BASE);
    let body = http
        .request(ApiRequest::get(url).with_headers(user_headers(client_id, access_token)))
        .await?
        .unwrap_or(Value::Null);

    let slug = body
        .pointer("/ids/slug")
        .and_then(Value::as_str)
        .or_else(|| body.get("username").and_then(Value::as_str))
        .unwrap_or_default();
    Ok(slug.to_string())
}

/// Personal lists of the authenticated user, as settings-page summaries.
pub async fn fetch_lists<T: Transport>(
    http: &HttpClient<T>,
    client_id: &str,
    access_token: &str,
    username: &str,
) -> Result<Vec<TraktList>, HttpError> {
    let url = format!(
        "{}/users/{}/lists",
        API_BASE,
        urlencoding::encode(username)
    );
    let body = http
        .request(ApiRequest::get(url).with_headers(user_headers(client_id, access_token)))
        .await?
        .unwrap_or(Value::Null);

    let lists = body
        .as_array()
        .map(|lists| {
            lists
                .iter()
                .map(|l| TraktList {
                    name: l
                        .get("name")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    description: l
                        .get("description")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    privacy: l
                        .get("privacy")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    ids: l.get("ids").cloned().unwrap_or(Value::Null),
                })
                .collect()
        })
        .unwrap_or_default();
    Ok(lists)
}

/// POST items onto a list. `list_id` is an opaque string; the endpoint
/// accepts both a slug and a numeric trakt id.
pub async fn add_list_items<T: Transport>(
    http: &HttpClient<T>,
    client_id: &str,
    access_token: &str,
    username: &str,
    list_id: &str,
    payload: Value,
) -> Result<Option<Value>, HttpError> {
    let url = format!(
        "{}/users/{}/lists/{}/items",
        API_BASE,
        urlencoding::encode(username),
        urlencoding::encode(list_id)
    );
    http.request(
        ApiRequest::post(url, payload).with_headers(user_headers(client_id, access_token)),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::ScriptedTransport;

    #[tokio::test]
    async fn test_resolve_ids_maps_triplet_with_null_gaps() {
        let transport = ScriptedTransport::new();
        transport.push_json(
            200,
            r#"{"title":"Severance","year":2022,"ids":{"trakt":162919,"slug":"severance","tvdb":371980,"imdb":"tt11280740"}}"#,
        );
        let client = HttpClient::new(transport.clone());

        let resolved = resolve_ids(&client, "cid", MediaType::Show, "severance")
            .await
            .unwrap();
        assert_eq!(resolved.ids.imdb.as_deref(), Some("tt11280740"));
        assert_eq!(resolved.ids.tvdb, Some(371980));
        assert_eq!(resolved.ids.tmdb, None);
        assert_eq!(resolved.title.as_deref(), Some("Severance"));
        assert_eq!(resolved.year, Some(2022));

        let requests = transport.requests();
        assert_eq!(
            requests[0].url,
            "https://api.trakt.tv/shows/severance?extended=full"
        );
        assert!(requests[0]
            .headers
            .iter()
            .any(|(k, v)| k == "trakt-api-key" && v == "cid"));
    }

    #[tokio::test]
    async fn test_current_user_prefers_slug() {
        let transport = ScriptedTransport::new();
        transport.push_json(200, r#"{"username":"Some One","ids":{"slug":"some-one"}}"#);
        let client = HttpClient::new(transport);

        let slug = current_user_slug(&client, "cid", "tok").await.unwrap();
        assert_eq!(slug, "some-one");
    }

    #[tokio::test]
    async fn test_fetch_lists_maps_summaries() {
        let transport = ScriptedTransport::new();
        transport.push_json(
            200,
            r#"[{"name":"Watch Soon","privacy":"private","ids":{"trakt":42,"slug":"watch-soon"}}]"#,
        );
        let client = HttpClient::new(transport);

        let lists = fetch_lists(&client, "cid", "tok", "some-one").await.unwrap();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].name, "Watch Soon");
        assert_eq!(lists[0].description, "");
        assert_eq!(lists[0].ids["slug"], "watch-soon");
    }

    #[tokio::test]
    async fn test_add_list_items_url_encodes_list_id() {
        let transport = ScriptedTransport::new();
        transport.push_json(201, r#"{"added":{"movies":1}}"#);
        let client = HttpClient::new(transport.clone());

        add_list_items(
            &client,
            "cid",
            "tok",
            "some-one",
            "watch soon",
            serde_json::json!({"movies":[{"ids":{"tmdb":603}}]}),
        )
        .await
        .unwrap();

        let requests = transport.requests();
        assert_eq!(
            requests[0].url,
            "https://api.trakt.tv/users/some-one/lists/watch%20soon/items"
        );
    }
}
