use serde_json::json;
use tracing::{debug, warn};

use sendarr_config::TraktSettings;
use sendarr_models::{ExternalIds, MediaType};
use sendarr_services::trakt;
use sendarr_services::{HttpClient, Transport};

/// Outcome of the best-effort list append. `Skipped` covers the
/// not-configured cases and is success from the caller's point of view;
/// `Failed` means auto-add was on but the append could not happen. Neither
/// ever escalates into the parent operation's failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListAddResult {
    Added,
    Skipped,
    Failed(String),
}

/// Append an item to the configured Trakt list, best-effort.
pub async fn add_to_list<T: Transport>(
    http: &HttpClient<T>,
    trakt_settings: &TraktSettings,
    media_type: MediaType,
    ids: &ExternalIds,
) -> ListAddResult {
    if !trakt_settings.auto_add {
        return ListAddResult::Skipped;
    }
    let client_id = trakt_settings.client_id();
    if client_id.is_empty() {
        return ListAddResult::Skipped;
    }
    if !trakt_settings.is_authenticated() {
        return ListAddResult::Failed("Trakt auto-add enabled but not authenticated.".to_string());
    }
    if trakt_settings.list_id.is_empty() {
        return ListAddResult::Failed("Trakt auto-add enabled but no list selected.".to_string());
    }

    let mut item_ids = serde_json::Map::new();
    match media_type {
        MediaType::Movie => {
            if let Some(tmdb) = ids.tmdb {
                item_ids.insert("tmdb".to_string(), json!(tmdb));
            }
            if let Some(imdb) = ids.imdb.as_deref() {
                item_ids.insert("imdb".to_string(), json!(imdb));
            }
        }
        MediaType::Show => {
            if let Some(tvdb) = ids.tvdb {
                item_ids.insert("tvdb".to_string(), json!(tvdb));
            }
            if let Some(tmdb) = ids.tmdb {
                item_ids.insert("tmdb".to_string(), json!(tmdb));
            }
            if let Some(imdb) = ids.imdb.as_deref() {
                item_ids.insert("imdb".to_string(), json!(imdb));
            }
        }
    }
    if item_ids.is_empty() {
        return ListAddResult::Failed(format!(
            "No suitable IDs to add {} to Trakt list.",
            media_type.noun_lower()
        ));
    }

    let key = match media_type {
        MediaType::Movie => "movies",
        MediaType::Show => "shows",
    };
    let payload = json!({ key: [{ "ids": item_ids }] });

    match trakt::add_list_items(
        http,
        client_id,
        &trakt_settings.access_token,
        &trakt_settings.username,
        &trakt_settings.list_id,
        payload,
    )
    .await
    {
        Ok(_) => {
            debug!(list_id = %trakt_settings.list_id, "item appended to Trakt list");
            ListAddResult::Added
        }
        Err(e) => {
            warn!("Trakt list append failed: {}", e);
            ListAddResult::Failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sendarr_services::http::testing::ScriptedTransport;

    fn enabled_settings() -> TraktSettings {
        TraktSettings {
            client_id: "cid".to_string(),
            access_token: "tok".to_string(),
            username: "some-one".to_string(),
            auto_add: true,
            list_id: "watch-soon".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_auto_add_disabled_always_skips() {
        let transport = ScriptedTransport::new();
        let client = HttpClient::new(transport.clone());
        // Everything else missing too; disabled still means silent skip.
        let settings = TraktSettings::default();

        let result = add_to_list(&client, &settings, MediaType::Movie, &ExternalIds::new()).await;
        assert_eq!(result, ListAddResult::Skipped);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_client_id_skips_silently() {
        let transport = ScriptedTransport::new();
        let client = HttpClient::new(transport.clone());
        let settings = TraktSettings {
            auto_add: true,
            ..Default::default()
        };

        let result = add_to_list(&client, &settings, MediaType::Movie, &ExternalIds::new()).await;
        assert_eq!(result, ListAddResult::Skipped);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_enabled_but_unauthenticated_fails() {
        let transport = ScriptedTransport::new();
        let client = HttpClient::new(transport.clone());
        let settings = TraktSettings {
            client_id: "cid".to_string(),
            auto_add: true,
            ..Default::default()
        };

        let result = add_to_list(&client, &settings, MediaType::Show, &ExternalIds::new()).await;
        assert_eq!(
            result,
            ListAddResult::Failed("Trakt auto-add enabled but not authenticated.".to_string())
        );
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_no_usable_ids_fails() {
        let transport = ScriptedTransport::new();
        let client = HttpClient::new(transport.clone());
        // A movie cannot be listed by tvdb id alone.
        let ids = ExternalIds {
            tvdb: Some(371980),
            ..Default::default()
        };

        let result = add_to_list(&client, &enabled_settings(), MediaType::Movie, &ids).await;
        assert_eq!(
            result,
            ListAddResult::Failed("No suitable IDs to add movie to Trakt list.".to_string())
        );
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_show_payload_carries_all_id_types() {
        let transport = ScriptedTransport::new();
        transport.push_json(201, r#"{"added":{"shows":1}}"#);
        let client = HttpClient::new(transport.clone());
        let ids = ExternalIds {
            imdb: Some("tt11280740".to_string()),
            tmdb: Some(95396),
            tvdb: Some(371980),
        };

        let result = add_to_list(&client, &enabled_settings(), MediaType::Show, &ids).await;
        assert_eq!(result, ListAddResult::Added);

        let requests = transport.requests();
        let body = requests[0].body.as_ref().unwrap();
        assert_eq!(body["shows"][0]["ids"]["tvdb"], 371980);
        assert_eq!(body["shows"][0]["ids"]["tmdb"], 95396);
        assert_eq!(body["shows"][0]["ids"]["imdb"], "tt11280740");
    }

    #[tokio::test]
    async fn test_endpoint_failure_becomes_failed_result() {
        let transport = ScriptedTransport::new();
        transport.push_json(404, r#"{"error":"list not found"}"#);
        let client = HttpClient::new(transport);
        let ids = ExternalIds {
            tmdb: Some(603),
            ..Default::default()
        };

        let result = add_to_list(&client, &enabled_settings(), MediaType::Movie, &ids).await;
        assert_eq!(result, ListAddResult::Failed("list not found".to_string()));
    }
}
