use serde_json::{json, Value};

use sendarr_config::RadarrSettings;
use sendarr_models::{LookupResult, MediaItemRef};

use crate::http::{ApiRequest, HttpClient, HttpError, Transport};

fn api_key_headers(api_key: &str) -> Vec<(String, String)> {
    vec![
        ("Content-Type".to_string(), "application/json".to_string()),
        ("X-Api-Key".to_string(), api_key.to_string()),
    ]
}

/// Lookup endpoint for a movie, by id precedence: tmdb > imdb > text term.
/// The by-id lookups return a single object; the term lookup returns a list.
pub fn lookup_url(base: &str, item: &MediaItemRef) -> String {
    if let Some(tmdb) = item.ids.tmdb {
        format!("{}/api/v3/movie/lookup/tmdb?tmdbid={}", base, tmdb)
    } else if let Some(imdb) = item.ids.imdb.as_deref() {
        format!(
            "{}/api/v3/movie/lookup/imdb?imdbid={}",
            base,
            urlencoding::encode(imdb)
        )
    } else {
        format!(
            "{}/api/v3/movie/lookup?term={}",
            base,
            urlencoding::encode(&item.search_term())
        )
    }
}

pub async fn lookup<T: Transport>(
    http: &HttpClient<T>,
    settings: &RadarrSettings,
    item: &MediaItemRef,
) -> Result<Option<LookupResult>, HttpError> {
    let url = lookup_url(&settings.base_url(), item);
    let body = http
        .request(ApiRequest::get(url).with_headers(api_key_headers(&settings.api_key)))
        .await?;
    Ok(LookupResult::from_body(body))
}

/// Add-request body: the full candidate record as the base, configured
/// overrides on top (overrides win on key collision).
pub fn build_add_body(candidate: &Value, settings: &RadarrSettings) -> Value {
    let mut body = candidate.as_object().cloned().unwrap_or_default();
    body.insert(
        "qualityProfileId".to_string(),
        json!(settings.quality_profile_id.unwrap_or_default()),
    );
    body.insert(
        "rootFolderPath".to_string(),
        json!(settings.root_folder_path),
    );
    body.insert("monitored".to_string(), json!(settings.monitored));
    body.insert(
        "addOptions".to_string(),
        json!({ "searchForMovie": settings.search_on_add }),
    );
    Value::Object(body)
}

pub async fn add_movie<T: Transport>(
    http: &HttpClient<T>,
    settings: &RadarrSettings,
    body: Value,
) -> Result<(), HttpError> {
    let url = format!("{}/api/v3/movie", settings.base_url());
    http.request(ApiRequest::post(url, body).with_headers(api_key_headers(&settings.api_key)))
        .await?;
    Ok(())
}
