use serde_json::{json, Value};

use sendarr_config::SonarrSettings;
use sendarr_models::{LookupResult, MediaItemRef};

use crate::http::{ApiRequest, HttpClient, HttpError, Transport};

fn api_key_headers(api_key: &str) -> Vec<(String, String)> {
    vec![
        ("Content-Type".to_string(), "application/json".to_string()),
        ("X-Api-Key".to_string(), api_key.to_string()),
    ]
}

/// Search term for the series lookup, by id precedence: a `tvdb:`-prefixed
/// query, then `tmdb:`, then plain text.
pub fn lookup_term(item: &MediaItemRef) -> String {
    if let Some(tvdb) = item.ids.tvdb {
        format!("tvdb:{}", tvdb)
    } else if let Some(tmdb) = item.ids.tmdb {
        format!("tmdb:{}", tmdb)
    } else {
        item.search_term()
    }
}

pub async fn lookup<T: Transport>(
    http: &HttpClient<T>,
    settings: &SonarrSettings,
    item: &MediaItemRef,
) -> Result<Option<LookupResult>, HttpError> {
    let url = format!(
        "{}/api/v3/series/lookup?term={}",
        settings.base_url(),
        urlencoding::encode(&lookup_term(item))
    );
    let body = http
        .request(ApiRequest::get(url).with_headers(api_key_headers(&settings.api_key)))
        .await?;
    Ok(LookupResult::from_body(body))
}

/// Add-request body: candidate record as the base, configured overrides on
/// top, including the show-specific season-folder flag and the optional
/// language profile.
pub fn build_add_body(candidate: &Value, settings: &SonarrSettings) -> Value {
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
    body.insert("seasonFolder".to_string(), json!(settings.season_folder));
    body.insert(
        "addOptions".to_string(),
        json!({ "searchForMissingEpisodes": settings.search_on_add }),
    );
    if let Some(language_profile_id) = settings.language_profile_id {
        body.insert("languageProfileId".to_string(), json!(language_profile_id));
    }
    Value::Object(body)
}

pub async fn add_series<T: Transport>(
    http: &HttpClient<T>,
    settings: &SonarrSettings,
    body: Value,
) -> Result<(), HttpError> {
    let url = format!("{}/api/v3/series", settings.base_url());
    http.request(ApiRequest::post(url, body).with_headers(api_key_headers(&settings.api_key)))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sendarr_models::{ExternalIds, MediaType};

    #[test]
    fn test_lookup_term_precedence() {
        let mut item = MediaItemRef::new(MediaType::Show, "severance");
        item.title = Some("Severance".to_string());
        item.year = Some(2022);
        item.ids = ExternalIds {
            imdb: Some("tt11280740".to_string()),
            tmdb: Some(95396),
            tvdb: Some(371980),
        };
        assert_eq!(lookup_term(&item), "tvdb:371980");

        item.ids.tvdb = None;
        assert_eq!(lookup_term(&item), "tmdb:95396");

        item.ids.tmdb = None;
        assert_eq!(lookup_term(&item), "Severance 2022");

        item.title = None;
        item.year = None;
        assert_eq!(lookup_term(&item), "severance");
    }

    #[test]
    fn test_build_add_body_includes_show_specific_fields() {
        let candidate = serde_json::json!({"title": "Severance", "tvdbId": 371980});
        let mut settings = SonarrSettings {
            root_folder_path: "/tv".to_string(),
            quality_profile_id: Some(6),
            season_folder: false,
            search_on_add: true,
            ..Default::default()
        };

        let body = build_add_body(&candidate, &settings);
        assert_eq!(body["seasonFolder"], false);
        assert_eq!(body["addOptions"]["searchForMissingEpisodes"], true);
        assert!(body.get("languageProfileId").is_none());

        settings.language_profile_id = Some(1);
        let body = build_add_body(&candidate, &settings);
        assert_eq!(body["languageProfileId"], 1);
    }
}
