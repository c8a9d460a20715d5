use serde_json::Value;
use tracing::info;

use sendarr_config::Settings;
use sendarr_models::{AddOutcome, LookupResult, MediaItemRef, MediaType};
use sendarr_services::{radarr, sonarr, HttpClient, Transport};

use crate::error::AddError;
use crate::list_add::{self, ListAddResult};
use crate::picker::pick_best_by_year;

/// Submit a movie to Radarr. Never fails across this boundary; every
/// internal error is flattened into the outcome.
pub async fn add_movie<T: Transport>(
    http: &HttpClient<T>,
    settings: &Settings,
    item: &MediaItemRef,
) -> AddOutcome {
    match submit_movie(http, settings, item).await {
        Ok(message) => AddOutcome::success(message),
        Err(e) => AddOutcome::failure(e.to_string()),
    }
}

/// Submit a show to Sonarr. Same contract as `add_movie`.
pub async fn add_show<T: Transport>(
    http: &HttpClient<T>,
    settings: &Settings,
    item: &MediaItemRef,
) -> AddOutcome {
    match submit_show(http, settings, item).await {
        Ok(message) => AddOutcome::success(message),
        Err(e) => AddOutcome::failure(e.to_string()),
    }
}

async fn submit_movie<T: Transport>(
    http: &HttpClient<T>,
    settings: &Settings,
    item: &MediaItemRef,
) -> Result<String, AddError> {
    let r = &settings.radarr;
    if r.base_url().is_empty() || r.api_key.trim().is_empty() {
        return Err(AddError::Config(
            "Radarr URL/API key not set. Open Settings.".to_string(),
        ));
    }
    if r.root_folder_path.trim().is_empty() || r.quality_profile_id.is_none() {
        return Err(AddError::Config(
            "Radarr root folder / quality profile not set. Open Settings and click Fetch."
                .to_string(),
        ));
    }

    let result = radarr::lookup(http, r, item).await?;
    let movie = select_candidate(result, item.year)
        .ok_or_else(|| AddError::NoMatch("Radarr lookup returned no matches.".to_string()))?;

    let body = radarr::build_add_body(&movie, r);
    radarr::add_movie(http, r, body).await?;
    info!(slug = %item.slug, "movie submitted to Radarr");

    let list = list_add::add_to_list(http, &settings.trakt, MediaType::Movie, &item.ids).await;
    Ok(compose_message(MediaType::Movie, "Radarr", list))
}

async fn submit_show<T: Transport>(
    http: &HttpClient<T>,
    settings: &Settings,
    item: &MediaItemRef,
) -> Result<String, AddError> {
    let s = &settings.sonarr;
    if s.base_url().is_empty() || s.api_key.trim().is_empty() {
        return Err(AddError::Config(
            "Sonarr URL/API key not set. Open Settings.".to_string(),
        ));
    }
    if s.root_folder_path.trim().is_empty() || s.quality_profile_id.is_none() {
        return Err(AddError::Config(
            "Sonarr root folder / quality profile not set. Open Settings and click Fetch."
                .to_string(),
        ));
    }

    let result = sonarr::lookup(http, s, item).await?;
    let series = select_candidate(result, item.year)
        .ok_or_else(|| AddError::NoMatch("Sonarr lookup returned no matches.".to_string()))?;

    let body = sonarr::build_add_body(&series, s);
    sonarr::add_series(http, s, body).await?;
    info!(slug = %item.slug, "show submitted to Sonarr");

    let list = list_add::add_to_list(http, &settings.trakt, MediaType::Show, &item.ids).await;
    Ok(compose_message(MediaType::Show, "Sonarr", list))
}

/// A list response goes through the year picker; a single-object response
/// (Radarr's by-id lookups) is used directly.
fn select_candidate(result: Option<LookupResult>, expected_year: Option<i64>) -> Option<Value> {
    match result? {
        LookupResult::List(items) => pick_best_by_year(&items, expected_year).cloned(),
        LookupResult::Single(candidate) => Some(candidate),
    }
}

/// Fold the best-effort list append into the success message: skipped stays
/// silent, success gets a suffix, failure becomes a trailing parenthetical.
fn compose_message(media_type: MediaType, service: &str, list: ListAddResult) -> String {
    let noun = media_type.noun();
    match list {
        ListAddResult::Skipped => format!("{} sent to {}.", noun, service),
        ListAddResult::Added => format!("{} sent to {} + added to Trakt list.", noun, service),
        ListAddResult::Failed(error) => {
            format!("{} sent to {}. (Trakt list: {})", noun, service, error)
        }
    }
}
