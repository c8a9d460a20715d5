use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Merged settings snapshot. Every group and every field carries a serde
/// default, so a partial or missing settings file always deserializes into
/// the full defaults+stored shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub trakt: TraktSettings,
    #[serde(default)]
    pub radarr: RadarrSettings,
    #[serde(default)]
    pub sonarr: SonarrSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TraktSettings {
    pub client_id: String,
    pub client_secret: String,
    pub access_token: String,
    pub refresh_token: String,
    pub token_created_at: Option<i64>,
    pub token_expires_in: Option<i64>,
    pub username: String,
    pub auto_add: bool,
    /// Trakt list `ids.slug` or numeric `ids.trakt`; the endpoint accepts
    /// either, so it is stored as an opaque string.
    pub list_id: String,
}

impl Default for TraktSettings {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            access_token: String::new(),
            refresh_token: String::new(),
            token_created_at: None,
            token_expires_in: None,
            username: String::new(),
            auto_add: false,
            list_id: String::new(),
        }
    }
}

impl TraktSettings {
    pub fn client_id(&self) -> &str {
        self.client_id.trim()
    }

    pub fn client_secret(&self) -> &str {
        self.client_secret.trim()
    }

    /// Authenticated means an access token and a username are both present.
    /// Tokens are never invalidated automatically; a new exchange overwrites.
    pub fn is_authenticated(&self) -> bool {
        !self.access_token.is_empty() && !self.username.is_empty()
    }

    /// Expiry instant derived from the token response, when both fields were
    /// recorded. Informational only; there is no refresh-before-expiry.
    pub fn token_expires_at(&self) -> Option<DateTime<Utc>> {
        let created = self.token_created_at?;
        let expires_in = self.token_expires_in?;
        Utc.timestamp_opt(created + expires_in, 0).single()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RadarrSettings {
    pub url: String,
    pub api_key: String,
    pub root_folder_path: String,
    pub quality_profile_id: Option<i64>,
    pub monitored: bool,
    pub search_on_add: bool,
}

impl Default for RadarrSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:7878".to_string(),
            api_key: String::new(),
            root_folder_path: String::new(),
            quality_profile_id: None,
            monitored: true,
            search_on_add: true,
        }
    }
}

impl RadarrSettings {
    pub fn base_url(&self) -> String {
        clean_base_url(&self.url)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SonarrSettings {
    pub url: String,
    pub api_key: String,
    pub root_folder_path: String,
    pub quality_profile_id: Option<i64>,
    pub language_profile_id: Option<i64>,
    pub season_folder: bool,
    pub monitored: bool,
    pub search_on_add: bool,
}

impl Default for SonarrSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:8989".to_string(),
            api_key: String::new(),
            root_folder_path: String::new(),
            quality_profile_id: None,
            language_profile_id: None,
            season_folder: true,
            monitored: true,
            search_on_add: true,
        }
    }
}

impl SonarrSettings {
    pub fn base_url(&self) -> String {
        clean_base_url(&self.url)
    }
}

/// Strip trailing slashes so endpoint paths can be appended directly.
pub fn clean_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
