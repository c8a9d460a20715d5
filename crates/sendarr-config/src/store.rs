use anyhow::Result;
use std::path::PathBuf;
use tracing::warn;

use crate::settings::{RadarrSettings, Settings, SonarrSettings, TraktSettings};

/// TOML-backed settings store. Reads always succeed with a merged
/// defaults+stored snapshot; writes happen at trakt/radarr/sonarr group
/// granularity (read-modify-write of the whole file, last write wins per
/// group).
pub struct SettingsStore {
    path: PathBuf,
}

/// Partial update for the authentication-derived Trakt fields. Unset fields
/// are left untouched; user-supplied fields (client id/secret, auto-add,
/// list selection) are never written through this path.
#[derive(Debug, Clone, Default)]
pub struct TraktAuthPatch {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub token_created_at: Option<i64>,
    pub token_expires_in: Option<i64>,
    pub username: Option<String>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the current snapshot. Never fails: a missing, unreadable, or
    /// corrupt file yields the defaults (with a warning for the latter two).
    pub fn load(&self) -> Settings {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Settings::default(),
            Err(e) => {
                warn!("Failed to read settings file {:?}: {}", self.path, e);
                return Settings::default();
            }
        };
        match toml::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Failed to parse settings file {:?}: {}", self.path, e);
                Settings::default()
            }
        }
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(settings)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn set_trakt(&self, trakt: TraktSettings) -> Result<Settings> {
        let mut settings = self.load();
        settings.trakt = trakt;
        self.save(&settings)?;
        Ok(settings)
    }

    pub fn set_radarr(&self, radarr: RadarrSettings) -> Result<Settings> {
        let mut settings = self.load();
        settings.radarr = radarr;
        self.save(&settings)?;
        Ok(settings)
    }

    pub fn set_sonarr(&self, sonarr: SonarrSettings) -> Result<Settings> {
        let mut settings = self.load();
        settings.sonarr = sonarr;
        self.save(&settings)?;
        Ok(settings)
    }

    /// Apply a partial update to the auth-derived Trakt fields, preserving
    /// everything else in the group.
    pub fn patch_trakt_auth(&self, patch: TraktAuthPatch) -> Result<TraktSettings> {
        let mut settings = self.load();
        if let Some(access_token) = patch.access_token {
            settings.trakt.access_token = access_token;
        }
        if let Some(refresh_token) = patch.refresh_token {
            settings.trakt.refresh_token = refresh_token;
        }
        if let Some(created_at) = patch.token_created_at {
            settings.trakt.token_created_at = Some(created_at);
        }
        if let Some(expires_in) = patch.token_expires_in {
            settings.trakt.token_expires_in = Some(expires_in);
        }
        if let Some(username) = patch.username {
            settings.trakt.username = username;
        }
        self.save(&settings)?;
        Ok(settings.trakt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SettingsStore {
        SettingsStore::new(dir.path().join("settings.toml"))
    }

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = store_in(&dir).load();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_corrupt_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "not valid toml [[[").unwrap();
        let settings = SettingsStore::new(path).load();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_group_write_preserves_other_groups() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let radarr = RadarrSettings {
            api_key: "radarr-key".to_string(),
            ..Default::default()
        };
        store.set_radarr(radarr).unwrap();

        let sonarr = SonarrSettings {
            api_key: "sonarr-key".to_string(),
            ..Default::default()
        };
        store.set_sonarr(sonarr).unwrap();

        let settings = store.load();
        assert_eq!(settings.radarr.api_key, "radarr-key");
        assert_eq!(settings.sonarr.api_key, "sonarr-key");
    }

    #[test]
    fn test_patch_trakt_auth_preserves_user_fields() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let trakt = TraktSettings {
            client_id: "cid".to_string(),
            client_secret: "secret".to_string(),
            auto_add: true,
            list_id: "my-list".to_string(),
            ..Default::default()
        };
        store.set_trakt(trakt).unwrap();

        let updated = store
            .patch_trakt_auth(TraktAuthPatch {
                access_token: Some("tok".to_string()),
                refresh_token: Some("ref".to_string()),
                token_created_at: Some(1_700_000_000),
                token_expires_in: Some(7_776_000),
                username: None,
            })
            .unwrap();

        assert_eq!(updated.client_id, "cid");
        assert_eq!(updated.client_secret, "secret");
        assert!(updated.auto_add);
        assert_eq!(updated.list_id, "my-list");
        assert_eq!(updated.access_token, "tok");
        assert_eq!(updated.username, "");

        // Second patch fills the username without clobbering tokens
        let updated = store
            .patch_trakt_auth(TraktAuthPatch {
                username: Some("someone".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(updated.access_token, "tok");
        assert_eq!(updated.username, "someone");
    }
}
