use serde_json::{json, Value};
use tracing::debug;

use sendarr_config::{SettingsStore, TraktAuthPatch};
use sendarr_models::{MediaItemRef, MediaType};
use sendarr_services::trakt;
use sendarr_services::{HttpClient, Transport};

use crate::submit;

/// Message-passing boundary towards the page-context collaborator: an action
/// string plus a JSON payload in, a JSON response object out. Every action
/// reads a fresh settings snapshot, and no internal error ever escapes as
/// anything but `{ok:false, error}`.
pub struct Dispatcher<T: Transport> {
    http: HttpClient<T>,
    store: SettingsStore,
}

fn err_response(error: impl std::fmt::Display) -> Value {
    json!({ "ok": false, "error": error.to_string() })
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(http: HttpClient<T>, store: SettingsStore) -> Self {
        Self { http, store }
    }

    pub async fn handle(&self, action: &str, payload: Value) -> Value {
        debug!(action, "dispatching");
        match action {
            "resolveIds" => self.resolve_ids(payload).await,
            "exchangeCode" => self.exchange_code(payload).await,
            "authStatus" => self.auth_status(),
            "fetchLists" => self.fetch_lists().await,
            "addMovie" => self.add(MediaType::Movie, payload).await,
            "addShow" => self.add(MediaType::Show, payload).await,
            _ => err_response("Unknown action."),
        }
    }

    async fn resolve_ids(&self, payload: Value) -> Value {
        let media_type: MediaType = match serde_json::from_value(payload["type"].clone()) {
            Ok(t) => t,
            Err(_) => return err_response("Missing or invalid media type."),
        };
        let slug = match payload["slug"].as_str() {
            Some(slug) if !slug.is_empty() => slug.to_string(),
            _ => return err_response("Missing slug."),
        };

        let settings = self.store.load();
        let client_id = settings.trakt.client_id().to_string();
        if client_id.is_empty() {
            return err_response("Trakt Client ID is not set (Settings).");
        }

        match trakt::resolve_ids(&self.http, &client_id, media_type, &slug).await {
            Ok(resolved) => json!({
                "ok": true,
                "ids": resolved.ids,
                "title": resolved.title,
                "year": resolved.year,
            }),
            Err(e) => err_response(e),
        }
    }

    async fn exchange_code(&self, payload: Value) -> Value {
        let settings = self.store.load();
        let client_id = settings.trakt.client_id().to_string();
        let client_secret = settings.trakt.client_secret().to_string();
        if client_id.is_empty() || client_secret.is_empty() {
            return err_response("Set Trakt Client ID and Client Secret in Settings first.");
        }
        let code = payload["code"].as_str().unwrap_or("").trim().to_string();
        if code.is_empty() {
            return err_response("Missing authorization code.");
        }

        let token = match trakt::exchange_code(&self.http, &client_id, &client_secret, &code).await
        {
            Ok(token) => token,
            Err(e) => return err_response(e),
        };
        if let Err(e) = self.store.patch_trakt_auth(TraktAuthPatch {
            access_token: Some(token.access_token.clone()),
            refresh_token: Some(token.refresh_token.clone()),
            token_created_at: token.created_at,
            token_expires_in: token.expires_in,
            username: None,
        }) {
            return err_response(e);
        }

        let username =
            match trakt::current_user_slug(&self.http, &client_id, &token.access_token).await {
                Ok(username) => username,
                Err(e) => return err_response(e),
            };
        if let Err(e) = self.store.patch_trakt_auth(TraktAuthPatch {
            username: Some(username.clone()),
            ..Default::default()
        }) {
            return err_response(e);
        }

        json!({ "ok": true, "username": username })
    }

    fn auth_status(&self) -> Value {
        let trakt_settings = self.store.load().trakt;
        json!({
            "ok": true,
            "authed": trakt_settings.is_authenticated(),
            "username": trakt_settings.username,
        })
    }

    async fn fetch_lists(&self) -> Value {
        let trakt_settings = self.store.load().trakt;
        let client_id = trakt_settings.client_id().to_string();
        if client_id.is_empty() {
            return err_response("Trakt Client ID not set.");
        }
        if !trakt_settings.is_authenticated() {
            return err_response("Trakt is not authenticated yet.");
        }

        match trakt::fetch_lists(
            &self.http,
            &client_id,
            &trakt_settings.access_token,
            &trakt_settings.username,
        )
        .await
        {
            Ok(lists) => json!({ "ok": true, "lists": lists }),
            Err(e) => err_response(e),
        }
    }

    async fn add(&self, media_type: MediaType, mut payload: Value) -> Value {
        // The add actions already imply the type; the payload's own tag, if
        // any, is ignored.
        if let Some(map) = payload.as_object_mut() {
            map.insert(
                "type".to_string(),
                serde_json::to_value(media_type).unwrap_or(Value::Null),
            );
        }
        let item: MediaItemRef = match serde_json::from_value(payload) {
            Ok(item) => item,
            Err(e) => return err_response(format!("Invalid item payload: {}", e)),
        };

        let settings = self.store.load();
        let outcome = match media_type {
            MediaType::Movie => submit::add_movie(&self.http, &settings, &item).await,
            MediaType::Show => submit::add_show(&self.http, &settings, &item).await,
        };
        serde_json::to_value(&outcome).unwrap_or_else(|e| err_response(e))
    }
}
