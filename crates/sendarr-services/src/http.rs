use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Appended to every transport-level failure. A refused connection and a
/// blocked host look identical at this layer, so the remediation hint covers
/// both.
pub const CONNECTIVITY_HINT: &str =
    "Check the service URL in Settings and that sendarr can reach it from this machine.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            headers: Vec::new(),
            body: Some(body),
        }
    }

    pub fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = headers;
        self
    }
}

/// Raw transport response, prior to any JSON interpretation.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Error)]
pub enum HttpError {
    /// Network failure or the request never leaving the machine; the two are
    /// indistinguishable here.
    #[error("{message}. {}", CONNECTIVITY_HINT)]
    Transport { message: String },

    /// Non-2xx response with a human-readable message extracted from the
    /// body. `body` keeps the parsed JSON (or the raw text) for diagnostics.
    #[error("{message}")]
    Status {
        status: u16,
        message: String,
        body: Value,
    },
}

/// Transport seam under the JSON client. The production implementation is
/// reqwest; tests script responses through it instead of mocking a server.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, HttpError>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("sendarr/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, HttpError> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| HttpError::Transport {
            message: e.to_string(),
        })?;
        let status = response.status();
        let body = response.text().await.map_err(|e| HttpError::Transport {
            message: e.to_string(),
        })?;

        Ok(RawResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            body,
        })
    }
}

/// Uniform JSON request wrapper: transport and non-2xx failures come back as
/// `HttpError` with a display-ready message; success yields the parsed body,
/// `None` when the body is empty or not JSON.
pub struct HttpClient<T: Transport> {
    transport: T,
}

impl<T: Transport> HttpClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn request(&self, request: ApiRequest) -> Result<Option<Value>, HttpError> {
        debug!(url = %request.url, "issuing request");
        let response = self.transport.execute(request).await?;

        let parsed: Option<Value> = if response.body.trim().is_empty() {
            None
        } else {
            serde_json::from_str(&response.body).ok()
        };

        if !response.is_success() {
            let message = extract_human_message(
                parsed.as_ref(),
                &response.body,
                response.status,
                &response.status_text,
            );
            let body = parsed.unwrap_or_else(|| Value::String(response.body.clone()));
            return Err(HttpError::Status {
                status: response.status,
                message,
                body,
            });
        }

        Ok(parsed)
    }
}

/// Collect `errorMessage`/`message` strings from an array of error objects,
/// de-duplicated in order.
fn pull_error_messages(items: &[Value]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for item in items {
        let message = item
            .get("errorMessage")
            .and_then(Value::as_str)
            .or_else(|| item.get("message").and_then(Value::as_str));
        if let Some(message) = message {
            if !message.is_empty() && seen.insert(message.to_string()) {
                out.push(message.to_string());
            }
        }
    }
    out
}

/// Extract a single display-ready message from an error response.
///
/// Precedence: joined validation messages (body array or `errors` array) >
/// string `message` field > string `error` field > raw body text > status
/// line. Radarr/Sonarr validation failures arrive as arrays of
/// `{propertyName, errorMessage, ...}` objects.
pub(crate) fn extract_human_message(
    json: Option<&Value>,
    text: &str,
    status: u16,
    status_text: &str,
) -> String {
    if let Some(Value::Array(items)) = json {
        let messages = pull_error_messages(items);
        if !messages.is_empty() {
            return messages.join(" / ");
        }
    }
    if let Some(Value::Object(map)) = json {
        if let Some(Value::Array(errors)) = map.get("errors") {
            let messages = pull_error_messages(errors);
            if !messages.is_empty() {
                return messages.join(" / ");
            }
        }
        if let Some(message) = map.get("message").and_then(Value::as_str) {
            if !message.trim().is_empty() {
                return message.to_string();
            }
        }
        if let Some(error) = map.get("error").and_then(Value::as_str) {
            if !error.trim().is_empty() {
                return error.to_string();
            }
        }
    }
    if !text.trim().is_empty() {
        return text.to_string();
    }
    format!("{} {}", status, status_text)
}

pub mod testing {
    //! Scripted transport for tests: replays queued responses in order and
    //! records every request, so call counts and URLs can be asserted
    //! without a network.

    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    pub struct ScriptedTransport {
        responses: Arc<Mutex<VecDeque<Result<RawResponse, HttpError>>>>,
        requests: Arc<Mutex<Vec<ApiRequest>>>,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_json(&self, status: u16, body: &str) {
            self.push_response(RawResponse {
                status,
                status_text: String::new(),
                body: body.to_string(),
            });
        }

        pub fn push_response(&self, response: RawResponse) {
            self.responses.lock().unwrap().push_back(Ok(response));
        }

        pub fn push_transport_error(&self, message: &str) {
            self.responses
                .lock()
                .unwrap()
                .push_back(Err(HttpError::Transport {
                    message: message.to_string(),
                }));
        }

        pub fn call_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        pub fn requests(&self) -> Vec<ApiRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn execute(&self, request: ApiRequest) -> Result<RawResponse, HttpError> {
            self.requests.lock().unwrap().push(request);
            self.responses.lock().unwrap().pop_front().unwrap_or(Ok(RawResponse {
                status: 200,
                status_text: "OK".to_string(),
                body: String::new(),
            }))
        }
    }
}
