use serde_json::{json, Value};

use crate::http::{ApiRequest, HttpClient, HttpError, Transport};

/// Fixed out-of-band redirect: the user copies the authorization code from
/// the browser instead of a callback.
pub const REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";
pub const TOKEN_URL: &str = "https://api.trakt.tv/oauth/token";
pub const AUTHORIZE_URL: &str = "https://trakt.tv/oauth/authorize";

#[derive(Debug, Clone)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub created_at: Option<i64>,
    pub expires_in: Option<i64>,
}

/// Exchange an authorization code for tokens (authorization_code grant).
/// There is no refresh-before-expiry; a new exchange is the only way to
/// replace an expired token.
pub async fn exchange_code<T: Transport>(
    http: &HttpClient<T>,
    client_id: &str,
    client_secret: &str,
    code: &str,
) -> Result<TokenResponse, HttpError> {
    let payload = json!({
        "code": code.trim(),
        "client_id": client_id,
        "client_secret": client_secret,
        "redirect_uri": REDIRECT_URI,
        "grant_type": "authorization_code"
    });

    let body = http
        .request(
            ApiRequest::post(TOKEN_URL, payload)
                .with_headers(vec![("Content-Type".to_string(), "application/json".to_string())]),
        )
        .await?
        .unwrap_or(Value::Null);

    Ok(TokenResponse {
        access_token: body
            .get("access_token")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        refresh_token: body
            .get("refresh_token")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        created_at: body.get("created_at").and_then(Value::as_i64),
        expires_in: body.get("expires_in").and_then(Value::as_i64),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::ScriptedTransport;
    use crate::http::Method;

    #[tokio::test]
    async fn test_exchange_posts_authorization_code_grant() {
        let transport = ScriptedTransport::new();
        transport.push_json(
            200,
            r#"{"access_token":"at","refresh_token":"rt","created_at":1700000000,"expires_in":7776000}"#,
        );
        let client = HttpClient::new(transport.clone());

        let token = exchange_code(&client, "cid", "secret", " code \n")
            .await
            .unwrap();
        assert_eq!(token.access_token, "at");
        assert_eq!(token.created_at, Some(1_700_000_000));

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(requests[0].url, TOKEN_URL);
        let body = requests[0].body.as_ref().unwrap();
        assert_eq!(body["code"], "code");
        assert_eq!(body["grant_type"], "authorization_code");
        assert_eq!(body["redirect_uri"], REDIRECT_URI);
    }
}
