use reqwest::{StatusCode, header::AUTHORIZATION};

use serde_json::Value;

use crate::error::Error;

use super::{OnExpired, RefreshFuture, SpotifyClient};

const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// A short-lived bearer credential.
///
/// Immutable once built; an expired token is replaced by a new instance,
/// never updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    token: String,
    token_type: String,
}

impl AccessToken {
    /// Creates a token of type `Bearer`.
    pub fn new(token: impl Into<String>) -> Self {
        AccessToken {
            token: token.into(),
            token_type: DEFAULT_TOKEN_TYPE.to_string(),
        }
    }

    /// Creates a token with an explicit type, as reported by the accounts
    /// service in `token_type`.
    pub fn with_type(token: impl Into<String>, token_type: impl Into<String>) -> Self {
        AccessToken {
            token: token.into(),
            token_type: token_type.into(),
        }
    }

    /// The raw token, without its type.
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Value for the `Authorization` header: `"<type> <token>"`.
    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type, self.token)
    }
}

impl SpotifyClient {
    /// Exchanges the configured refresh token for a new access token.
    ///
    /// Sends a `refresh_token` grant to `<accounts-endpoint>/api/token`,
    /// authenticated with the pre-computed basic-auth value.
    ///
    /// # Errors
    ///
    /// - [`Error::Auth`] carrying the upstream `error` value when the body has one
    /// - [`Error::Auth`] `"status <code>"` for any other non-200 answer
    /// - [`Error::Auth`] `"unknown, data unavailable"` for a 200 without a usable token
    /// - [`Error::Transport`] when the request itself fails
    ///
    /// There is no retry at this level.
    pub async fn acquire_access_token(&self) -> Result<AccessToken, Error> {
        let res = self
            .http
            .post(self.config.token_url())
            .header(AUTHORIZATION, format!("Basic {}", self.config.basic_auth()))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", self.config.refresh_token()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.bytes().await?;
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

        interpret_token_response(status, json)
    }

    /// Returns this client's token acquisition as a one-shot refresh callback
    /// for [`SpotifyClient::fetch_protected`].
    pub fn refresh_callback<'a>(&'a self) -> OnExpired<'a> {
        Box::new(move || -> RefreshFuture<'a> {
            Box::pin(async move { self.acquire_access_token().await.map(Some) })
        })
    }
}

/// Reads `error`, `access_token` and `token_type` one by one; other fields
/// of the body are ignored whatever their shape.
fn interpret_token_response(status: StatusCode, json: Value) -> Result<AccessToken, Error> {
    match &json["error"] {
        Value::Null => {}
        Value::String(error) => return Err(Error::Auth(error.clone())),
        error => return Err(Error::Auth(error.to_string())),
    }

    let token = json["access_token"].as_str().unwrap_or_default();
    let token_type = json["token_type"].as_str().unwrap_or_default();

    if status == StatusCode::OK && !token.is_empty() {
        return Ok(match token_type {
            "" => AccessToken::new(token),
            token_type => AccessToken::with_type(token, token_type),
        });
    }

    if status != StatusCode::OK {
        return Err(Error::Auth(format!("status {}", status.as_u16())));
    }
    Err(Error::Auth("unknown, data unavailable".to_string()))
}
