use std::{fmt, future::Future, pin::Pin};

use reqwest::{StatusCode, header::AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{error::Error, types::ApiErrorResponse, utils, warning};

use super::{AccessToken, SpotifyClient};

/// Future produced by a refresh callback: a replacement token, nothing, or
/// the error that prevented minting one.
pub type RefreshFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Option<AccessToken>, Error>> + Send + 'a>>;

/// Refresh callback handed to [`SpotifyClient::fetch_protected`].
///
/// `FnOnce`: it can be called at most once per fetch chain.
pub type OnExpired<'a> = Box<dyn FnOnce() -> RefreshFuture<'a> + Send + 'a>;

/// Protected Web API resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    CurrentlyPlaying,
    RecentlyPlayed,
    /// Full track object by Spotify ID.
    Track(String),
}

impl Endpoint {
    /// Path below the Web API base URL.
    ///
    /// # Example
    ///
    /// ```
    /// assert_eq!(Endpoint::Track("abc".into()).path(), "/v1/tracks/abc");
    /// ```
    pub fn path(&self) -> String {
        match self {
            Endpoint::CurrentlyPlaying => "/v1/me/player/currently-playing".to_string(),
            Endpoint::RecentlyPlayed => "/v1/me/player/recently-played".to_string(),
            Endpoint::Track(id) => format!("/v1/tracks/{}", id),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::CurrentlyPlaying => write!(f, "currently playing"),
            Endpoint::RecentlyPlayed => write!(f, "recently played"),
            Endpoint::Track(id) => write!(f, "track {}", id),
        }
    }
}

/// Result of a protected fetch.
///
/// `Absent` means "no data, and not an error": the resource is empty, no
/// token was available, or the token expired and could not be replaced.
#[derive(Debug)]
pub enum FetchOutcome<T> {
    Present(T),
    Absent,
    Failed(Error),
}

impl<T> FetchOutcome<T> {
    /// `true` for [`FetchOutcome::Present`].
    pub fn is_present(&self) -> bool {
        matches!(self, FetchOutcome::Present(_))
    }

    /// `true` for [`FetchOutcome::Absent`]; a failure is not absent.
    pub fn is_absent(&self) -> bool {
        matches!(self, FetchOutcome::Absent)
    }

    /// Collapses the outcome into the usual `Result<Option<T>>` shape.
    pub fn into_result(self) -> Result<Option<T>, Error> {
        match self {
            FetchOutcome::Present(data) => Ok(Some(data)),
            FetchOutcome::Absent => Ok(None),
            FetchOutcome::Failed(err) => Err(err),
        }
    }
}

/// One GET, classified.
enum Attempt<T> {
    Done(FetchOutcome<T>),
    Expired,
}

impl SpotifyClient {
    /// Performs an authenticated GET against `endpoint`.
    ///
    /// # Outcomes
    ///
    /// - no `access_token`: [`FetchOutcome::Absent`], without any request
    /// - 200 with a meaningful body: [`FetchOutcome::Present`]
    /// - 204, or 200 with an empty body (or an array of at most one element):
    ///   [`FetchOutcome::Absent`]
    /// - any other 2xx: [`FetchOutcome::Failed`] with [`Error::UnknownResponse`]
    /// - an error body whose `error.status` is 300 or more is taken as an
    ///   expired token: `on_expired` is invoked once and the request is repeated
    ///   with the new token and no callback; without a callback, or if the
    ///   repeated request expires too, the result is [`FetchOutcome::Absent`]
    /// - everything else (transport failure, other error statuses, a failing
    ///   callback): [`FetchOutcome::Failed`]
    pub async fn fetch_protected<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        access_token: Option<AccessToken>,
        on_expired: Option<OnExpired<'_>>,
    ) -> FetchOutcome<T> {
        let Some(token) = access_token else {
            return FetchOutcome::Absent;
        };

        match self.attempt(endpoint, &token).await {
            Attempt::Done(outcome) => return outcome,
            Attempt::Expired => {}
        }

        let Some(refresh) = on_expired else {
            warning!("Access token expired while fetching {}.", endpoint);
            return FetchOutcome::Absent;
        };

        warning!("Access token expired while fetching {}, refreshing once.", endpoint);
        let token = match refresh().await {
            Ok(Some(token)) => token,
            Ok(None) => return FetchOutcome::Absent,
            Err(err) => return FetchOutcome::Failed(err),
        };

        match self.attempt(endpoint, &token).await {
            Attempt::Done(outcome) => outcome,
            Attempt::Expired => {
                warning!("Refreshed access token was refused for {}.", endpoint);
                FetchOutcome::Absent
            }
        }
    }

    async fn attempt<T: DeserializeOwned>(&self, endpoint: &Endpoint, token: &AccessToken) -> Attempt<T> {
        let url = format!("{}{}", self.config.api_endpoint(), endpoint.path());
        let response = match self
            .http
            .get(&url)
            .header(AUTHORIZATION, token.authorization_header())
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(err) => return Attempt::Done(FetchOutcome::Failed(err.into())),
        };

        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(err) => return Attempt::Done(FetchOutcome::Failed(err.into())),
        };

        classify(endpoint, status, &body)
    }
}

fn classify<T: DeserializeOwned>(endpoint: &Endpoint, status: StatusCode, body: &[u8]) -> Attempt<T> {
    if status.is_success() {
        if status != StatusCode::OK {
            return Attempt::Done(match status {
                StatusCode::NO_CONTENT => FetchOutcome::Absent,
                _ => FetchOutcome::Failed(Error::UnknownResponse(format!(
                    "{} request error: unexpected status {}",
                    endpoint, status
                ))),
            });
        }

        let data: Value = if body.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            match serde_json::from_slice(body) {
                Ok(data) => data,
                Err(err) => {
                    return Attempt::Done(FetchOutcome::Failed(Error::UnknownResponse(format!(
                        "{} request error: {}",
                        endpoint, err
                    ))));
                }
            }
        };

        if !utils::is_data_available(status.as_u16(), &data) {
            return Attempt::Done(FetchOutcome::Absent);
        }

        return Attempt::Done(match serde_json::from_value(data) {
            Ok(data) => FetchOutcome::Present(data),
            Err(err) => FetchOutcome::Failed(Error::UnknownResponse(format!(
                "{} request error: {}",
                endpoint, err
            ))),
        });
    }

    match serde_json::from_slice::<ApiErrorResponse>(body) {
        Ok(api_error) if api_error.error.status >= 300 => Attempt::Expired,
        Ok(api_error) => Attempt::Done(FetchOutcome::Failed(Error::Http {
            status,
            message: api_error.error.message,
        })),
        Err(_) => Attempt::Done(FetchOutcome::Failed(Error::Http {
            status,
            message: String::from_utf8_lossy(body).trim().to_string(),
        })),
    }
}
