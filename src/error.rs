//! Error types shared by the token acquirer, the resilient fetcher and the
//! presentation layer.
//!
//! Only an expired access token is recovered locally (by a single retry in
//! [`crate::spotify::SpotifyClient::fetch_protected`]); every variant below
//! surfaces to the caller unchanged.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The refresh-token grant was rejected or returned an unusable body.
    #[error("access token error: {0}")]
    Auth(String),

    /// The upstream answered with a status or shape that carries no
    /// actionable signal.
    #[error("unknown response: {0}")]
    UnknownResponse(String),

    /// A non-success status that was not recognized as an expired token.
    #[error("request failed with status {status}: {message}")]
    Http { status: StatusCode, message: String },

    /// Network or client failure, passed through as-is.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("configuration error: {0}")]
    Config(String),
}
