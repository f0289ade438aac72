//! # Spotify Integration Module
//!
//! The logical core of nowplay: obtaining a bearer token and fetching
//! protected Web API resources with it.
//!
//! ```text
//! Presentation (controller, CLI)
//!          ↓
//! SpotifyClient
//!     ├── auth   (refresh-token grant → AccessToken)
//!     └── fetch  (authenticated GET, single retry on expiry)
//!          ↓
//! HTTP Layer (reqwest)
//! ```
//!
//! ## Token lifecycle
//!
//! An [`AccessToken`] is never refreshed in place. When the Web API reports an
//! expired token, [`SpotifyClient::fetch_protected`] calls the refresh callback
//! it was given, at most once, and retries with the new token. A second expiry
//! ends the chain as [`FetchOutcome::Absent`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! let spotify = SpotifyClient::new(Config::from_env()?)?;
//! let token = spotify.acquire_access_token().await?;
//! let outcome = spotify
//!     .fetch_protected::<CurrentlyPlaying>(
//!         &Endpoint::CurrentlyPlaying,
//!         Some(token),
//!         Some(spotify.refresh_callback()),
//!     )
//!     .await;
//! ```

mod auth;
mod fetch;

use std::time::Duration;

use reqwest::Client;

use crate::{config::Config, error::Error};

pub use auth::AccessToken;
pub use fetch::{Endpoint, FetchOutcome, OnExpired, RefreshFuture};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client bound to one [`Config`].
///
/// Holds no tokens: every access token it mints is returned to the caller.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    config: Config,
}

impl SpotifyClient {
    /// Creates a client for `config`.
    ///
    /// The underlying `reqwest::Client` carries a `nowplay/<version>` user
    /// agent and a request timeout; the token and fetch logic add no timeout
    /// of their own.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the HTTP client cannot be built (for
    /// example when no TLS backend is available).
    ///
    /// # Example
    ///
    /// ```
    /// let spotify = SpotifyClient::new(Config::from_env()?)?;
    /// let token = spotify.acquire_access_token().await?;
    /// ```
    pub fn new(config: Config) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(SpotifyClient { http, config })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }
}
