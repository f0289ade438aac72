//! Configuration management for nowplay.
//!
//! Settings come from environment variables, optionally seeded from a `.env`
//! file. They are read once, at startup, into an immutable [`Config`] that is
//! handed to [`crate::spotify::SpotifyClient`]; nothing below the binary reads
//! the process environment on its own.
//!
//! The lookup order is:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. `.env` file in the working directory

use std::{env, fmt, path::PathBuf};

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::{error::Error, utils};

pub const CLIENT_ID_VAR: &str = "SPOTIFY_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "SPOTIFY_CLIENT_SECRET";
pub const ACCOUNTS_ENDPOINT_VAR: &str = "SPOTIFY_ACCOUNTS_ENDPOINT";
pub const API_ENDPOINT_VAR: &str = "SPOTIFY_API_ENDPOINT";
pub const REFRESH_TOKEN_VAR: &str = "SPOTIFY_REFRESH_TOKEN";
pub const USER_URL_VAR: &str = "SPOTIFY_USER_URL";

/// Loads environment variables from a `.env` file.
///
/// Looks for `nowplay/.env` in the platform-specific local data directory,
/// creating the directory when it does not exist yet:
/// - Linux: `~/.local/share/nowplay/.env`
/// - macOS: `~/Library/Application Support/nowplay/.env`
/// - Windows: `%LOCALAPPDATA%/nowplay/.env`
///
/// When that file is missing, a `.env` in the working directory is tried.
/// Finding neither is fine: the variables may already be exported.
///
/// # Errors
///
/// Returns an error string if the data directory cannot be created or if an
/// existing `.env` file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    } else {
        dotenv::dotenv().ok();
    }
    Ok(())
}

fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("nowplay/.env");
    path
}

/// Immutable settings for talking to the accounts service and the Web API.
///
/// The `Debug` output masks the client secret, the refresh token and the
/// basic-auth value.
#[derive(Clone)]
pub struct Config {
    client_id: String,
    client_secret: String,
    accounts_endpoint: String,
    api_endpoint: String,
    refresh_token: String,
    user_url: Option<String>,
    basic_auth: String,
}

impl Config {
    /// Builds a configuration from explicit values.
    ///
    /// Endpoint base URLs lose any trailing `/`. The basic-auth value
    /// (`base64(client_id:client_secret)`) is computed here, once.
    ///
    /// # Arguments
    ///
    /// * `client_id` / `client_secret` - Credentials of the registered Spotify application
    /// * `accounts_endpoint` - Base URL of the accounts service, e.g. `https://accounts.spotify.com`
    /// * `api_endpoint` - Base URL of the Web API, e.g. `https://api.spotify.com`
    /// * `refresh_token` - Long-lived refresh token of the watched account
    ///
    /// # Example
    ///
    /// ```
    /// let config = Config::new("id", "secret", "https://accounts.spotify.com/", "https://api.spotify.com", "AQD...");
    /// assert_eq!(config.basic_auth(), "aWQ6c2VjcmV0");
    /// assert_eq!(config.token_url(), "https://accounts.spotify.com/api/token");
    /// ```
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        accounts_endpoint: impl Into<String>,
        api_endpoint: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        let client_id = client_id.into();
        let client_secret = client_secret.into();
        let basic_auth = STANDARD.encode(format!("{}:{}", client_id, client_secret));

        Config {
            client_id,
            client_secret,
            accounts_endpoint: trim_base(accounts_endpoint.into()),
            api_endpoint: trim_base(api_endpoint.into()),
            refresh_token: refresh_token.into(),
            user_url: None,
            basic_auth,
        }
    }

    /// Sets the profile URL copied into every [`crate::types::Song`].
    pub fn with_user_url(mut self, user_url: impl Into<String>) -> Self {
        self.user_url = Some(user_url.into());
        self
    }

    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Config`] naming the first required variable that is
    /// unset or empty.
    pub fn from_env() -> Result<Self, Error> {
        let config = Config::new(
            required(CLIENT_ID_VAR)?,
            required(CLIENT_SECRET_VAR)?,
            required(ACCOUNTS_ENDPOINT_VAR)?,
            required(API_ENDPOINT_VAR)?,
            required(REFRESH_TOKEN_VAR)?,
        );

        Ok(match env::var(USER_URL_VAR) {
            Ok(url) if !url.trim().is_empty() => config.with_user_url(url),
            _ => config,
        })
    }

    /// Client ID of the Spotify application.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Client secret of the Spotify application. Never log it.
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Accounts service base URL, without trailing `/`.
    pub fn accounts_endpoint(&self) -> &str {
        &self.accounts_endpoint
    }

    /// Web API base URL, without trailing `/`.
    pub fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    /// The long-lived credential exchanged for access tokens.
    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    /// Optional profile URL of the watched account.
    pub fn user_url(&self) -> Option<&str> {
        self.user_url.as_deref()
    }

    /// `base64(client_id:client_secret)`, ready for a `Basic` header.
    pub fn basic_auth(&self) -> &str {
        &self.basic_auth
    }

    /// Full URL of the token exchange endpoint.
    pub fn token_url(&self) -> String {
        format!("{}/api/token", self.accounts_endpoint)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field("client_secret", &utils::mask_secret(&self.client_secret))
            .field("accounts_endpoint", &self.accounts_endpoint)
            .field("api_endpoint", &self.api_endpoint)
            .field("refresh_token", &utils::mask_secret(&self.refresh_token))
            .field("user_url", &self.user_url)
            .field("basic_auth", &utils::mask_secret(&self.basic_auth))
            .finish()
    }
}

fn required(name: &str) -> Result<String, Error> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::Config(format!("{} must be set", name))),
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
