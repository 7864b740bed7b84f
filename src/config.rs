//! Configuration management for the sporlweb server.
//!
//! Values come from environment variables, optionally seeded from a `.env` file.
//! Lookup order:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory, then `./.env`
//! 3. Application defaults for the optional settings
//!
//! Everything is read once into a [`Config`] at start-up and shared with the
//! request handlers through the application state.

use std::{env, path::PathBuf};

use thiserror::Error;

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:5000";
pub const DEFAULT_SCOPE: &str = "playlist-read-private user-library-read";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is not valid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Process-wide settings, built once and passed to everything that needs them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub server_addr: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when one of `SPOTIPY_CLIENT_ID`,
    /// `SPOTIPY_CLIENT_SECRET` or `SPOTIPY_REDIRECT_URI` is unset or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Used by [`Config::from_env`]; tests feed it a map instead of touching
    /// the real environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };
        let optional = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let redirect_uri = required("SPOTIPY_REDIRECT_URI")?;
        if reqwest::Url::parse(&redirect_uri).is_err() {
            return Err(ConfigError::Invalid {
                name: "SPOTIPY_REDIRECT_URI",
                reason: format!("'{}' is not an absolute URL", redirect_uri),
            });
        }

        Ok(Self {
            server_addr: optional("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            client_id: required("SPOTIPY_CLIENT_ID")?,
            client_secret: required("SPOTIPY_CLIENT_SECRET")?,
            redirect_uri,
            scope: optional("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE),
            auth_url: optional("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL),
            token_url: optional("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL),
            api_url: optional("SPOTIFY_API_URL", DEFAULT_API_URL)
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

/// Loads environment variables from a `.env` file.
///
/// Looks in the platform-specific local data directory first
/// (`~/.local/share/sporlweb/.env` on Linux), creating the directory if needed,
/// and falls back to a `.env` in the working directory. A missing file is not
/// an error: the variables may come straight from the environment.
///
/// # Errors
///
/// Returns an error string when the data directory cannot be created or an
/// existing `.env` file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("sporlweb/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
        return Ok(());
    }

    match dotenv::dotenv() {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.to_string()),
    }
}
