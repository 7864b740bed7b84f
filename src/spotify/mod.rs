//! # Spotify Integration Module
//!
//! This module is the only place that talks to Spotify. Everything the web layer
//! needs from the provider is expressed by the [`SpotifyApi`] trait so the
//! handlers can be driven by a fake in tests and by [`SpotifyClient`] in
//! production.
//!
//! ## Architecture
//!
//! ```text
//! HTTP handlers (api)
//!          ↓
//! SpotifyApi trait
//!     ├── auth     (authorize URL, code exchange, token refresh)
//!     ├── library  (current user's playlists and saved tracks)
//!     └── catalog  (search, artist top tracks, recommendations)
//!          ↓
//! reqwest, JSON
//!          ↓
//! Spotify Accounts service / Web API
//! ```
//!
//! ## API Coverage
//!
//! - `GET /authorize` (browser redirect only)
//! - `POST /api/token` - code exchange and refresh
//! - `GET /me/playlists` - first page of the user's playlists
//! - `GET /me/tracks` - the user's saved tracks
//! - `GET /search` - catalog search limited to one type
//! - `GET /artists/{id}/top-tracks` - an artist's top tracks
//! - `GET /recommendations` - tracks seeded by artist ids
//!
//! ## Error Handling
//!
//! No call is retried. Transport failures surface as [`SpotifyError::Http`],
//! non-success statuses as [`SpotifyError::Status`] carrying the response body.

pub mod auth;
pub mod catalog;
pub mod client;
pub mod library;

use std::{fmt, str::FromStr};

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use thiserror::Error;

use crate::types::{Paging, Playlist, SavedTrack, SearchResponse, Token, Track};

pub use client::SpotifyClient;

#[derive(Debug, Error)]
pub enum SpotifyError {
    #[error("request to Spotify failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Spotify returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("invalid Spotify configuration: {0}")]
    Config(String),
    #[error("session store failed: {0}")]
    Session(String),
}

/// Catalog entity types the search form can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchKind {
    #[default]
    Artist,
    Track,
    Album,
}

impl SearchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchKind::Artist => "artist",
            SearchKind::Track => "track",
            SearchKind::Album => "album",
        }
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "artist" => Ok(SearchKind::Artist),
            "track" => Ok(SearchKind::Track),
            "album" => Ok(SearchKind::Album),
            other => Err(format!("unknown search type '{}'", other)),
        }
    }
}

/// Everything the web layer needs from the provider.
///
/// Web API calls take the caller's access token; refreshing it is the job of
/// [`crate::management::TokenManager`].
#[async_trait]
pub trait SpotifyApi: Send + Sync {
    /// URL the browser is sent to when the user has to (re-)authorize.
    fn authorize_url(&self) -> String;

    async fn exchange_code(&self, code: &str) -> Result<Token, SpotifyError>;

    async fn refresh_token(&self, refresh_token: &str) -> Result<Token, SpotifyError>;

    async fn current_user_playlists(
        &self,
        access_token: &str,
    ) -> Result<Paging<Playlist>, SpotifyError>;

    async fn current_user_saved_tracks(
        &self,
        access_token: &str,
        limit: u32,
    ) -> Result<Paging<SavedTrack>, SpotifyError>;

    async fn search(
        &self,
        access_token: &str,
        query: &str,
        kind: SearchKind,
        limit: u32,
    ) -> Result<SearchResponse, SpotifyError>;

    async fn artist_top_tracks(
        &self,
        access_token: &str,
        artist_id: &str,
    ) -> Result<Vec<Track>, SpotifyError>;

    async fn recommendations(
        &self,
        access_token: &str,
        seed_artists: &[String],
        limit: u32,
    ) -> Result<Vec<Track>, SpotifyError>;
}

/// Turns a non-success response into [`SpotifyError::Status`].
pub(crate) async fn ensure_success(response: Response) -> Result<Response, SpotifyError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(SpotifyError::Status { status, body })
}
