use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;

use crate::{
    config::Config,
    spotify::{SearchKind, SpotifyApi, SpotifyError, auth, catalog, library},
    types::{Paging, Playlist, SavedTrack, SearchResponse, Token, Track},
};

/// [`SpotifyApi`] backed by the real Spotify endpoints.
///
/// Constructed once at start-up; the `reqwest` client inside pools connections
/// for every request handled by the server.
#[derive(Clone)]
pub struct SpotifyClient {
    http: Client,
    config: Arc<Config>,
    authorize_url: String,
}

impl SpotifyClient {
    /// # Errors
    ///
    /// Fails when the authorize endpoint in `config` is not a valid URL.
    pub fn new(config: Arc<Config>) -> Result<Self, SpotifyError> {
        let authorize_url = auth::authorize_url(&config)?;
        Ok(Self {
            http: Client::new(),
            config,
            authorize_url,
        })
    }
}

#[async_trait]
impl SpotifyApi for SpotifyClient {
    fn authorize_url(&self) -> String {
        self.authorize_url.clone()
    }

    async fn exchange_code(&self, code: &str) -> Result<Token, SpotifyError> {
        auth::exchange_code(&self.http, &self.config, code).await
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<Token, SpotifyError> {
        auth::refresh_token(&self.http, &self.config, refresh_token).await
    }

    async fn current_user_playlists(
        &self,
        access_token: &str,
    ) -> Result<Paging<Playlist>, SpotifyError> {
        library::current_user_playlists(&self.http, &self.config.api_url, access_token).await
    }

    async fn current_user_saved_tracks(
        &self,
        access_token: &str,
        limit: u32,
    ) -> Result<Paging<SavedTrack>, SpotifyError> {
        library::current_user_saved_tracks(&self.http, &self.config.api_url, access_token, limit)
            .await
    }

    async fn search(
        &self,
        access_token: &str,
        query: &str,
        kind: SearchKind,
        limit: u32,
    ) -> Result<SearchResponse, SpotifyError> {
        catalog::search(
            &self.http,
            &self.config.api_url,
            access_token,
            query,
            kind,
            limit,
        )
        .await
    }

    async fn artist_top_tracks(
        &self,
        access_token: &str,
        artist_id: &str,
    ) -> Result<Vec<Track>, SpotifyError> {
        catalog::artist_top_tracks(&self.http, &self.config.api_url, access_token, artist_id).await
    }

    async fn recommendations(
        &self,
        access_token: &str,
        seed_artists: &[String],
        limit: u32,
    ) -> Result<Vec<Track>, SpotifyError> {
        catalog::recommendations(
            &self.http,
            &self.config.api_url,
            access_token,
            seed_artists,
            limit,
        )
        .await
    }
}
