use reqwest::Client;

use crate::{
    spotify::{SpotifyError, ensure_success},
    types::{Paging, Playlist, SavedTrack},
};

/// Page size the playlist listing asks for. Only this first page is shown.
pub const PLAYLIST_PAGE_SIZE: u32 = 50;

/// Retrieves the first page of the current user's playlists.
///
/// No further pages are requested, so users with more than
/// [`PLAYLIST_PAGE_SIZE`] playlists only see the first ones.
pub async fn current_user_playlists(
    client: &Client,
    api_url: &str,
    token: &str,
) -> Result<Paging<Playlist>, SpotifyError> {
    let response = client
        .get(format!("{api_url}/me/playlists"))
        .query(&[("limit", PLAYLIST_PAGE_SIZE)])
        .bearer_auth(token)
        .send()
        .await?;

    Ok(ensure_success(response).await?.json().await?)
}

/// Retrieves up to `limit` of the tracks the current user saved ("liked").
///
/// Needs the `user-library-read` scope.
pub async fn current_user_saved_tracks(
    client: &Client,
    api_url: &str,
    token: &str,
    limit: u32,
) -> Result<Paging<SavedTrack>, SpotifyError> {
    let response = client
        .get(format!("{api_url}/me/tracks"))
        .query(&[("limit", limit)])
        .bearer_auth(token)
        .send()
        .await?;

    Ok(ensure_success(response).await?.json().await?)
}
