use reqwest::Client;

use crate::{
    spotify::{SearchKind, SpotifyError, ensure_success},
    types::{SearchResponse, Track, TracksResponse},
};

/// Market used for artist top tracks, which Spotify requires.
pub const TOP_TRACKS_MARKET: &str = "US";

/// Searches the catalog for a single entity type.
///
/// Only the container matching `kind` is filled in the returned
/// [`SearchResponse`].
pub async fn search(
    client: &Client,
    api_url: &str,
    token: &str,
    query: &str,
    kind: SearchKind,
    limit: u32,
) -> Result<SearchResponse, SpotifyError> {
    let limit = limit.to_string();
    let response = client
        .get(format!("{api_url}/search"))
        .query(&[("q", query), ("type", kind.as_str()), ("limit", limit.as_str())])
        .bearer_auth(token)
        .send()
        .await?;

    Ok(ensure_success(response).await?.json().await?)
}

pub async fn artist_top_tracks(
    client: &Client,
    api_url: &str,
    token: &str,
    artist_id: &str,
) -> Result<Vec<Track>, SpotifyError> {
    let response = client
        .get(format!("{api_url}/artists/{artist_id}/top-tracks"))
        .query(&[("market", TOP_TRACKS_MARKET)])
        .bearer_auth(token)
        .send()
        .await?;

    let body: TracksResponse = ensure_success(response).await?.json().await?;
    Ok(body.tracks)
}

/// Requests `limit` tracks seeded by the given artist ids.
///
/// Spotify accepts at most five seeds and rejects a request without any; both
/// conditions are left for the API to report.
pub async fn recommendations(
    client: &Client,
    api_url: &str,
    token: &str,
    seed_artists: &[String],
    limit: u32,
) -> Result<Vec<Track>, SpotifyError> {
    let seeds = seed_artists.join(",");
    let limit = limit.to_string();
    let response = client
        .get(format!("{api_url}/recommendations"))
        .query(&[("seed_artists", seeds.as_str()), ("limit", limit.as_str())])
        .bearer_auth(token)
        .send()
        .await?;

    let body: TracksResponse = ensure_success(response).await?.json().await?;
    Ok(body.tracks)
}
