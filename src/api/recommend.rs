use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
};
use tracing::warn;

use crate::{
    api::guard::Authorized,
    server::AppState,
    spotify::{SpotifyApi, SpotifyError},
    utils,
};

/// How many saved tracks feed the artist tally.
pub const SAVED_TRACKS_LIMIT: u32 = 50;
/// How many tracks are recommended.
pub const RECOMMENDATION_LIMIT: u32 = 10;

/// Recommends tracks based on the artists the user saves most often.
///
/// Any failure along the way is reported as a plain-text message instead of
/// an error status.
pub async fn recommend(State(state): State<AppState>, auth: Authorized) -> Response {
    let access_token = auth.access_token(state.spotify.as_ref()).await;

    match recommend_tracks(state.spotify.as_ref(), &access_token).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            warn!("recommendation failed: {}", e);
            format!("An error occurred: {}", e).into_response()
        }
    }
}

/// Saved tracks → top artist seeds → recommendations → HTML list.
pub async fn recommend_tracks(
    api: &dyn SpotifyApi,
    access_token: &str,
) -> Result<String, SpotifyError> {
    let saved = api
        .current_user_saved_tracks(access_token, SAVED_TRACKS_LIMIT)
        .await?;
    let seeds = utils::top_artist_seeds(&saved.items, utils::MAX_SEED_ARTISTS);
    let tracks = api
        .recommendations(access_token, &seeds, RECOMMENDATION_LIMIT)
        .await?;

    Ok(utils::render_recommendations(&tracks))
}
