use axum::{extract::State, response::Html};

use crate::{
    api::{AppError, guard::Authorized},
    server::AppState,
    utils,
};

/// Lists the first page of the user's playlists as `name: url` lines.
pub async fn get_playlists(
    State(state): State<AppState>,
    auth: Authorized,
) -> Result<Html<String>, AppError> {
    let access_token = auth.access_token(state.spotify.as_ref()).await;
    let playlists = state
        .spotify
        .current_user_playlists(&access_token)
        .await?;

    Ok(Html(utils::render_playlists(&playlists.items)))
}
