use axum::{extract::State, response::Redirect};
use tower_sessions::Session;
use tracing::warn;

use crate::{api::guard::Authorized, management::TokenManager, server::AppState};

/// Landing route: authorized users go straight to their playlists.
pub async fn home(_auth: Authorized) -> Redirect {
    Redirect::to("/get_playlists")
}

/// Sends the browser to Spotify regardless of what the session holds.
pub async fn login(State(state): State<AppState>) -> Redirect {
    Redirect::to(&state.spotify.authorize_url())
}

pub async fn logout(session: Session) -> Redirect {
    if let Err(e) = TokenManager::new(session).clear().await {
        warn!("Failed to clear session: {}", e);
    }
    Redirect::to("/")
}
