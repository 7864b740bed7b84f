use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;
use tracing::{info, warn};

use crate::{api::AppError, management::TokenManager, server::AppState};

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

/// Completes the authorization-code flow.
///
/// Spotify redirects here with either `code` or `error`. A code is exchanged
/// for a token pair, which is cached in the session before moving on to the
/// playlists. A failed exchange is not handled and ends in a `500`.
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<CallbackParams>,
) -> Result<Response, AppError> {
    if let Some(error) = params.error {
        warn!("authorization denied: {}", error);
        return Ok(Json(json!({ "error": error })).into_response());
    }

    let Some(code) = params.code else {
        return Ok((StatusCode::BAD_REQUEST, "Missing authorization code.").into_response());
    };

    let token = state.spotify.exchange_code(&code).await?;
    TokenManager::new(session).persist(&token).await?;
    info!("authorized with scope '{}'", token.scope);

    Ok(Redirect::to("/get_playlists").into_response())
}
