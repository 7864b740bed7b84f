use axum::response::Json;
use serde_json::{Value, json};
use tower_sessions::Session;

use crate::management::TokenManager;

/// Liveness probe. Also tells whether the caller's session holds a token,
/// without checking that token against Spotify.
pub async fn health(session: Session) -> Json<Value> {
    let authorized = TokenManager::new(session).cached_token().await.is_some();

    Json(json!({
        "status": "ok",
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "authorized": authorized,
    }))
}
