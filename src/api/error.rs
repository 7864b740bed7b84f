use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::spotify::SpotifyError;

/// Failure a handler does not recover from.
///
/// Rendered as a bare `500 Internal Server Error`; the cause only goes to the log.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Spotify(#[from] SpotifyError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("request failed: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}
