use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use tower_sessions::Session;
use tracing::debug;

use crate::{
    management::{self, Gate, TokenManager},
    server::AppState,
    spotify::SpotifyApi,
    types::Token,
};

/// Extractor guarding every route that talks to Spotify on the user's behalf.
///
/// Extraction succeeds only when the session holds an unexpired token;
/// otherwise the request is answered with a redirect to the Spotify authorize
/// URL before the handler runs.
pub struct Authorized {
    pub token: Token,
    pub tokens: TokenManager,
}

impl Authorized {
    /// Access token for the upcoming API call, refreshed if it is about to expire.
    pub async fn access_token(&self, api: &dyn SpotifyApi) -> String {
        self.tokens.get_valid_token(&self.token, api).await
    }
}

impl FromRequestParts<AppState> for Authorized {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;
        let tokens = TokenManager::new(session);

        let cached = tokens.cached_token().await;
        match management::check(cached, Utc::now().timestamp(), &state.spotify.authorize_url()) {
            Gate::Proceed(token) => Ok(Self { token, tokens }),
            Gate::Redirect(url) => {
                debug!("no valid token for {}, redirecting to authorize", parts.uri);
                Err(Redirect::to(&url).into_response())
            }
        }
    }
}
