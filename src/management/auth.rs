use chrono::Utc;
use tower_sessions::Session;
use tracing::{debug, warn};

use crate::{
    spotify::{SpotifyApi, SpotifyError},
    types::Token,
};

/// Session key the token is stored under.
pub const TOKEN_KEY: &str = "token_info";

/// Tokens expiring within this many seconds are refreshed before use.
pub const REFRESH_MARGIN_SECS: i64 = 60;

/// Typed access to the token cached in the caller's browser session.
#[derive(Clone)]
pub struct TokenManager {
    session: Session,
}

impl TokenManager {
    pub fn new(session: Session) -> Self {
        TokenManager { session }
    }

    /// Returns the cached token, if any.
    ///
    /// An unreadable entry is reported and treated as absent, which sends the
    /// user through authorization again.
    pub async fn cached_token(&self) -> Option<Token> {
        match self.session.get::<Token>(TOKEN_KEY).await {
            Ok(token) => token,
            Err(e) => {
                warn!("Discarding unreadable session token: {}", e);
                None
            }
        }
    }

    pub async fn persist(&self, token: &Token) -> Result<(), SpotifyError> {
        self.session
            .insert(TOKEN_KEY, token)
            .await
            .map_err(|e| SpotifyError::Session(e.to_string()))
    }

    /// Drops the session and everything in it from the store.
    ///
    /// Clearing a session that is already empty is a no-op.
    pub async fn clear(&self) -> Result<(), SpotifyError> {
        self.session
            .flush()
            .await
            .map_err(|e| SpotifyError::Session(e.to_string()))
    }

    /// Returns an access token for `token`, refreshing it first when it is
    /// about to expire.
    ///
    /// A refreshed token is written back to the session. When the refresh
    /// fails the current access token is still handed out; it has not expired
    /// yet.
    pub async fn get_valid_token(&self, token: &Token, api: &dyn SpotifyApi) -> String {
        let now = Utc::now().timestamp();
        if !token.expires_within(now, REFRESH_MARGIN_SECS) || token.refresh_token.is_empty() {
            return token.access_token.clone();
        }

        debug!("access token expires in {}s, refreshing", token.expires_at - now);
        match api.refresh_token(&token.refresh_token).await {
            Ok(fresh) => {
                if let Err(e) = self.persist(&fresh).await {
                    warn!("Failed to store refreshed token: {}", e);
                }
                fresh.access_token
            }
            Err(e) => {
                warn!("Token refresh failed: {}", e);
                token.access_token.clone()
            }
        }
    }
}
