use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{Router, routing::get};
use time::Duration;
use tower_http::trace::TraceLayer;
use tower_sessions::{
    Expiry, MemoryStore, SessionManagerLayer,
    cookie::{Key, SameSite},
};

use crate::{
    Res, api,
    config::Config,
    spotify::{SpotifyApi, SpotifyClient},
    success, utils, warning,
};

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub spotify: Arc<dyn SpotifyApi>,
}

impl AppState {
    pub fn new(config: Arc<Config>, spotify: Arc<dyn SpotifyApi>) -> Self {
        Self { config, spotify }
    }
}

/// Builds the application router.
///
/// Sessions live in memory and are tied to the browser by a cookie signed
/// with `key`. The cookie is marked secure when the redirect URI is served
/// over https. It is `SameSite=Lax` so it survives the redirect chain that
/// starts on the Spotify consent page.
pub fn build_router(state: AppState, key: Key) -> Router {
    let secure = state.config.redirect_uri.starts_with("https://");
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(secure)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::hours(1)))
        .with_signed(key);

    Router::new()
        .route("/", get(api::home))
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/get_playlists", get(api::get_playlists))
        .route("/search", get(api::search_page).post(api::search))
        .route("/recommend", get(api::recommend))
        .route("/logout", get(api::logout))
        .route("/health", get(api::health))
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Starts the web server and serves until the process is stopped.
///
/// A fresh session key is generated on every start. With `open`, the default
/// browser is pointed at the server once it listens.
pub async fn start_api_server(config: Arc<Config>, open: bool) -> Res<()> {
    let spotify = SpotifyClient::new(Arc::clone(&config))?;
    let state = AppState::new(Arc::clone(&config), Arc::new(spotify));
    let app = build_router(state, Key::from(&utils::generate_session_key()));

    let addr = SocketAddr::from_str(&config.server_addr)?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let url = format!("http://{}", listener.local_addr()?);
    success!("Listening on {}", url);

    if open && webbrowser::open(&url).is_err() {
        warning!("Failed to open browser. Please navigate to {} manually.", url);
    }

    axum::serve(listener, app).await?;
    Ok(())
}
