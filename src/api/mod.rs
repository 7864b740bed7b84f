//! # API Module
//!
//! HTTP handlers of the sporlweb server.
//!
//! ## Endpoints
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | GET | `/` | [`home`] - redirect to authorization or to the playlists |
//! | GET | `/login` | [`login`] - redirect to the Spotify authorize URL |
//! | GET | `/callback` | [`callback`] - exchange the authorization code |
//! | GET | `/get_playlists` | [`get_playlists`] - the user's playlists |
//! | GET/POST | `/search` | [`search_page`] / [`search`] - catalog search |
//! | GET | `/recommend` | [`recommend`] - recommendations from saved tracks |
//! | GET | `/logout` | [`logout`] - clear the session |
//! | GET | `/health` | [`health`] - liveness probe |
//!
//! Every route that calls Spotify on the user's behalf takes the
//! [`Authorized`] extractor, which redirects to the authorize URL when the
//! session has no valid token.

mod callback;
mod error;
mod guard;
mod health;
mod home;
mod playlists;
mod recommend;
mod search;

pub use callback::{CallbackParams, callback};
pub use error::AppError;
pub use guard::Authorized;
pub use health::health;
pub use home::{home, login, logout};
pub use playlists::get_playlists;
pub use recommend::{RECOMMENDATION_LIMIT, SAVED_TRACKS_LIMIT, recommend, recommend_tracks};
pub use search::{SEARCH_LIMIT, SearchForm, run_search, search, search_page};
