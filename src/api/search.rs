use axum::{
    Form, Json,
    extract::State,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::warn;

use crate::{
    api::{AppError, guard::Authorized},
    server::AppState,
    spotify::{SearchKind, SpotifyApi, SpotifyError},
    types::SearchOutcome,
    utils,
};

/// Number of results requested from the search endpoint.
pub const SEARCH_LIMIT: u32 = 10;

const SEARCH_FORM: &str = "<form method='post' action='/search'>\
<input type='text' name='query' placeholder='Search Spotify'>\
<select name='type'>\
<option value='artist' selected>Artist</option>\
<option value='track'>Track</option>\
<option value='album'>Album</option>\
</select>\
<button type='submit'>Search</button>\
</form>";

#[derive(Debug, Default, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub query: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl SearchForm {
    /// The requested type; anything unrecognised falls back to artist.
    pub fn kind(&self) -> SearchKind {
        match self.kind.as_deref() {
            None | Some("") => SearchKind::default(),
            Some(raw) => raw.parse::<SearchKind>().unwrap_or_else(|e| {
                warn!("{}, searching for artists instead", e);
                SearchKind::default()
            }),
        }
    }
}

/// `GET /search`: only the form, nothing is searched.
pub async fn search_page(_auth: Authorized) -> Html<&'static str> {
    Html(SEARCH_FORM)
}

/// `POST /search`: runs the search and returns the reshaped result as JSON.
pub async fn search(
    State(state): State<AppState>,
    auth: Authorized,
    Form(form): Form<SearchForm>,
) -> Result<Response, AppError> {
    if form.query.trim().is_empty() {
        return Ok(Html(SEARCH_FORM).into_response());
    }

    let access_token = auth.access_token(state.spotify.as_ref()).await;
    let outcome = run_search(
        state.spotify.as_ref(),
        &access_token,
        &form.query,
        form.kind(),
    )
    .await?;

    Ok(Json(outcome).into_response())
}

/// Searches one entity type and reshapes the hits.
///
/// An artist search keeps only the best match and looks up its top tracks;
/// track and album searches keep every hit. No hits is an
/// [`SearchOutcome::Error`], not a failure.
pub async fn run_search(
    api: &dyn SpotifyApi,
    access_token: &str,
    query: &str,
    kind: SearchKind,
) -> Result<SearchOutcome, SpotifyError> {
    let response = api.search(access_token, query, kind, SEARCH_LIMIT).await?;

    let outcome = match kind {
        SearchKind::Artist => {
            let first = response
                .artists
                .unwrap_or_default()
                .items
                .into_iter()
                .next();
            match first {
                Some(artist) => {
                    let top_tracks = api.artist_top_tracks(access_token, &artist.id).await?;
                    utils::artist_outcome(artist, top_tracks)
                }
                None => utils::not_found(SearchKind::Artist),
            }
        }
        SearchKind::Track => utils::track_outcome(response.tracks.unwrap_or_default().items),
        SearchKind::Album => utils::album_outcome(response.albums.unwrap_or_default().items),
    };

    Ok(outcome)
}
