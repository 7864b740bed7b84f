use chrono::Utc;
use serde::{Deserialize, Serialize};

/// OAuth token pair cached in the browser session.
///
/// `expires_at` is a unix timestamp in seconds, computed when the token is
/// obtained from `expires_in`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: i64,
    pub expires_at: i64,
}

impl Token {
    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at
    }

    /// True when the token expires within `margin` seconds from `now`.
    pub fn expires_within(&self, now: i64, margin: i64) -> bool {
        self.expires_at - now < margin
    }
}

/// Raw body of the token endpoint for both the code and refresh grants.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: String,
    pub expires_in: i64,
}

impl TokenResponse {
    /// Stamps the response with its absolute expiry.
    ///
    /// A refresh grant may omit the refresh token, in which case `previous`
    /// is carried over.
    pub fn into_token(self, previous: Option<&str>) -> Token {
        let refresh_token = self
            .refresh_token
            .or_else(|| previous.map(str::to_string))
            .unwrap_or_default();

        Token {
            access_token: self.access_token,
            refresh_token,
            scope: self.scope,
            expires_in: self.expires_in,
            expires_at: Utc::now().timestamp() + self.expires_in,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paging<T> {
    pub items: Vec<T>,
}

impl<T> Default for Paging<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleArtist {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SimpleArtist>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTrack {
    pub track: Track,
}

/// Body of `GET /search`. Only the container matching the requested type is present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    pub artists: Option<Paging<Artist>>,
    pub tracks: Option<Paging<Track>>,
    pub albums: Option<Paging<Album>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TracksResponse {
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackLink {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlbumLink {
    pub name: String,
    pub url: String,
    pub release_date: String,
}

/// Reshaped search result handed back to the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SearchOutcome {
    Artist {
        id: String,
        name: String,
        url: String,
        image: Option<String>,
        top_tracks: Vec<TrackLink>,
    },
    Track {
        tracks: Vec<TrackLink>,
    },
    Album {
        albums: Vec<AlbumLink>,
    },
    Error {
        message: String,
    },
}
