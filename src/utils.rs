use std::collections::HashMap;

use html_escape::{encode_single_quoted_attribute, encode_text};
use rand::Rng;

use crate::{
    spotify::SearchKind,
    types::{
        Album, AlbumLink, Artist, Playlist, SavedTrack, SearchOutcome, SimpleArtist, Track,
        TrackLink,
    },
};

/// Maximum number of seed artists Spotify accepts for recommendations.
pub const MAX_SEED_ARTISTS: usize = 5;

/// 64 random bytes used as the session signing key.
///
/// Generated per process, so sessions do not survive a restart.
pub fn generate_session_key() -> [u8; 64] {
    let mut key = [0u8; 64];
    rand::rng().fill(&mut key[..]);
    key
}

pub fn join_artist_names(artists: &[SimpleArtist]) -> String {
    artists
        .iter()
        .map(|artist| artist.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Picks the artists that appear most often across the saved tracks.
///
/// Every artist credited on a track counts once for that track. Artists are
/// ranked by count, descending; ties keep the order in which the artists were
/// first seen. At most `max` ids are returned.
pub fn top_artist_seeds(saved: &[SavedTrack], max: usize) -> Vec<String> {
    let mut order: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for item in saved {
        for artist in &item.track.artists {
            match index.get(artist.id.as_str()) {
                Some(&i) => order[i].1 += 1,
                None => {
                    index.insert(artist.id.as_str(), order.len());
                    order.push((artist.id.as_str(), 1));
                }
            }
        }
    }

    // sort_by is stable, so equal counts stay in first-seen order
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order
        .into_iter()
        .take(max)
        .map(|(id, _)| id.to_string())
        .collect()
}

pub fn not_found(kind: SearchKind) -> SearchOutcome {
    let message = match kind {
        SearchKind::Artist => "No artist found.",
        SearchKind::Track => "No tracks found.",
        SearchKind::Album => "No albums found.",
    };
    SearchOutcome::Error {
        message: message.to_string(),
    }
}

pub fn artist_outcome(artist: Artist, top_tracks: Vec<Track>) -> SearchOutcome {
    SearchOutcome::Artist {
        image: artist.images.into_iter().next().map(|image| image.url),
        id: artist.id,
        name: artist.name,
        url: artist.external_urls.spotify,
        top_tracks: top_tracks
            .into_iter()
            .map(|track| TrackLink {
                name: track.name,
                url: track.external_urls.spotify,
            })
            .collect(),
    }
}

/// Labels each track as `"<name> by <artist, artist>"`.
pub fn track_outcome(tracks: Vec<Track>) -> SearchOutcome {
    if tracks.is_empty() {
        return not_found(SearchKind::Track);
    }

    SearchOutcome::Track {
        tracks: tracks
            .into_iter()
            .map(|track| TrackLink {
                name: format!("{} by {}", track.name, join_artist_names(&track.artists)),
                url: track.external_urls.spotify,
            })
            .collect(),
    }
}

pub fn album_outcome(albums: Vec<Album>) -> SearchOutcome {
    if albums.is_empty() {
        return not_found(SearchKind::Album);
    }

    SearchOutcome::Album {
        albums: albums
            .into_iter()
            .map(|album| AlbumLink {
                name: album.name,
                url: album.external_urls.spotify,
                release_date: album.release_date,
            })
            .collect(),
    }
}

/// One `name: url` line per playlist, separated by `<br>`.
///
/// Names and urls come from Spotify and are escaped as HTML text.
pub fn render_playlists(playlists: &[Playlist]) -> String {
    playlists
        .iter()
        .map(|playlist| {
            format!(
                "{}: {}",
                encode_text(&playlist.name),
                encode_text(&playlist.external_urls.spotify)
            )
        })
        .collect::<Vec<_>>()
        .join("<br>")
}

pub fn render_recommendations(tracks: &[Track]) -> String {
    let mut html = String::from("<h1>Recommended Tracks</h1><ul>");
    for track in tracks {
        let artists = join_artist_names(&track.artists);
        html.push_str(&format!(
            "<li>{} by {} - <a href='{}'>Listen</a></li>",
            encode_text(&track.name),
            encode_text(&artists),
            encode_single_quoted_attribute(&track.external_urls.spotify)
        ));
    }
    html.push_str("</ul>");
    html
}
