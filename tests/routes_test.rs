use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use chrono::Utc;
use http_body_util::BodyExt;
use reqwest::StatusCode as UpstreamStatus;
use serde_json::{Value, json};
use tower::util::ServiceExt;
use tower_sessions::cookie::Key;

use sporlweb::{
    config::Config,
    server::{AppState, build_router},
    spotify::{SearchKind, SpotifyApi, SpotifyError},
    types::{Paging, Playlist, SavedTrack, SearchResponse, Token, Track},
    utils,
};

const AUTHORIZE_URL: &str = "https://accounts.spotify.com/authorize?client_id=test-client&response_type=code&redirect_uri=http%3A%2F%2F127.0.0.1%3A5000%2Fcallback&scope=playlist-read-private&show_dialog=true";

/// In-memory stand-in for Spotify that records every call it receives.
struct FakeSpotify {
    calls: Mutex<Vec<String>>,
    expires_in: i64,
    playlists: Value,
    saved_tracks: Value,
    search: Value,
    top_tracks: Value,
    recommendations: Value,
}

impl Default for FakeSpotify {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            expires_in: 3600,
            playlists: json!({"items": []}),
            saved_tracks: json!({"items": []}),
            search: json!({}),
            top_tracks: json!({"tracks": []}),
            recommendations: json!({"tracks": []}),
        }
    }
}

impl FakeSpotify {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn token(&self, access_token: &str, refresh_token: &str) -> Token {
        Token {
            access_token: access_token.to_string(),
            refresh_token: refresh_token.to_string(),
            scope: "playlist-read-private".to_string(),
            expires_in: self.expires_in,
            expires_at: Utc::now().timestamp() + self.expires_in,
        }
    }
}

#[async_trait]
impl SpotifyApi for FakeSpotify {
    fn authorize_url(&self) -> String {
        AUTHORIZE_URL.to_string()
    }

    async fn exchange_code(&self, code: &str) -> Result<Token, SpotifyError> {
        self.record(format!("exchange_code:{}", code));
        if code == "bad" {
            return Err(SpotifyError::Status {
                status: UpstreamStatus::BAD_REQUEST,
                body: "invalid_grant".to_string(),
            });
        }
        Ok(self.token("access-1", "refresh-1"))
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<Token, SpotifyError> {
        self.record(format!("refresh_token:{}", refresh_token));
        Ok(Token {
            expires_at: Utc::now().timestamp() + 3600,
            ..self.token("access-2", refresh_token)
        })
    }

    async fn current_user_playlists(
        &self,
        access_token: &str,
    ) -> Result<Paging<Playlist>, SpotifyError> {
        self.record(format!("playlists:{}", access_token));
        Ok(serde_json::from_value(self.playlists.clone()).unwrap())
    }

    async fn current_user_saved_tracks(
        &self,
        _access_token: &str,
        limit: u32,
    ) -> Result<Paging<SavedTrack>, SpotifyError> {
        self.record(format!("saved_tracks:{}", limit));
        Ok(serde_json::from_value(self.saved_tracks.clone()).unwrap())
    }

    async fn search(
        &self,
        _access_token: &str,
        query: &str,
        kind: SearchKind,
        limit: u32,
    ) -> Result<SearchResponse, SpotifyError> {
        self.record(format!("search:{}:{}:{}", kind, query, limit));
        Ok(serde_json::from_value(self.search.clone()).unwrap())
    }

    async fn artist_top_tracks(
        &self,
        _access_token: &str,
        artist_id: &str,
    ) -> Result<Vec<Track>, SpotifyError> {
        self.record(format!("top_tracks:{}", artist_id));
        Ok(serde_json::from_value(self.top_tracks["tracks"].clone()).unwrap())
    }

    async fn recommendations(
        &self,
        _access_token: &str,
        seed_artists: &[String],
        limit: u32,
    ) -> Result<Vec<Track>, SpotifyError> {
        self.record(format!("recommendations:{}:{}", seed_artists.join(","), limit));
        if seed_artists.is_empty() {
            return Err(SpotifyError::Status {
                status: UpstreamStatus::BAD_REQUEST,
                body: "at least one seed is required".to_string(),
            });
        }
        Ok(serde_json::from_value(self.recommendations["tracks"].clone()).unwrap())
    }
}

fn test_config() -> Config {
    Config {
        server_addr: "127.0.0.1:0".to_string(),
        client_id: "test-client".to_string(),
        client_secret: "test-secret".to_string(),
        redirect_uri: "http://127.0.0.1:5000/callback".to_string(),
        scope: "playlist-read-private".to_string(),
        auth_url: "https://accounts.spotify.com/authorize".to_string(),
        token_url: "https://accounts.spotify.com/api/token".to_string(),
        api_url: "https://api.spotify.com/v1".to_string(),
    }
}

fn app(fake: &Arc<FakeSpotify>) -> Router {
    let spotify: Arc<dyn SpotifyApi> = fake.clone();
    let state = AppState::new(Arc::new(test_config()), spotify);
    build_router(state, Key::from(&utils::generate_session_key()))
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, cookie: Option<&str>, form: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(form.to_string())).unwrap()
}

fn location(response: &Response<Body>) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

/// Runs the authorization callback and returns the session cookie it set.
async fn sign_in(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(get("/callback?code=abc123", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/get_playlists");

    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

fn playlists_fixture() -> Value {
    json!({
        "items": [
            {"id": "p1", "name": "Road Trip", "external_urls": {"spotify": "https://open.spotify.com/playlist/p1"}},
            {"id": "p2", "name": "Focus", "external_urls": {"spotify": "https://open.spotify.com/playlist/p2"}}
        ]
    })
}

fn track_json(name: &str, artists: &[&str]) -> Value {
    json!({
        "id": format!("{}_id", name),
        "name": name,
        "artists": artists
            .iter()
            .map(|a| json!({"id": a, "name": format!("Artist {}", a)}))
            .collect::<Vec<_>>(),
        "external_urls": {"spotify": format!("https://open.spotify.com/track/{}", name)}
    })
}

#[tokio::test]
async fn home_without_session_redirects_to_authorize() {
    let fake = Arc::new(FakeSpotify::default());

    let response = app(&fake).oneshot(get("/", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let target = location(&response);
    assert!(target.starts_with("https://accounts.spotify.com/authorize"));
    assert!(target.contains("client_id=test-client"));
    assert!(target.contains("scope=playlist-read-private"));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn protected_routes_without_session_never_call_spotify() {
    let fake = Arc::new(FakeSpotify::default());
    let app = app(&fake);

    for uri in ["/get_playlists", "/recommend", "/search"] {
        let response = app.clone().oneshot(get(uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", uri);
        assert_eq!(location(&response), AUTHORIZE_URL, "{}", uri);
    }

    let response = app
        .clone()
        .oneshot(post_form("/search", None, "query=abba&type=artist"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), AUTHORIZE_URL);

    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn login_always_redirects_to_authorize() {
    let fake = Arc::new(FakeSpotify::default());

    let response = app(&fake).oneshot(get("/login", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), AUTHORIZE_URL);
}

#[tokio::test]
async fn callback_caches_token_and_lists_playlists() {
    let fake = Arc::new(FakeSpotify {
        playlists: playlists_fixture(),
        ..Default::default()
    });
    let app = app(&fake);

    let cookie = sign_in(&app).await;

    let response = app
        .clone()
        .oneshot(get("/", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/get_playlists");

    let response = app
        .clone()
        .oneshot(get("/get_playlists", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_text(response).await,
        "Road Trip: https://open.spotify.com/playlist/p1<br>Focus: https://open.spotify.com/playlist/p2"
    );

    assert_eq!(
        fake.calls(),
        vec!["exchange_code:abc123", "playlists:access-1"]
    );
}

#[tokio::test]
async fn callback_with_error_returns_json() {
    let fake = Arc::new(FakeSpotify::default());

    let response = app(&fake)
        .oneshot(get("/callback?error=access_denied", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"error": "access_denied"}));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn callback_without_code_is_bad_request() {
    let fake = Arc::new(FakeSpotify::default());

    let response = app(&fake).oneshot(get("/callback", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn failed_code_exchange_is_a_server_error() {
    let fake = Arc::new(FakeSpotify::default());

    let response = app(&fake)
        .oneshot(get("/callback?code=bad", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!response.headers().contains_key(header::SET_COOKIE));
}

#[tokio::test]
async fn logout_twice_leaves_session_empty() {
    let fake = Arc::new(FakeSpotify::default());
    let app = app(&fake);
    let cookie = sign_in(&app).await;

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(get("/logout", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");

        let response = app
            .clone()
            .oneshot(get("/get_playlists", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), AUTHORIZE_URL);
    }

    // Logging out without any session is fine as well
    let response = app.clone().oneshot(get("/logout", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    assert_eq!(fake.calls(), vec!["exchange_code:abc123"]);
}

#[tokio::test]
async fn search_page_does_not_search() {
    let fake = Arc::new(FakeSpotify::default());
    let app = app(&fake);
    let cookie = sign_in(&app).await;

    let response = app
        .clone()
        .oneshot(get("/search", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("<form"));
    assert_eq!(fake.calls(), vec!["exchange_code:abc123"]);
}

#[tokio::test]
async fn search_tracks_labels_every_hit() {
    let items: Vec<Value> = (0..10)
        .map(|i| track_json(&format!("Song{}", i), &["a", "b"]))
        .collect();
    let fake = Arc::new(FakeSpotify {
        search: json!({"tracks": {"items": items}}),
        ..Default::default()
    });
    let app = app(&fake);
    let cookie = sign_in(&app).await;

    let response = app
        .clone()
        .oneshot(post_form("/search", Some(&cookie), "query=song&type=track"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["type"], "track");
    let tracks = body["tracks"].as_array().unwrap();
    assert_eq!(tracks.len(), 10);
    assert_eq!(tracks[0]["name"], "Song0 by Artist a, Artist b");
    assert_eq!(tracks[0]["url"], "https://open.spotify.com/track/Song0");
    assert!(fake.calls().contains(&"search:track:song:10".to_string()));
}

#[tokio::test]
async fn search_artist_without_hits_is_not_found() {
    let fake = Arc::new(FakeSpotify {
        search: json!({"artists": {"items": []}}),
        ..Default::default()
    });
    let app = app(&fake);
    let cookie = sign_in(&app).await;

    let response = app
        .clone()
        .oneshot(post_form("/search", Some(&cookie), "query=nobody&type=artist"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"type": "error", "message": "No artist found."})
    );
}

#[tokio::test]
async fn search_artist_takes_first_hit_and_its_top_tracks() {
    let fake = Arc::new(FakeSpotify {
        search: json!({"artists": {"items": [
            {"id": "ar1", "name": "First", "external_urls": {"spotify": "https://open.spotify.com/artist/ar1"}, "images": []},
            {"id": "ar2", "name": "Second", "external_urls": {"spotify": "https://open.spotify.com/artist/ar2"}, "images": []}
        ]}}),
        top_tracks: json!({"tracks": [track_json("Hit", &["ar1"])]}),
        ..Default::default()
    });
    let app = app(&fake);
    let cookie = sign_in(&app).await;

    // Unknown types fall back to an artist search
    let response = app
        .clone()
        .oneshot(post_form("/search", Some(&cookie), "query=first&type=podcast"))
        .await
        .unwrap();

    assert_eq!(
        body_json(response).await,
        json!({
            "type": "artist",
            "id": "ar1",
            "name": "First",
            "url": "https://open.spotify.com/artist/ar1",
            "image": null,
            "top_tracks": [{"name": "Hit", "url": "https://open.spotify.com/track/Hit"}]
        })
    );
    assert_eq!(
        fake.calls(),
        vec![
            "exchange_code:abc123",
            "search:artist:first:10",
            "top_tracks:ar1"
        ]
    );
}

#[tokio::test]
async fn recommend_seeds_with_top_five_artists() {
    // A five times, B and C three times, D, E and F once each
    let groups: [&[&str]; 7] = [
        &["A", "B"],
        &["A", "C"],
        &["A", "D"],
        &["B", "C"],
        &["A", "E"],
        &["C", "F"],
        &["A", "B"],
    ];
    let liked: Vec<Value> = groups
        .iter()
        .enumerate()
        .map(|(i, artists)| json!({"track": track_json(&format!("t{}", i), artists)}))
        .collect();

    let fake = Arc::new(FakeSpotify {
        saved_tracks: json!({"items": liked}),
        recommendations: json!({"tracks": [track_json("Fresh", &["Z"])]}),
        ..Default::default()
    });
    let app = app(&fake);
    let cookie = sign_in(&app).await;

    let response = app
        .clone()
        .oneshot(get("/recommend", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_text(response).await,
        "<h1>Recommended Tracks</h1><ul>\
<li>Fresh by Artist Z - <a href='https://open.spotify.com/track/Fresh'>Listen</a></li>\
</ul>"
    );
    assert_eq!(
        fake.calls(),
        vec![
            "exchange_code:abc123",
            "saved_tracks:50",
            "recommendations:A,B,C,D,E:10"
        ]
    );
}

#[tokio::test]
async fn recommend_failure_is_plain_text() {
    let fake = Arc::new(FakeSpotify::default());
    let app = app(&fake);
    let cookie = sign_in(&app).await;

    let response = app
        .clone()
        .oneshot(get("/recommend", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain")
    );
    let body = body_text(response).await;
    assert!(body.starts_with("An error occurred: "));
    assert!(body.contains("at least one seed is required"));
}

#[tokio::test]
async fn expiring_token_is_refreshed_before_use() {
    let fake = Arc::new(FakeSpotify {
        expires_in: 30,
        playlists: playlists_fixture(),
        ..Default::default()
    });
    let app = app(&fake);
    let cookie = sign_in(&app).await;

    let response = app
        .clone()
        .oneshot(get("/get_playlists", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The refreshed token was stored, so no second refresh happens
    let response = app
        .clone()
        .oneshot(get("/get_playlists", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(
        fake.calls(),
        vec![
            "exchange_code:abc123",
            "refresh_token:refresh-1",
            "playlists:access-2",
            "playlists:access-2"
        ]
    );
}

#[tokio::test]
async fn health_reports_session_state() {
    let fake = Arc::new(FakeSpotify::default());
    let app = app(&fake);

    let response = app.clone().oneshot(get("/health", None)).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["authorized"], false);

    let cookie = sign_in(&app).await;
    let response = app
        .clone()
        .oneshot(get("/health", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["authorized"], true);
}

#[tokio::test]
async fn session_cookie_survives_cross_site_redirect() {
    let fake = Arc::new(FakeSpotify::default());

    let response = app(&fake)
        .oneshot(get("/callback?code=abc123", None))
        .await
        .unwrap();

    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.contains("SameSite=Lax"), "{}", set_cookie);
    assert!(set_cookie.contains("HttpOnly"), "{}", set_cookie);
}

#[tokio::test]
async fn expired_token_redirects_without_calling_spotify() {
    let fake = Arc::new(FakeSpotify {
        expires_in: -10,
        playlists: playlists_fixture(),
        ..Default::default()
    });
    let app = app(&fake);
    let cookie = sign_in(&app).await;

    for uri in ["/", "/get_playlists", "/recommend", "/search"] {
        let response = app
            .clone()
            .oneshot(get(uri, Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", uri);
        assert_eq!(location(&response), AUTHORIZE_URL, "{}", uri);
    }

    // Neither a refresh nor any data call happens for an expired token
    assert_eq!(fake.calls(), vec!["exchange_code:abc123"]);
}

#[tokio::test]
async fn search_albums_keeps_release_dates() {
    let fake = Arc::new(FakeSpotify {
        search: json!({"albums": {"items": [
            {"id": "al1", "name": "Debut", "release_date": "2021-03-05", "external_urls": {"spotify": "https://open.spotify.com/album/al1"}},
            {"id": "al2", "name": "Sequel", "release_date": "2023", "external_urls": {"spotify": "https://open.spotify.com/album/al2"}}
        ]}}),
        ..Default::default()
    });
    let app = app(&fake);
    let cookie = sign_in(&app).await;

    let response = app
        .clone()
        .oneshot(post_form("/search", Some(&cookie), "query=debut&type=album"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "type": "album",
            "albums": [
                {"name": "Debut", "url": "https://open.spotify.com/album/al1", "release_date": "2021-03-05"},
                {"name": "Sequel", "url": "https://open.spotify.com/album/al2", "release_date": "2023"}
            ]
        })
    );
    assert_eq!(
        fake.calls(),
        vec!["exchange_code:abc123", "search:album:debut:10"]
    );
}
