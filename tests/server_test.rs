use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    },
};

use axum::{
    Form, Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::json;
use tokio::sync::Mutex;

use spotbridge::{
    management::{SessionManager, SharedSession},
    server,
    spotify::SpotifyClient,
    types::{ApiEndpoints, Credentials, Token},
};

const VALID_TOKEN: &str = "valid-token";

/// Shared state for the mock Spotify upstream: hit counters and a switch to
/// make refresh grants fail.
#[derive(Clone)]
struct MockState {
    api_hits: Arc<AtomicU32>,
    token_hits: Arc<AtomicU32>,
    refresh_fails: bool,
}

struct Upstream {
    addr: SocketAddr,
    api_hits: Arc<AtomicU32>,
    token_hits: Arc<AtomicU32>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(&format!("Bearer {VALID_TOKEN}"))
}

async fn token_endpoint(
    State(state): State<MockState>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    state.token_hits.fetch_add(1, Ordering::SeqCst);
    let is_refresh = form.get("grant_type").map(String::as_str) == Some("refresh_token");
    if state.refresh_fails && is_refresh {
        return (StatusCode::INTERNAL_SERVER_ERROR, "refresh rejected").into_response();
    }
    Json(json!({
        "access_token": VALID_TOKEN,
        "refresh_token": "refresh-rotated",
        "token_type": "Bearer",
        "expires_in": 3600,
    }))
    .into_response()
}

async fn me(State(state): State<MockState>, headers: HeaderMap) -> Response {
    state.api_hits.fetch_add(1, Ordering::SeqCst);
    if authorized(&headers) {
        Json(json!({ "id": "bridge-user" })).into_response()
    } else {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

async fn user_playlists(State(state): State<MockState>, headers: HeaderMap) -> Response {
    state.api_hits.fetch_add(1, Ordering::SeqCst);
    if authorized(&headers) {
        Json(json!({ "items": [{ "id": "pl1", "name": "Morning" }] })).into_response()
    } else {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

async fn devices(State(state): State<MockState>, headers: HeaderMap) -> Response {
    state.api_hits.fetch_add(1, Ordering::SeqCst);
    if authorized(&headers) {
        Json(json!({ "devices": [{ "id": "dev1", "name": "Speaker" }] })).into_response()
    } else {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

async fn search_tracks(State(state): State<MockState>, headers: HeaderMap) -> Response {
    state.api_hits.fetch_add(1, Ordering::SeqCst);
    if authorized(&headers) {
        Json(json!({
            "tracks": { "items": [{ "id": "t1", "uri": "spotify:track:t1" }] }
        }))
        .into_response()
    } else {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

async fn player_command(State(state): State<MockState>, headers: HeaderMap) -> Response {
    state.api_hits.fetch_add(1, Ordering::SeqCst);
    if authorized(&headers) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

async fn spawn_upstream(refresh_fails: bool) -> Upstream {
    let api_hits = Arc::new(AtomicU32::new(0));
    let token_hits = Arc::new(AtomicU32::new(0));
    let state = MockState {
        api_hits: api_hits.clone(),
        token_hits: token_hits.clone(),
        refresh_fails,
    };

    let app = Router::new()
        .route("/api/token", post(token_endpoint))
        .route("/v1/me", get(me))
        .route("/v1/me/playlists", get(user_playlists))
        .route("/v1/me/player/devices", get(devices))
        .route("/v1/search", get(search_tracks))
        .route("/v1/me/player/play", put(player_command))
        .route("/v1/me/player/pause", put(player_command))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Upstream {
        addr,
        api_hits,
        token_hits,
    }
}

fn client_for(upstream: &Upstream) -> SpotifyClient {
    SpotifyClient::new(
        Credentials {
            client_id: "bridge".to_string(),
            client_secret: "bridge-secret".to_string(),
            redirect_uri: "http://localhost:3001/callback".to_string(),
        },
        ApiEndpoints {
            auth_url: format!("http://{}/authorize", upstream.addr),
            token_url: format!("http://{}/api/token", upstream.addr),
            api_url: format!("http://{}/v1", upstream.addr),
            scope: "user-read-playback-state user-modify-playback-state".to_string(),
        },
    )
}

async fn spawn_bridge(session: SharedSession) -> SocketAddr {
    let app = server::router(session);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn http() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let session: SharedSession = Arc::new(Mutex::new(SessionManager::new()));
    let bridge = spawn_bridge(session).await;

    let res = http()
        .get(format!("http://{bridge}/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn uninitialized_session_rejects_all_routes() {
    let session: SharedSession = Arc::new(Mutex::new(SessionManager::new()));
    let bridge = spawn_bridge(session).await;
    let http = http();

    for path in ["/playlists", "/devices", "/login", "/callback?code=x"] {
        let res = http
            .get(format!("http://{bridge}{path}"))
            .send()
            .await
            .unwrap();
        assert_eq!(
            res.status(),
            StatusCode::INTERNAL_SERVER_ERROR,
            "route {path}"
        );
        assert!(res.text().await.unwrap().contains("not initialized"));
    }
}

#[tokio::test]
async fn missing_token_yields_unauthenticated() {
    let upstream = spawn_upstream(false).await;
    let session: SharedSession = Arc::new(Mutex::new(SessionManager::with_client(client_for(
        &upstream,
    ))));
    let bridge = spawn_bridge(session).await;

    let res = http()
        .get(format!("http://{bridge}/playlists"))
        .send()
        .await
        .unwrap();

    // Unauthenticated, not uninitialized, and no upstream call was made.
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.text().await.unwrap().contains("/login"));
    assert_eq!(upstream.api_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn login_redirects_to_provider() {
    let upstream = spawn_upstream(false).await;
    let session: SharedSession = Arc::new(Mutex::new(SessionManager::with_client(client_for(
        &upstream,
    ))));
    let bridge = spawn_bridge(session).await;

    let res = http()
        .get(format!("http://{bridge}/login"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FOUND);
    let location = res
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("redirect carries a Location header");
    assert!(location.contains("client_id=bridge"));
    assert!(location.contains("response_type=code"));
    assert!(location.contains("scope=user-read-playback-state%20user-modify-playback-state"));
}

#[tokio::test]
async fn callback_stores_token_pair() {
    let upstream = spawn_upstream(false).await;
    let session: SharedSession = Arc::new(Mutex::new(SessionManager::with_client(client_for(
        &upstream,
    ))));
    let bridge = spawn_bridge(session.clone()).await;
    let http = http();

    let res = http
        .get(format!("http://{bridge}/callback?code=auth-code"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().contains("Authentication successful"));

    {
        let session = session.lock().await;
        let token = session.token().expect("token stored by callback");
        assert_eq!(token.access_token, VALID_TOKEN);
        assert_eq!(token.refresh_token, "refresh-rotated");
    }

    // A protected route now passes the guard.
    let res = http
        .get(format!("http://{bridge}/devices"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["devices"][0]["id"], "dev1");
}

#[tokio::test]
async fn callback_without_code_is_rejected() {
    let upstream = spawn_upstream(false).await;
    let session: SharedSession = Arc::new(Mutex::new(SessionManager::with_client(client_for(
        &upstream,
    ))));
    let bridge = spawn_bridge(session).await;

    let res = http()
        .get(format!("http://{bridge}/callback"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(upstream.token_hits.load(Ordering::SeqCst), 0);
}

fn authenticated_session(upstream: &Upstream, access_token: &str) -> SharedSession {
    let mut manager = SessionManager::with_client(client_for(upstream));
    manager.set_token(Token {
        access_token: access_token.to_string(),
        refresh_token: "refresh-1".to_string(),
    });
    Arc::new(Mutex::new(manager))
}

#[tokio::test]
async fn search_without_query_is_rejected_before_upstream() {
    let upstream = spawn_upstream(false).await;
    let session = authenticated_session(&upstream, VALID_TOKEN);
    let bridge = spawn_bridge(session).await;

    let res = http()
        .get(format!("http://{bridge}/search"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(res.text().await.unwrap().contains("Query parameter"));
    assert_eq!(upstream.api_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn search_relays_track_items() {
    let upstream = spawn_upstream(false).await;
    let session = authenticated_session(&upstream, VALID_TOKEN);
    let bridge = spawn_bridge(session).await;

    let res = http()
        .get(format!("http://{bridge}/search?query=daft+punk"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body.is_array());
    assert_eq!(body[0]["uri"], "spotify:track:t1");
}

#[tokio::test]
async fn play_without_params_is_rejected_before_upstream() {
    let upstream = spawn_upstream(false).await;
    let session = authenticated_session(&upstream, VALID_TOKEN);
    let bridge = spawn_bridge(session).await;
    let http = http();

    // Missing both, then missing deviceId only.
    for url in [
        format!("http://{bridge}/play"),
        format!("http://{bridge}/play?uri=spotify:album:x"),
    ] {
        let res = http.post(&url).json(&json!({})).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert!(res.text().await.unwrap().contains("URI and deviceId"));
    }
    assert_eq!(upstream.api_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn stop_without_device_is_rejected_before_upstream() {
    let upstream = spawn_upstream(false).await;
    let session = authenticated_session(&upstream, VALID_TOKEN);
    let bridge = spawn_bridge(session).await;

    let res = http()
        .post(format!("http://{bridge}/stop"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(res.text().await.unwrap().contains("deviceId is required"));
    assert_eq!(upstream.api_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn play_accepts_json_body_and_query_params() {
    let upstream = spawn_upstream(false).await;
    let session = authenticated_session(&upstream, VALID_TOKEN);
    let bridge = spawn_bridge(session).await;
    let http = http();

    let res = http
        .post(format!("http://{bridge}/play"))
        .json(&json!({ "uri": "spotify:album:x", "deviceId": "dev1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "Playback started successfully");

    let res = http
        .get(format!(
            "http://{bridge}/stop?deviceId=dev1"
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "Playback stopped successfully");
}

#[tokio::test]
async fn stale_token_triggers_exactly_one_refresh() {
    let upstream = spawn_upstream(false).await;
    let session = authenticated_session(&upstream, "stale-token");
    let bridge = spawn_bridge(session.clone()).await;

    let res = http()
        .get(format!("http://{bridge}/playlists"))
        .send()
        .await
        .unwrap();

    // Probe failed, one refresh ran, and the request went through with the
    // new token.
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(upstream.token_hits.load(Ordering::SeqCst), 1);

    let session = session.lock().await;
    let token = session.token().expect("session token overwritten");
    assert_eq!(token.access_token, VALID_TOKEN);
}

#[tokio::test]
async fn failed_refresh_still_forwards_the_request() {
    let upstream = spawn_upstream(true).await;
    let session = authenticated_session(&upstream, "stale-token");
    let bridge = spawn_bridge(session.clone()).await;

    let res = http()
        .get(format!("http://{bridge}/playlists"))
        .send()
        .await
        .unwrap();

    // The refresh failed, the handler proceeded with the stale token, and
    // the upstream rejection surfaces as a generic 500.
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(res.text().await.unwrap().contains("Failed to fetch playlists"));
    assert_eq!(upstream.token_hits.load(Ordering::SeqCst), 1);

    // The stale pair stays in place.
    let session = session.lock().await;
    assert_eq!(session.token().unwrap().access_token, "stale-token");
}
