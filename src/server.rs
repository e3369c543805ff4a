use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr};
use tokio::net::TcpListener;

use crate::{api, config, error, info, management::SharedSession};

/// Builds the bridge router with the shared session injected as an extension.
pub fn router(session: SharedSession) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/playlists", get(api::playlists))
        .route("/devices", get(api::devices))
        .route("/search", get(api::search))
        .route("/play", get(api::play).post(api::play))
        .route("/stop", get(api::stop).post(api::stop))
        .layer(Extension(session))
}

pub async fn start_api_server(session: SharedSession) {
    let app = router(session);

    let addr = match SocketAddr::from_str(&config::server_addr()) {
        Ok(addr) => addr,
        Err(e) => error!("Failed to parse server address: {}", e),
    };

    info!("Listening on http://{}", addr);
    let listener = TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
