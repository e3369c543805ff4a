use std::collections::HashMap;

use axum::{
    Extension,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{api::UNINITIALIZED, management::SharedSession, warning};

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(session): Extension<SharedSession>,
) -> Response {
    let Some(code) = params.get("code") else {
        return (StatusCode::BAD_REQUEST, "Code parameter is required").into_response();
    };

    let client = {
        let session = session.lock().await;
        match session.client() {
            Some(client) => client.clone(),
            None => return (StatusCode::INTERNAL_SERVER_ERROR, UNINITIALIZED).into_response(),
        }
    };

    match client.exchange_code(code).await {
        Ok(token) => {
            session.lock().await.set_token(token);
            (
                StatusCode::OK,
                "Authentication successful! You can now use the app.",
            )
                .into_response()
        }
        Err(e) => {
            warning!("Error during authentication: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Authentication failed").into_response()
        }
    }
}
