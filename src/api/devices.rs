use axum::{
    Extension, Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{api::ensure_authorized, management::SharedSession, warning};

pub async fn devices(Extension(session): Extension<SharedSession>) -> Response {
    let (client, token) = match ensure_authorized(&session).await {
        Ok(authorized) => authorized,
        Err(rejection) => return rejection.into_response(),
    };

    match client.devices(&token).await {
        Ok(body) => Json(body).into_response(),
        Err(e) => {
            warning!("Error fetching devices: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch devices").into_response()
        }
    }
}
