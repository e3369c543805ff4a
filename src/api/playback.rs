use std::collections::HashMap;

use axum::{
    Extension, Json,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::{api::ensure_authorized, management::SharedSession, utils, warning};

pub async fn play(
    Query(params): Query<HashMap<String, String>>,
    Extension(session): Extension<SharedSession>,
    body: Option<Json<Value>>,
) -> Response {
    let body = body.map(|Json(value)| value);
    let uri = utils::required_param(&params, body.as_ref(), "uri");
    let device_id = utils::required_param(&params, body.as_ref(), "deviceId");

    let (Some(uri), Some(device_id)) = (uri, device_id) else {
        return (StatusCode::BAD_REQUEST, "URI and deviceId are required").into_response();
    };

    let (client, token) = match ensure_authorized(&session).await {
        Ok(authorized) => authorized,
        Err(rejection) => return rejection.into_response(),
    };

    match client.play(&token, &device_id, &uri).await {
        Ok(()) => (StatusCode::OK, "Playback started successfully").into_response(),
        Err(e) => {
            warning!("Error starting playback: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to start playback",
            )
                .into_response()
        }
    }
}

pub async fn stop(
    Query(params): Query<HashMap<String, String>>,
    Extension(session): Extension<SharedSession>,
    body: Option<Json<Value>>,
) -> Response {
    let body = body.map(|Json(value)| value);
    let Some(device_id) = utils::required_param(&params, body.as_ref(), "deviceId") else {
        return (StatusCode::BAD_REQUEST, "deviceId is required").into_response();
    };

    let (client, token) = match ensure_authorized(&session).await {
        Ok(authorized) => authorized,
        Err(rejection) => return rejection.into_response(),
    };

    match client.pause(&token, &device_id).await {
        Ok(()) => (StatusCode::OK, "Playback stopped successfully").into_response(),
        Err(e) => {
            warning!("Error stopping playback: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to stop playback").into_response()
        }
    }
}
