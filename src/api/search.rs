use std::collections::HashMap;

use axum::{
    Extension, Json,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{api::ensure_authorized, management::SharedSession, warning};

pub async fn search(
    Query(params): Query<HashMap<String, String>>,
    Extension(session): Extension<SharedSession>,
) -> Response {
    // Parameter guard runs before the session guard so that malformed
    // requests never trigger an upstream call.
    let Some(query) = params.get("query") else {
        return (StatusCode::BAD_REQUEST, "Query parameter is required").into_response();
    };

    let (client, token) = match ensure_authorized(&session).await {
        Ok(authorized) => authorized,
        Err(rejection) => return rejection.into_response(),
    };

    match client.search_tracks(&token, query).await {
        Ok(items) => Json(items).into_response(),
        Err(e) => {
            warning!("Error searching tracks: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to search tracks").into_response()
        }
    }
}
