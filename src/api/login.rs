use axum::{
    Extension,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::{api::UNINITIALIZED, management::SharedSession};

pub async fn login(Extension(session): Extension<SharedSession>) -> Response {
    let session = session.lock().await;
    match session.client() {
        Some(client) => (
            StatusCode::FOUND,
            [(header::LOCATION, client.authorize_url())],
            "",
        )
            .into_response(),
        None => (StatusCode::INTERNAL_SERVER_ERROR, UNINITIALIZED).into_response(),
    }
}
