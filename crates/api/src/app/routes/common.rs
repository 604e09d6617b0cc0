use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// 201 with a `Location` header pointing at the new resource.
pub fn created<T: Serialize>(location: String, body: T) -> Response {
    match HeaderValue::from_str(&location) {
        Ok(value) => (StatusCode::CREATED, [(header::LOCATION, value)], Json(body)).into_response(),
        Err(error) => {
            tracing::warn!(%location, %error, "dropping unencodable Location header");
            (StatusCode::CREATED, Json(body)).into_response()
        }
    }
}

/// 204 with no body.
pub fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}
