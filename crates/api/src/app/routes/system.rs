use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::context::{Caller, CurrentPrincipal};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(
    Caller(caller): Caller,
    CurrentPrincipal(principal): CurrentPrincipal,
) -> impl IntoResponse {
    Json(serde_json::json!({
        "user_id": caller.to_string(),
        "roles": principal.roles().iter().map(|r| r.as_str()).collect::<Vec<_>>(),
    }))
}
