use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Successful JSON response; always 200
pub fn send_response<T>(payload: &T) -> Response
where
    T: Serialize,
{
    (StatusCode::OK, Json(payload)).into_response()
}
