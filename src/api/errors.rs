use axum::{
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::ErrorEnvelope;

impl IntoResponse for ErrorEnvelope {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}
