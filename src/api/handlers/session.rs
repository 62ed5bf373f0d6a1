use std::sync::Arc;

use axum::{extract::State, response::Response, Extension};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::api::controller::Controller;
use crate::application::ValidatedToken;
use crate::domain::Failure;

/// The authenticated caller
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub subject: String,
    /// Expiry, seconds since the Unix epoch
    pub expires_at: u64,
    #[schema(value_type = Object)]
    pub claims: Value,
}

impl From<ValidatedToken> for SessionResponse {
    fn from(token: ValidatedToken) -> Self {
        Self {
            subject: token.principal.sub,
            expires_at: token.principal.exp,
            claims: Value::Object(token.principal.claims),
        }
    }
}

/// GET /v1/session
#[utoipa::path(
    get,
    path = "/v1/session",
    tag = "session",
    responses(
        (status = 200, description = "Current principal", body = SessionResponse),
        (status = 401, description = "Missing or invalid token", body = crate::domain::ErrorEnvelope)
    )
)]
pub async fn session_handler(
    State(controller): State<Arc<Controller>>,
    Extension(token): Extension<ValidatedToken>,
) -> Response {
    controller
        .handle("GET /v1/session", async move {
            Ok::<_, Failure>(SessionResponse::from(token))
        })
        .await
}
