use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::controller::Controller;
use crate::domain::{ErrorEnvelope, Failure};
use crate::infrastructure::failures::validate_payload;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EchoRequest {
    #[validate(length(min = 1, max = 280, message = "\"message\" must be 1-280 characters"))]
    pub message: String,
    #[validate(range(min = 1, max = 10, message = "\"repeat\" must be between 1 and 10"))]
    #[serde(default)]
    pub repeat: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EchoResponse {
    pub echo: Vec<String>,
}

impl From<EchoRequest> for EchoResponse {
    fn from(request: EchoRequest) -> Self {
        let times = request.repeat.unwrap_or(1) as usize;
        Self {
            echo: vec![request.message; times],
        }
    }
}

/// POST /v1/echo
#[utoipa::path(
    post,
    path = "/v1/echo",
    tag = "echo",
    request_body = EchoRequest,
    responses(
        (status = 200, description = "Echoed message", body = EchoResponse),
        (status = 400, description = "Malformed JSON body", body = ErrorEnvelope),
        (status = 422, description = "Payload failed validation", body = ErrorEnvelope)
    )
)]
pub async fn echo_handler(
    State(controller): State<Arc<Controller>>,
    payload: Result<Json<EchoRequest>, JsonRejection>,
) -> Response {
    controller
        .handle("POST /v1/echo", async move {
            let Json(request) =
                payload.map_err(|rejection| ErrorEnvelope::bad_request(rejection.body_text()))?;
            validate_payload(&request)?;
            Ok::<_, Failure>(EchoResponse::from(request))
        })
        .await
}
