use axum::Json;
use utoipa::OpenApi;

use crate::api::handlers::{EchoRequest, EchoResponse, HealthResponse, SessionResponse};
use crate::domain::ErrorEnvelope;

/// OpenAPI document for the demo service
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Error Boundary API",
        version = "0.1.0",
        description = "Demo service whose failures are all rendered as error envelopes"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        crate::api::handlers::health::health_handler,
        crate::api::handlers::session::session_handler,
        crate::api::handlers::echo::echo_handler,
    ),
    components(
        schemas(
            ErrorEnvelope,
            HealthResponse,
            SessionResponse,
            EchoRequest,
            EchoResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "session", description = "Bearer-token protected endpoints"),
        (name = "echo", description = "Payload validation demo")
    )
)]
pub struct ApiDoc;

/// GET /api-docs/openapi.json
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
