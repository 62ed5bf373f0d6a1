use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::application::TokenValidator;
use crate::domain::ErrorEnvelope;

/// Bearer-token middleware
///
/// On success the [`ValidatedToken`](crate::application::ValidatedToken) is
/// inserted into the request extensions for handlers to use. Missing or
/// rejected tokens get the 401 envelope.
pub async fn require_bearer_token(
    State(validator): State<Arc<TokenValidator>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ErrorEnvelope> {
    let token = bearer_token(request.headers()).unwrap_or_default().to_string();
    let validated = validator.validate(&token).await?;

    request.extensions_mut().insert(validated);
    Ok(next.run(request).await)
}

/// Token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
