use std::sync::Arc;

use serde::Serialize;

use crate::application::ports::{CredentialVerifier, ErrorLogger};
use crate::domain::{Credentials, ErrorEnvelope, Principal};
use crate::infrastructure::logging::TracingErrorLogger;

/// Message returned to the caller for any rejected token
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid token";

/// Outcome of a successful validation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedToken {
    pub principal: Principal,
    pub credentials: Credentials,
}

/// Checks bearer tokens and turns any rejection into a 401 envelope
#[derive(Clone)]
pub struct TokenValidator {
    verifier: Arc<dyn CredentialVerifier>,
    logger: Arc<dyn ErrorLogger>,
}

impl TokenValidator {
    pub fn new(verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self::with_logger(verifier, Arc::new(TracingErrorLogger))
    }

    pub fn with_logger(verifier: Arc<dyn CredentialVerifier>, logger: Arc<dyn ErrorLogger>) -> Self {
        Self { verifier, logger }
    }

    /// Validate a credential.
    ///
    /// The verifier is called exactly once. Its error never escapes; the
    /// reason is logged and the caller gets the unauthorized envelope.
    pub async fn validate(&self, credential: &str) -> Result<ValidatedToken, ErrorEnvelope> {
        match self.verifier.verify(credential).await {
            Ok(principal) => Ok(ValidatedToken {
                principal,
                credentials: Credentials {
                    token: credential.to_string(),
                },
            }),
            Err(err) => {
                self.logger
                    .log_error(&format!("Token validation failed: {}", err));
                Err(unauthorized())
            }
        }
    }
}

impl std::fmt::Debug for TokenValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenValidator").finish_non_exhaustive()
    }
}

/// The envelope returned for rejected tokens
pub fn unauthorized() -> ErrorEnvelope {
    ErrorEnvelope::unauthorized(INVALID_TOKEN_MESSAGE)
}
