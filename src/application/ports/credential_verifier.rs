use async_trait::async_trait;
#[cfg(test)]
use mockall::{automock, predicate::*};

use crate::domain::{Principal, VerificationError};

/// Port for checking a bearer credential
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Verify the token and return the principal it was issued to
    async fn verify(&self, token: &str) -> Result<Principal, VerificationError>;
}
