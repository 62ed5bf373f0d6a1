mod credential_verifier;
mod error_logger;

pub use credential_verifier::CredentialVerifier;
pub use error_logger::ErrorLogger;

#[cfg(test)]
pub use credential_verifier::MockCredentialVerifier;
#[cfg(test)]
pub use error_logger::MockErrorLogger;
