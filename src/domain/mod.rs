pub mod constructors;
pub mod envelope;
pub mod errors;
pub mod failure;
pub mod principal;

pub use constructors::ErrorKind;
pub use envelope::{status_label, ErrorEnvelope};
pub use errors::{ConfigError, VerificationError};
pub use failure::{
    DatabaseErrorCode, DatabaseFailure, ErrorCategory, Failure, FieldDetail, UnknownFailure,
    UpstreamFailure, UpstreamResponse, ValidationFailure,
};
pub use principal::{Credentials, Principal};
