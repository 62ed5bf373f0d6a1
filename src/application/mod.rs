pub mod classifier;
pub mod ports;
pub mod registry;
pub mod token_validator;

pub use classifier::{classify, Classifier, DATABASE_UNREACHABLE_MESSAGE};
pub use registry::{OverrideEntry, OverrideRegistry, OverrideSeed};
pub use token_validator::{unauthorized, TokenValidator, ValidatedToken, INVALID_TOKEN_MESSAGE};
