//! Adapters turning third-party errors into tagged failures

mod database;
mod validation;

pub use database::database_error_code;
pub use validation::validate_payload;
