use serde_json::{json, Map, Value};

use crate::domain::{DatabaseErrorCode, DatabaseFailure, Failure};

/// Map a `sqlx` error to a driver-level code.
///
/// Unique violations are conflicts; transport-level problems mean the
/// database could not be reached.
pub fn database_error_code(err: &sqlx::Error) -> DatabaseErrorCode {
    match err {
        sqlx::Error::Database(db)
            if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
        {
            DatabaseErrorCode::ConditionalCheckFailed
        }
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed => DatabaseErrorCode::Networking,
        sqlx::Error::Database(db) => DatabaseErrorCode::Other(
            db.code()
                .map(|code| code.into_owned())
                .unwrap_or_else(|| "DatabaseError".to_string()),
        ),
        sqlx::Error::Configuration(_) => DatabaseErrorCode::Other("Configuration".to_string()),
        sqlx::Error::RowNotFound => DatabaseErrorCode::Other("RowNotFound".to_string()),
        sqlx::Error::TypeNotFound { .. } => DatabaseErrorCode::Other("TypeNotFound".to_string()),
        sqlx::Error::ColumnIndexOutOfBounds { .. } | sqlx::Error::ColumnNotFound(_) => {
            DatabaseErrorCode::Other("ColumnNotFound".to_string())
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            DatabaseErrorCode::Other("Decode".to_string())
        }
        sqlx::Error::Protocol(_) => DatabaseErrorCode::Other("Protocol".to_string()),
        sqlx::Error::WorkerCrashed => DatabaseErrorCode::Other("WorkerCrashed".to_string()),
        _ => DatabaseErrorCode::Other("DatabaseError".to_string()),
    }
}

impl From<&sqlx::Error> for DatabaseFailure {
    fn from(err: &sqlx::Error) -> Self {
        let code = database_error_code(err);
        let failure = DatabaseFailure::new(code, err.to_string());

        match err {
            sqlx::Error::Database(db) => {
                let mut data = Map::new();
                if let Some(table) = db.table() {
                    data.insert("table".to_string(), json!(table));
                }
                if let Some(constraint) = db.constraint() {
                    data.insert("constraint".to_string(), json!(constraint));
                }
                if data.is_empty() {
                    failure
                } else {
                    failure.with_data(Value::Object(data))
                }
            }
            _ => failure,
        }
    }
}

impl From<sqlx::Error> for DatabaseFailure {
    fn from(err: sqlx::Error) -> Self {
        DatabaseFailure::from(&err)
    }
}

impl From<sqlx::Error> for Failure {
    fn from(err: sqlx::Error) -> Self {
        Failure::Database(DatabaseFailure::from(&err))
    }
}
