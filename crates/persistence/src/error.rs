//! Persistence errors

use scylla::transport::errors::{NewSessionError, QueryError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Invalid store URI: {0}")]
    InvalidUri(String),

    #[error("Connection failed: {0}")]
    Connection(#[from] NewSessionError),

    #[error("Query failed: {0}")]
    Query(#[from] QueryError),

    #[error("Schema error: {0}")]
    SchemaError(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Store failures reach callers as internal errors; the detail stays in logs
impl From<PersistenceError> for audiogen_core::Error {
    fn from(err: PersistenceError) -> Self {
        audiogen_core::Error::internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_core_error_is_internal() {
        let err: audiogen_core::Error = PersistenceError::InvalidData("bad row".into()).into();
        assert!(matches!(err, audiogen_core::Error::Internal(_)));
        assert!(err.to_string().contains("bad row"));
    }
}
