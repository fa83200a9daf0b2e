//! Engine error taxonomy.
//!
//! `Config` is fatal at startup and aborts the whole config load. `Mapping`
//! and `Execution` are fatal for a single job run. `Database` and `Api` are
//! transport errors surfaced unmodified from the collaborating clients; the
//! engine never masks or retries them.

use thiserror::Error;

use dunesync_types::{ExecutionError, MappingError};

#[derive(Debug, Error)]
pub enum SyncError {
    /// Bad or missing config field, invalid direction pair, invalid enum value.
    #[error("{0}")]
    Config(String),
    /// The remote result set could not be mapped into the target schema.
    #[error(transparent)]
    Mapping(#[from] MappingError),
    /// The remote execution reached a non-success terminal state or returned
    /// a null result.
    #[error(transparent)]
    Execution(#[from] ExecutionError),
    /// Database connectivity or query failure.
    #[error("database error: {0}")]
    Database(#[from] tokio_postgres::Error),
    /// Remote API connectivity or protocol failure.
    #[error("dune api error: {0}")]
    Api(#[from] reqwest::Error),
    /// CSV serialization failure on the upload path.
    #[error("csv serialization failed: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use dunesync_types::ExecutionState;

    #[test]
    fn mapping_error_passes_through_transparently() {
        let err: SyncError = MappingError::UnknownColumnType("uint256".to_string()).into();
        assert_eq!(err.to_string(), "unknown column type: uint256");
    }

    #[test]
    fn execution_error_carries_the_terminal_state() {
        let err: SyncError = ExecutionError::Terminal {
            execution_id: "01JB4".to_string(),
            state: ExecutionState::Failed,
        }
        .into();
        assert!(err.to_string().contains("FAILED"));
    }
}
