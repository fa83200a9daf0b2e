//! Typed errors for result mapping and remote execution.

use thiserror::Error;

use crate::execution::ExecutionState;

/// A remote result set could not be mapped into the target schema.
///
/// Mapping errors abort the job run before any destination write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// The remote type tag is outside the fixed vocabulary.
    #[error("unknown column type: {0}")]
    UnknownColumnType(String),
    /// A varbinary cell was not a well-formed `0x`-prefixed hex string.
    #[error("invalid varbinary value: {0}")]
    InvalidHex(String),
    /// A cell's raw value does not match its column's declared type.
    #[error("column '{column}': expected a {expected} value")]
    IncompatibleValue {
        column: String,
        expected: &'static str,
    },
    /// Column name and type metadata sequences differ in length.
    #[error("column metadata mismatch: {names} names but {types} types")]
    MetadataMismatch { names: usize, types: usize },
    /// Rows are present but the result carries no column metadata.
    #[error("result has {rows} rows but no column metadata")]
    MissingMetadata { rows: usize },
    /// A row does not have one value per column.
    #[error("row {row_index} has {found} values, expected {expected}")]
    RowWidth {
        row_index: usize,
        expected: usize,
        found: usize,
    },
}

/// A remote execution did not produce a usable result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// The execution reached a terminal state other than completed.
    #[error("execution {execution_id} finished in state {state}")]
    Terminal {
        execution_id: String,
        state: ExecutionState,
    },
    /// A nominally completed execution carried no result payload.
    #[error("execution {0} completed without a result payload")]
    MissingResult(String),
}
