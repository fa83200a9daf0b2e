//! Shared data model for Dune <-> PostgreSQL synchronization: scalar values,
//! typed tables, the column type vocabulary, and remote execution states.

pub mod binary;
pub mod column;
pub mod error;
pub mod execution;
pub mod table;
pub mod value;

pub use binary::{decode_hex, encode_hex};
pub use column::{Column, ColumnType};
pub use error::{ExecutionError, MappingError};
pub use execution::{ExecutionResponse, ExecutionResult, ExecutionState, ResultsResponse};
pub use table::TypedTable;
pub use value::Value;
