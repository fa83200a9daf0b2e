//! Target-schema column type vocabulary and the remote type tag lookup.

use std::fmt;

use crate::error::MappingError;

/// Target-schema column type.
///
/// This is the closed vocabulary that every remote result column must resolve
/// into before any value reaches a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    BigInt,
    Boolean,
    Bytea,
    Varchar,
    Date,
    Timestamp,
    DoublePrecision,
    Integer,
}

impl ColumnType {
    /// Resolve a remote result-set type tag into the target vocabulary.
    ///
    /// The mapping is a fixed, total lookup over the known remote tags.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::UnknownColumnType`] naming the offending tag.
    pub fn from_remote_tag(tag: &str) -> Result<Self, MappingError> {
        match tag {
            "timestamp with time zone" => Ok(Self::Timestamp),
            "bigint" => Ok(Self::BigInt),
            "boolean" => Ok(Self::Boolean),
            "varbinary" => Ok(Self::Bytea),
            "varchar" => Ok(Self::Varchar),
            "date" => Ok(Self::Date),
            "double" => Ok(Self::DoublePrecision),
            "integer" => Ok(Self::Integer),
            other => Err(MappingError::UnknownColumnType(other.to_string())),
        }
    }

    /// PostgreSQL DDL type for this column.
    pub fn pg_type(self) -> &'static str {
        match self {
            Self::BigInt => "BIGINT",
            Self::Boolean => "BOOLEAN",
            Self::Bytea => "BYTEA",
            Self::Varchar => "VARCHAR",
            Self::Date => "DATE",
            Self::Timestamp => "TIMESTAMP",
            Self::DoublePrecision => "DOUBLE PRECISION",
            Self::Integer => "INTEGER",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pg_type())
    }
}

/// A named, typed column of a [`TypedTable`](crate::table::TypedTable).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self { name: name.into(), ty }
    }
}
