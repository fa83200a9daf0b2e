//! Owned scalar values carried between the remote result set and the database.

use chrono::{NaiveDate, NaiveDateTime};

/// One cell of a [`TypedTable`](crate::table::TypedTable).
///
/// Every variant corresponds to exactly one [`ColumnType`](crate::column::ColumnType);
/// `Null` is permitted in any column.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i32),
    BigInt(i64),
    Double(f64),
    Text(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}
