//! Strongly-typed rectangular table produced by the type mapper and consumed
//! by destination adapters.

use crate::column::Column;
use crate::error::MappingError;
use crate::value::Value;

/// A rectangular table with an ordered, typed column list.
///
/// Column and row order are preserved exactly as produced by the source.
/// The zero-column, zero-row value is the explicit empty-table marker used
/// when a result set carries neither rows nor column metadata.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypedTable {
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
}

impl TypedTable {
    /// Build a table, enforcing that every row has one value per column.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::RowWidth`] for the first ragged row.
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<Value>>) -> Result<Self, MappingError> {
        for (row_index, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(MappingError::RowWidth {
                    row_index,
                    expected: columns.len(),
                    found: row.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    /// The empty-table marker: no columns, no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True only for the empty-table marker; a zero-row table that still
    /// carries columns is not empty.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }
}
