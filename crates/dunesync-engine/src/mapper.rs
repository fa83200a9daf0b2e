//! Maps a loosely-typed remote result set into a strongly-typed table.
//!
//! Each remote type tag resolves through the fixed lookup in
//! [`ColumnType::from_remote_tag`]; no value is coerced beyond its declared
//! type, and column/row order is preserved exactly as given.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use dunesync_types::{decode_hex, Column, ColumnType, MappingError, TypedTable, Value};

/// Remote timestamps arrive as e.g. `2024-09-28 13:12:11.000 UTC`.
const REMOTE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f UTC";

/// Convert a remote result payload into a [`TypedTable`].
///
/// An empty-but-present result set with column metadata produces a zero-row
/// table that still carries its columns and types. A result with neither
/// rows nor metadata produces the explicit empty-table marker. The
/// null-result case never reaches the mapper; the poller rejects it first.
///
/// # Errors
///
/// Returns a [`MappingError`] for unknown type tags, malformed varbinary
/// encodings, mismatched metadata, or cells incompatible with their column.
pub fn map_result(result: &dunesync_types::ExecutionResult) -> Result<TypedTable, MappingError> {
    let metadata = &result.metadata;
    if metadata.column_names.is_empty() && metadata.column_types.is_empty() {
        if result.rows.is_empty() {
            return Ok(TypedTable::empty());
        }
        return Err(MappingError::MissingMetadata {
            rows: result.rows.len(),
        });
    }
    if metadata.column_names.len() != metadata.column_types.len() {
        return Err(MappingError::MetadataMismatch {
            names: metadata.column_names.len(),
            types: metadata.column_types.len(),
        });
    }

    let columns = metadata
        .column_names
        .iter()
        .zip(&metadata.column_types)
        .map(|(name, tag)| Ok(Column::new(name, ColumnType::from_remote_tag(tag)?)))
        .collect::<Result<Vec<_>, MappingError>>()?;

    let rows = result
        .rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| convert_cell(row.get(&column.name), column))
                .collect::<Result<Vec<_>, MappingError>>()
        })
        .collect::<Result<Vec<_>, MappingError>>()?;

    TypedTable::new(columns, rows)
}

fn convert_cell(
    raw: Option<&serde_json::Value>,
    column: &Column,
) -> Result<Value, MappingError> {
    // Absent keys and explicit nulls both map to SQL NULL.
    let Some(raw) = raw else {
        return Ok(Value::Null);
    };
    if raw.is_null() {
        return Ok(Value::Null);
    }

    match column.ty {
        ColumnType::BigInt => raw
            .as_i64()
            .map(Value::BigInt)
            .ok_or_else(|| incompatible(column, "bigint")),
        ColumnType::Integer => raw
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .map(Value::Int)
            .ok_or_else(|| incompatible(column, "integer")),
        ColumnType::Boolean => raw
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| incompatible(column, "boolean")),
        ColumnType::DoublePrecision => raw
            .as_f64()
            .map(Value::Double)
            .ok_or_else(|| incompatible(column, "double")),
        ColumnType::Varchar => raw
            .as_str()
            .map(|s| Value::Text(s.to_string()))
            .ok_or_else(|| incompatible(column, "varchar")),
        ColumnType::Bytea => {
            let encoded = raw.as_str().ok_or_else(|| incompatible(column, "varbinary"))?;
            decode_hex(encoded).map(Value::Bytes)
        }
        ColumnType::Date => raw
            .as_str()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            .map(Value::Date)
            .ok_or_else(|| incompatible(column, "date")),
        ColumnType::Timestamp => raw
            .as_str()
            .and_then(parse_timestamp)
            .map(Value::Timestamp)
            .ok_or_else(|| incompatible(column, "timestamp")),
    }
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, REMOTE_TIMESTAMP_FORMAT)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc()))
}

fn incompatible(column: &Column, expected: &'static str) -> MappingError {
    MappingError::IncompatibleValue {
        column: column.name.clone(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dunesync_types::ExecutionResult;

    fn sample_result() -> ExecutionResult {
        serde_json::from_value(serde_json::json!({
            "rows": [
                {
                    "block_date": "2024-09-28",
                    "block_number": 20849352u64,
                    "block_time": "2024-09-28 13:12:11.000 UTC",
                    "hash": "0x5f0b3f5d3f15bf9943b1b6c77f69",
                    "success": true,
                    "type": "DynamicFee",
                }
            ],
            "metadata": {
                "column_names": [
                    "block_time", "block_number", "success", "hash", "type", "block_date",
                ],
                "column_types": [
                    "timestamp with time zone", "bigint", "boolean",
                    "varbinary", "varchar", "date",
                ],
            },
        }))
        .unwrap()
    }

    #[test]
    fn maps_the_sample_result_with_full_type_fidelity() {
        let table = map_result(&sample_result()).unwrap();

        assert_eq!(table.column_count(), 6);
        assert_eq!(table.row_count(), 1);
        let names: Vec<_> = table.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            ["block_time", "block_number", "success", "hash", "type", "block_date"]
        );
        let types: Vec<_> = table.columns().iter().map(|c| c.ty).collect();
        assert_eq!(
            types,
            [
                ColumnType::Timestamp,
                ColumnType::BigInt,
                ColumnType::Boolean,
                ColumnType::Bytea,
                ColumnType::Varchar,
                ColumnType::Date,
            ]
        );

        let row = &table.rows()[0];
        assert_eq!(
            row[0],
            Value::Timestamp(
                NaiveDate::from_ymd_opt(2024, 9, 28)
                    .unwrap()
                    .and_hms_opt(13, 12, 11)
                    .unwrap()
            )
        );
        assert_eq!(row[1], Value::BigInt(20_849_352));
        assert_eq!(row[2], Value::Bool(true));
        match &row[3] {
            Value::Bytes(bytes) => {
                assert_eq!(bytes.len(), 14);
                assert_eq!(bytes[..4], [0x5f, 0x0b, 0x3f, 0x5d]);
            }
            other => panic!("expected bytes, got {other:?}"),
        }
        assert_eq!(row[4], Value::Text("DynamicFee".to_string()));
        assert_eq!(
            row[5],
            Value::Date(NaiveDate::from_ymd_opt(2024, 9, 28).unwrap())
        );
    }

    #[test]
    fn zero_rows_with_metadata_keeps_columns_and_types() {
        let result: ExecutionResult = serde_json::from_value(serde_json::json!({
            "rows": [],
            "metadata": {
                "column_names": ["block_number"],
                "column_types": ["bigint"],
            },
        }))
        .unwrap();
        let table = map_result(&result).unwrap();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 1);
        assert!(!table.is_empty());
    }

    #[test]
    fn no_rows_and_no_metadata_is_the_empty_marker() {
        let table = map_result(&ExecutionResult::default()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn unknown_type_tag_fails_naming_the_tag() {
        let result: ExecutionResult = serde_json::from_value(serde_json::json!({
            "rows": [],
            "metadata": {
                "column_names": ["amount"],
                "column_types": ["uint256"],
            },
        }))
        .unwrap();
        let err = map_result(&result).unwrap_err();
        assert_eq!(err, MappingError::UnknownColumnType("uint256".to_string()));
    }

    #[test]
    fn mismatched_metadata_lengths_are_rejected() {
        let result: ExecutionResult = serde_json::from_value(serde_json::json!({
            "rows": [],
            "metadata": {
                "column_names": ["a", "b"],
                "column_types": ["bigint"],
            },
        }))
        .unwrap();
        assert_eq!(
            map_result(&result).unwrap_err(),
            MappingError::MetadataMismatch { names: 2, types: 1 }
        );
    }

    #[test]
    fn malformed_hex_fails_the_run() {
        let result: ExecutionResult = serde_json::from_value(serde_json::json!({
            "rows": [{"hash": "0x5f0"}],
            "metadata": {
                "column_names": ["hash"],
                "column_types": ["varbinary"],
            },
        }))
        .unwrap();
        assert_eq!(
            map_result(&result).unwrap_err(),
            MappingError::InvalidHex("0x5f0".to_string())
        );
    }

    #[test]
    fn empty_hex_decodes_to_zero_bytes() {
        let result: ExecutionResult = serde_json::from_value(serde_json::json!({
            "rows": [{"hash": "0x"}],
            "metadata": {
                "column_names": ["hash"],
                "column_types": ["varbinary"],
            },
        }))
        .unwrap();
        let table = map_result(&result).unwrap();
        assert_eq!(table.rows()[0][0], Value::Bytes(Vec::new()));
    }

    #[test]
    fn incompatible_cell_names_the_column() {
        let result: ExecutionResult = serde_json::from_value(serde_json::json!({
            "rows": [{"block_number": "not a number"}],
            "metadata": {
                "column_names": ["block_number"],
                "column_types": ["bigint"],
            },
        }))
        .unwrap();
        assert_eq!(
            map_result(&result).unwrap_err(),
            MappingError::IncompatibleValue {
                column: "block_number".to_string(),
                expected: "bigint",
            }
        );
    }

    #[test]
    fn absent_keys_and_nulls_become_sql_null() {
        let result: ExecutionResult = serde_json::from_value(serde_json::json!({
            "rows": [{"a": null}],
            "metadata": {
                "column_names": ["a", "b"],
                "column_types": ["bigint", "varchar"],
            },
        }))
        .unwrap();
        let table = map_result(&result).unwrap();
        assert_eq!(table.rows()[0], vec![Value::Null, Value::Null]);
    }

    #[test]
    fn rfc3339_timestamps_are_accepted() {
        assert_eq!(
            parse_timestamp("2024-09-28T13:12:11Z"),
            parse_timestamp("2024-09-28 13:12:11.000 UTC")
        );
        assert!(parse_timestamp("yesterday").is_none());
    }
}
