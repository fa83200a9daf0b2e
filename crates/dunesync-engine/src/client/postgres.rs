//! PostgreSQL client wrapper: connection management and typed reads.
//!
//! The read path introspects native column types from the prepared
//! statement, so push jobs get their schema from the database itself rather
//! than the remote tag lookup.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use pg_escape::quote_identifier;
use tokio_postgres::types::Type;
use tokio_postgres::{NoTls, Row, Transaction};

use dunesync_types::{Column, ColumnType, MappingError, TypedTable};

use crate::error::SyncError;

pub struct PgClient {
    client: tokio_postgres::Client,
}

impl PgClient {
    /// Connect and spawn the connection driver task.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Database`] on connection failure.
    pub async fn connect(db_url: &str) -> Result<Self, SyncError> {
        let (client, connection) = tokio_postgres::connect(db_url, NoTls).await?;
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("postgres connection error: {e}");
            }
        });
        Ok(Self { client })
    }

    pub async fn transaction(&mut self) -> Result<Transaction<'_>, SyncError> {
        Ok(self.client.transaction().await?)
    }

    /// Read an entire table with its native column types.
    pub async fn read_table(&self, table: &str) -> Result<TypedTable, SyncError> {
        let query = format!("SELECT * FROM {}", quote_identifier(table));
        self.read_query(&query).await
    }

    /// Run a literal query and capture rows plus native column types.
    pub async fn read_query(&self, query: &str) -> Result<TypedTable, SyncError> {
        let statement = self.client.prepare(query).await?;
        let columns = statement
            .columns()
            .iter()
            .map(|c| Ok(Column::new(c.name(), pg_column_type(c.type_())?)))
            .collect::<Result<Vec<_>, SyncError>>()?;

        let rows = self.client.query(&statement, &[]).await?;
        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut cells = Vec::with_capacity(columns.len());
            for (idx, col) in row.columns().iter().enumerate() {
                cells.push(read_value(row, idx, col.type_())?);
            }
            out.push(cells);
        }

        tracing::debug!(rows = out.len(), "read {} columns from database", columns.len());
        Ok(TypedTable::new(columns, out)?)
    }
}

/// Map a native PostgreSQL type to the target-schema vocabulary.
fn pg_column_type(ty: &Type) -> Result<ColumnType, SyncError> {
    let mapped = match *ty {
        Type::BOOL => ColumnType::Boolean,
        Type::INT2 | Type::INT4 => ColumnType::Integer,
        Type::INT8 => ColumnType::BigInt,
        Type::FLOAT4 | Type::FLOAT8 => ColumnType::DoublePrecision,
        Type::VARCHAR | Type::TEXT | Type::BPCHAR | Type::NAME => ColumnType::Varchar,
        Type::BYTEA => ColumnType::Bytea,
        Type::DATE => ColumnType::Date,
        Type::TIMESTAMP | Type::TIMESTAMPTZ => ColumnType::Timestamp,
        ref other => {
            return Err(MappingError::UnknownColumnType(other.to_string()).into());
        }
    };
    Ok(mapped)
}

fn read_value(row: &Row, idx: usize, pg_type: &Type) -> Result<dunesync_types::Value, SyncError> {
    use dunesync_types::Value;

    let value = match *pg_type {
        Type::BOOL => row.try_get::<_, Option<bool>>(idx)?.map(Value::Bool),
        Type::INT2 => row
            .try_get::<_, Option<i16>>(idx)?
            .map(|v| Value::Int(i32::from(v))),
        Type::INT4 => row.try_get::<_, Option<i32>>(idx)?.map(Value::Int),
        Type::INT8 => row.try_get::<_, Option<i64>>(idx)?.map(Value::BigInt),
        Type::FLOAT4 => row
            .try_get::<_, Option<f32>>(idx)?
            .map(|v| Value::Double(f64::from(v))),
        Type::FLOAT8 => row.try_get::<_, Option<f64>>(idx)?.map(Value::Double),
        Type::VARCHAR | Type::TEXT | Type::BPCHAR | Type::NAME => {
            row.try_get::<_, Option<String>>(idx)?.map(Value::Text)
        }
        Type::BYTEA => row.try_get::<_, Option<Vec<u8>>>(idx)?.map(Value::Bytes),
        Type::DATE => row.try_get::<_, Option<NaiveDate>>(idx)?.map(Value::Date),
        Type::TIMESTAMP => row
            .try_get::<_, Option<NaiveDateTime>>(idx)?
            .map(Value::Timestamp),
        Type::TIMESTAMPTZ => row
            .try_get::<_, Option<DateTime<Utc>>>(idx)?
            .map(|v| Value::Timestamp(v.naive_utc())),
        ref other => {
            return Err(MappingError::UnknownColumnType(other.to_string()).into());
        }
    };
    Ok(value.unwrap_or(Value::Null))
}
