//! PostgreSQL destination: typed DDL plus row inserts in one transaction.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use pg_escape::quote_identifier;
use tokio_postgres::types::ToSql;

use dunesync_types::{ColumnType, TypedTable, Value};

use crate::client::PgClient;
use crate::config::WriteMode;
use crate::dest::Destination;
use crate::error::SyncError;

pub struct PostgresDestination {
    client: PgClient,
    table_name: String,
    if_exists: WriteMode,
}

impl PostgresDestination {
    /// Connect to the database this destination writes into.
    pub async fn connect(
        db_url: &str,
        table_name: impl Into<String>,
        if_exists: WriteMode,
    ) -> Result<Self, SyncError> {
        Ok(Self {
            client: PgClient::connect(db_url).await?,
            table_name: table_name.into(),
            if_exists,
        })
    }
}

#[async_trait]
impl Destination for PostgresDestination {
    /// Write the table inside a single transaction.
    ///
    /// `Replace` drops and recreates the table; `Append` creates it only if
    /// absent; `Fail` issues a bare `CREATE TABLE` so an existing table
    /// aborts the transaction through PostgreSQL's own duplicate check.
    async fn save(&mut self, table: &TypedTable) -> Result<(), SyncError> {
        if table.is_empty() {
            tracing::warn!(table = %self.table_name, "result carried no columns, skipping write");
            return Ok(());
        }

        let create = create_table_sql(&self.table_name, table, self.if_exists);
        let insert = insert_sql(&self.table_name, table);

        let tx = self.client.transaction().await?;
        if self.if_exists == WriteMode::Replace {
            tx.execute(
                &format!("DROP TABLE IF EXISTS {}", quote_identifier(&self.table_name)),
                &[],
            )
            .await?;
        }
        tx.execute(&create, &[]).await?;

        let statement = tx.prepare(&insert).await?;
        for row in table.rows() {
            let params: Vec<SqlParam<'_>> = row
                .iter()
                .zip(table.columns())
                .map(|(value, column)| sql_param(value, column.ty))
                .collect();
            let param_refs: Vec<&(dyn ToSql + Sync)> =
                params.iter().map(SqlParam::as_tosql).collect();
            tx.execute(&statement, &param_refs).await?;
        }
        tx.commit().await?;

        tracing::info!(
            table = %self.table_name,
            rows = table.row_count(),
            mode = ?self.if_exists,
            "wrote table to postgres"
        );
        Ok(())
    }
}

fn create_table_sql(table_name: &str, table: &TypedTable, if_exists: WriteMode) -> String {
    let columns: Vec<String> = table
        .columns()
        .iter()
        .map(|c| format!("{} {}", quote_identifier(&c.name), c.ty.pg_type()))
        .collect();
    let if_not_exists = match if_exists {
        WriteMode::Append => "IF NOT EXISTS ",
        WriteMode::Replace | WriteMode::Fail => "",
    };
    format!(
        "CREATE TABLE {}{} ({})",
        if_not_exists,
        quote_identifier(table_name),
        columns.join(", ")
    )
}

fn insert_sql(table_name: &str, table: &TypedTable) -> String {
    let columns: Vec<String> = table
        .columns()
        .iter()
        .map(|c| quote_identifier(&c.name).into_owned())
        .collect();
    let placeholders: Vec<String> = (1..=table.column_count()).map(|i| format!("${i}")).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_identifier(table_name),
        columns.join(", "),
        placeholders.join(", ")
    )
}

/// Wire parameter with the concrete SQL type resolved once per cell, so
/// nulls are typed correctly for their column.
enum SqlParam<'a> {
    Bool(Option<bool>),
    Int(Option<i32>),
    BigInt(Option<i64>),
    Double(Option<f64>),
    Text(Option<&'a str>),
    Bytes(Option<&'a [u8]>),
    Date(Option<NaiveDate>),
    Timestamp(Option<NaiveDateTime>),
}

impl SqlParam<'_> {
    fn as_tosql(&self) -> &(dyn ToSql + Sync) {
        match self {
            Self::Bool(v) => v,
            Self::Int(v) => v,
            Self::BigInt(v) => v,
            Self::Double(v) => v,
            Self::Text(v) => v,
            Self::Bytes(v) => v,
            Self::Date(v) => v,
            Self::Timestamp(v) => v,
        }
    }
}

fn sql_param<'a>(value: &'a Value, ty: ColumnType) -> SqlParam<'a> {
    match value {
        Value::Null => null_param(ty),
        Value::Bool(v) => SqlParam::Bool(Some(*v)),
        Value::Int(v) => SqlParam::Int(Some(*v)),
        Value::BigInt(v) => SqlParam::BigInt(Some(*v)),
        Value::Double(v) => SqlParam::Double(Some(*v)),
        Value::Text(v) => SqlParam::Text(Some(v)),
        Value::Bytes(v) => SqlParam::Bytes(Some(v)),
        Value::Date(v) => SqlParam::Date(Some(*v)),
        Value::Timestamp(v) => SqlParam::Timestamp(Some(*v)),
    }
}

fn null_param<'a>(ty: ColumnType) -> SqlParam<'a> {
    match ty {
        ColumnType::Boolean => SqlParam::Bool(None),
        ColumnType::Integer => SqlParam::Int(None),
        ColumnType::BigInt => SqlParam::BigInt(None),
        ColumnType::DoublePrecision => SqlParam::Double(None),
        ColumnType::Varchar => SqlParam::Text(None),
        ColumnType::Bytea => SqlParam::Bytes(None),
        ColumnType::Date => SqlParam::Date(None),
        ColumnType::Timestamp => SqlParam::Timestamp(None),
    }
}
