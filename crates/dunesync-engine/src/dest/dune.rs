//! Dune destination: serialize a typed table to CSV and upload it.

use std::sync::Arc;

use async_trait::async_trait;

use dunesync_types::{encode_hex, TypedTable, Value};

use crate::client::DuneClient;
use crate::dest::Destination;
use crate::error::SyncError;

pub struct DuneDestination {
    client: Arc<dyn DuneClient>,
    table_name: String,
}

impl DuneDestination {
    pub fn new(client: Arc<dyn DuneClient>, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

#[async_trait]
impl Destination for DuneDestination {
    async fn save(&mut self, table: &TypedTable) -> Result<(), SyncError> {
        if table.is_empty() {
            tracing::warn!(table = %self.table_name, "result carried no columns, skipping upload");
            return Ok(());
        }
        let data = to_csv(table)?;
        self.client.upload_table(&self.table_name, data).await?;
        tracing::info!(
            table = %self.table_name,
            rows = table.row_count(),
            "uploaded table to dune"
        );
        Ok(())
    }
}

/// Serialize a table to CSV: header row, bytes re-encoded as `0x` hex,
/// temporal values in ISO form, nulls as empty fields.
fn to_csv(table: &TypedTable) -> Result<String, SyncError> {
    let mut buf = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut buf);
        writer.write_record(table.columns().iter().map(|c| c.name.as_str()))?;
        for row in table.rows() {
            writer.write_record(row.iter().map(csv_field))?;
        }
        writer.flush()?;
    }
    String::from_utf8(buf)
        .map_err(|e| SyncError::Config(format!("csv output was not valid utf-8: {e}")))
}

fn csv_field(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(v) => v.to_string(),
        Value::Int(v) => v.to_string(),
        Value::BigInt(v) => v.to_string(),
        Value::Double(v) => v.to_string(),
        Value::Text(v) => v.clone(),
        Value::Bytes(v) => encode_hex(v),
        Value::Date(v) => v.to_string(),
        Value::Timestamp(v) => v.to_string(),
    }
}
