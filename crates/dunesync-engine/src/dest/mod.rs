//! Destination adapters: persist a typed table to PostgreSQL or Dune.

mod dune;
mod postgres;

pub use dune::DuneDestination;
pub use postgres::PostgresDestination;

use async_trait::async_trait;

use dunesync_types::TypedTable;

use crate::error::SyncError;

/// Capability shared by both destinations: persist one typed table.
#[async_trait]
pub trait Destination: Send + Sync {
    async fn save(&mut self, table: &TypedTable) -> Result<(), SyncError>;
}
