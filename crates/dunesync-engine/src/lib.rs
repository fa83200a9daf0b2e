//! Job execution and type-mapping engine for Dune <-> PostgreSQL
//! synchronization.
//!
//! A job file declares pull jobs (Dune query results into PostgreSQL tables)
//! and push jobs (PostgreSQL tables or queries uploaded to Dune). The engine
//! resolves each job into a source/destination pairing, drives the remote
//! execution to completion, maps the loosely-typed result into a
//! [`dunesync_types::TypedTable`], and hands it to a destination adapter.

pub mod client;
pub mod config;
pub mod dest;
pub mod error;
pub mod mapper;
pub mod poller;
pub mod runner;

pub use config::{Env, RuntimeConfig};
pub use error::SyncError;
pub use runner::JobRunner;
