//! Network clients for the two collaborating systems.

pub mod dune;
pub mod postgres;

pub use dune::{DuneClient, HttpDuneClient};
pub use postgres::PgClient;
