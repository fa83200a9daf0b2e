//! Declarative job configuration: environment secrets and the validated,
//! immutable job list.

mod env;
mod parser;
mod types;

pub use env::Env;
pub use types::{
    DataSource, PullJob, PushJob, PushSource, QueryEngine, RuntimeConfig, WriteMode,
};
