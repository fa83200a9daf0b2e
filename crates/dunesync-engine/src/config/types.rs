//! Validated job descriptors.
//!
//! Descriptors are constructed once at config-load time from validated input
//! and never mutated; each scheduled run consumes them read-only.

use std::fmt;

use serde::Deserialize;

/// One end of a synchronization job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Dune,
    Postgres,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Dune => "DUNE",
            Self::Postgres => "POSTGRES",
        };
        f.write_str(s)
    }
}

/// Compute tier selected when triggering a remote execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryEngine {
    #[default]
    Medium,
    Large,
}

impl QueryEngine {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

/// What to do when the destination table already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    Replace,
    #[default]
    Append,
    Fail,
}

/// A pull job: one Dune query result persisted into one PostgreSQL table.
#[derive(Debug, Clone)]
pub struct PullJob {
    pub query_id: u32,
    pub table_name: String,
    /// Poll interval in seconds; always > 0.
    pub poll_frequency: u64,
    pub query_engine: QueryEngine,
    pub if_exists: WriteMode,
}

/// Local side of a push job: read a whole table or run a literal query.
#[derive(Debug, Clone)]
pub enum PushSource {
    Table(String),
    Query(String),
}

/// A push job: local rows uploaded to Dune under a target table name.
#[derive(Debug, Clone)]
pub struct PushJob {
    pub source: PushSource,
    pub target_table: String,
}

/// All configured jobs, partitioned by direction with input order preserved.
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    pub pull_jobs: Vec<PullJob>,
    pub push_jobs: Vec<PushJob>,
}
