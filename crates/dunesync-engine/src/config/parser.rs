//! Job file parsing: YAML with `${VAR}` substitution, validated into an
//! immutable [`RuntimeConfig`].

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::config::types::{
    DataSource, PullJob, PushJob, PushSource, QueryEngine, RuntimeConfig, WriteMode,
};
use crate::error::SyncError;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid placeholder regex"));

/// Raw job entry as written in the file. Unknown fields are ignored;
/// validation happens after deserialization so error messages can name the
/// job index and offending field.
#[derive(Debug, Deserialize)]
struct RawJob {
    source: DataSource,
    destination: DataSource,
    query_id: Option<u32>,
    table_name: Option<String>,
    poll_frequency: Option<u64>,
    query_engine: Option<String>,
    if_exists: Option<WriteMode>,
    query_string: Option<String>,
    target_table: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawDocument {
    #[serde(default)]
    jobs: Vec<RawJob>,
}

/// Expand every `${VAR_NAME}` placeholder in the raw job file.
///
/// All undefined variables are collected before failing, so one load attempt
/// reports the complete set.
fn substitute_env_vars(input: &str) -> Result<String, SyncError> {
    let mut undefined = Vec::new();
    let expanded = PLACEHOLDER_RE.replace_all(input, |caps: &regex::Captures<'_>| {
        let name = &caps[1];
        match std::env::var(name) {
            Ok(value) => value,
            Err(_) => {
                undefined.push(name.to_string());
                String::new()
            }
        }
    });

    if undefined.is_empty() {
        return Ok(expanded.into_owned());
    }
    undefined.sort();
    undefined.dedup();
    Err(SyncError::Config(format!(
        "job file references undefined environment variable(s): {}",
        undefined.join(", ")
    )))
}

impl RuntimeConfig {
    /// Load and validate a job file.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] when the file cannot be read, the YAML
    /// is invalid, or any job entry fails validation.
    pub fn load(path: &Path) -> Result<Self, SyncError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SyncError::Config(format!("failed to read job file {}: {e}", path.display()))
        })?;
        Self::load_from_str(&content)
    }

    /// In-memory variant of [`RuntimeConfig::load`].
    pub fn load_from_str(raw: &str) -> Result<Self, SyncError> {
        let substituted = substitute_env_vars(raw)?;
        let document: RawDocument = serde_yaml::from_str(&substituted)
            .map_err(|e| SyncError::Config(format!("failed to parse job file: {e}")))?;

        let mut config = Self::default();
        for (index, job) in document.jobs.into_iter().enumerate() {
            match (job.source, job.destination) {
                (DataSource::Dune, DataSource::Postgres) => {
                    config.pull_jobs.push(validate_pull_job(index, job)?);
                }
                (DataSource::Postgres, DataSource::Dune) => {
                    config.push_jobs.push(validate_push_job(index, job)?);
                }
                (source, destination) => {
                    return Err(SyncError::Config(format!(
                        "Invalid source/destination combination: {source} -> {destination}"
                    )));
                }
            }
        }
        Ok(config)
    }
}

fn validate_pull_job(index: usize, job: RawJob) -> Result<PullJob, SyncError> {
    let query_id = job.query_id.ok_or_else(|| {
        SyncError::Config(format!("jobs[{index}]: missing required field 'query_id'"))
    })?;

    let query_engine = match job.query_engine.as_deref() {
        None | Some("medium") => QueryEngine::Medium,
        Some("large") => QueryEngine::Large,
        Some(_) => {
            return Err(SyncError::Config(
                "query_engine must be either 'medium' or 'large'.".to_string(),
            ));
        }
    };

    let poll_frequency = job.poll_frequency.unwrap_or(1);
    if poll_frequency == 0 {
        return Err(SyncError::Config(format!(
            "jobs[{index}]: poll_frequency must be greater than zero"
        )));
    }

    Ok(PullJob {
        query_id,
        table_name: job
            .table_name
            .unwrap_or_else(|| format!("query_{query_id}_result")),
        poll_frequency,
        query_engine,
        if_exists: job.if_exists.unwrap_or_default(),
    })
}

fn validate_push_job(index: usize, job: RawJob) -> Result<PushJob, SyncError> {
    let (source, target_table) = match (job.table_name, job.query_string) {
        (Some(table), None) => {
            let target = job.target_table.unwrap_or_else(|| table.clone());
            (PushSource::Table(table), target)
        }
        (None, Some(query)) => {
            let target = job.target_table.ok_or_else(|| {
                SyncError::Config(format!(
                    "jobs[{index}]: 'target_table' is required when pushing a query_string"
                ))
            })?;
            (PushSource::Query(query), target)
        }
        _ => {
            return Err(SyncError::Config(format!(
                "jobs[{index}]: exactly one of 'table_name' or 'query_string' must be set"
            )));
        }
    };

    Ok(PushJob {
        source,
        target_table,
    })
}
