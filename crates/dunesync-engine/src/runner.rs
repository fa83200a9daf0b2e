//! Job runner: one-shot, stateless execution of pull and push jobs.

use std::sync::Arc;
use std::time::Duration;

use crate::client::{DuneClient, PgClient};
use crate::config::{PullJob, PushJob, PushSource, RuntimeConfig};
use crate::dest::{Destination, DuneDestination, PostgresDestination};
use crate::error::SyncError;
use crate::mapper;
use crate::poller::Poller;

/// Executes jobs against one Dune client and one database URL.
///
/// Each run is independent: no partial-result caching, no retries. Write
/// atomicity is delegated to the destination's own transaction, so a run
/// that fails before the save leaves the destination untouched.
pub struct JobRunner {
    dune: Arc<dyn DuneClient>,
    db_url: String,
}

impl JobRunner {
    pub fn new(dune: Arc<dyn DuneClient>, db_url: impl Into<String>) -> Self {
        Self {
            dune,
            db_url: db_url.into(),
        }
    }

    /// Run every configured job once, pull jobs first, in config order.
    /// The first failure aborts; the caller decides whether to reschedule.
    pub async fn run_all(&self, config: &RuntimeConfig) -> Result<(), SyncError> {
        for job in &config.pull_jobs {
            self.run_pull(job).await?;
        }
        for job in &config.push_jobs {
            self.run_push(job).await?;
        }
        Ok(())
    }

    /// Pull one Dune query result into the configured PostgreSQL table.
    pub async fn run_pull(&self, job: &PullJob) -> Result<(), SyncError> {
        let mut dest =
            PostgresDestination::connect(&self.db_url, &job.table_name, job.if_exists).await?;
        self.run_pull_with(job, &mut dest).await
    }

    /// Pull variant with an injected destination adapter.
    pub async fn run_pull_with(
        &self,
        job: &PullJob,
        dest: &mut dyn Destination,
    ) -> Result<(), SyncError> {
        tracing::info!(
            query_id = job.query_id,
            table = %job.table_name,
            engine = job.query_engine.as_str(),
            "starting pull job"
        );

        let execution_id = self
            .dune
            .execute_query(job.query_id, job.query_engine)
            .await?;
        let poller = Poller::new(
            self.dune.as_ref(),
            Duration::from_secs(job.poll_frequency),
        );
        let result = poller.await_result(&execution_id).await?;
        let table = mapper::map_result(&result)?;
        dest.save(&table).await?;

        tracing::info!(
            query_id = job.query_id,
            table = %job.table_name,
            rows = table.row_count(),
            "pull job finished"
        );
        Ok(())
    }

    /// Push one local table or query result up to Dune.
    pub async fn run_push(&self, job: &PushJob) -> Result<(), SyncError> {
        tracing::info!(target = %job.target_table, "starting push job");

        let pg = PgClient::connect(&self.db_url).await?;
        let table = match &job.source {
            PushSource::Table(name) => pg.read_table(name).await?,
            PushSource::Query(query) => pg.read_query(query).await?,
        };

        let mut dest = DuneDestination::new(self.dune.clone(), &job.target_table);
        dest.save(&table).await?;

        tracing::info!(
            target = %job.target_table,
            rows = table.row_count(),
            "push job finished"
        );
        Ok(())
    }
}
