use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use dunesync_engine::client::{DuneClient, HttpDuneClient};
use dunesync_engine::{Env, JobRunner, RuntimeConfig};

/// Load secrets and config, then run every job once.
pub async fn execute(config_path: &Path) -> Result<()> {
    let env = Env::load()?;
    let config = RuntimeConfig::load(config_path)?;

    tracing::info!(
        pull_jobs = config.pull_jobs.len(),
        push_jobs = config.push_jobs.len(),
        "loaded job configuration"
    );

    let dune: Arc<dyn DuneClient> = Arc::new(HttpDuneClient::new(env.dune_api_key.clone()));
    let runner = JobRunner::new(dune, env.db_url);
    runner.run_all(&config).await?;

    tracing::info!("all jobs finished");
    Ok(())
}
