use std::path::Path;

use anyhow::Result;

use dunesync_engine::RuntimeConfig;

/// Parse and validate the job file without contacting Dune or the database.
pub fn execute(config_path: &Path) -> Result<()> {
    let config = RuntimeConfig::load(config_path)?;

    println!("Configuration OK: {}", config_path.display());
    println!("  pull jobs (dune -> postgres): {}", config.pull_jobs.len());
    for job in &config.pull_jobs {
        println!(
            "    query {} -> table '{}' ({} engine, poll every {}s)",
            job.query_id,
            job.table_name,
            job.query_engine.as_str(),
            job.poll_frequency
        );
    }
    println!("  push jobs (postgres -> dune): {}", config.push_jobs.len());
    for job in &config.push_jobs {
        println!("    -> dune table '{}'", job.target_table);
    }
    Ok(())
}
