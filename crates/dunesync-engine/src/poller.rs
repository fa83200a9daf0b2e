//! Drives a triggered remote execution to a terminal state.
//!
//! The poll loop is the only suspension point in a job's execution: it
//! sleeps for the configured interval between status queries and blocks the
//! job until a terminal state is observed. Dropping the future mid-poll
//! leaves the remote execution running; no cancellation request is sent
//! upstream.

use std::time::Duration;

use dunesync_types::{ExecutionError, ExecutionResult, ExecutionState};

use crate::client::DuneClient;
use crate::error::SyncError;

pub struct Poller<'a> {
    client: &'a dyn DuneClient,
    interval: Duration,
}

impl<'a> Poller<'a> {
    pub fn new(client: &'a dyn DuneClient, interval: Duration) -> Self {
        Self { client, interval }
    }

    /// Poll until the execution reaches a terminal state, then fetch and
    /// return its result payload.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::Terminal`] for any terminal state other
    /// than completed, and [`ExecutionError::MissingResult`] when a
    /// nominally completed execution carries no result payload. Transport
    /// errors from the client are surfaced unmodified.
    pub async fn await_result(&self, execution_id: &str) -> Result<ExecutionResult, SyncError> {
        let state = loop {
            let state = self.client.execution_status(execution_id).await?;
            if state.is_terminal() {
                break state;
            }
            tracing::debug!(execution_id, state = %state, "execution still running");
            tokio::time::sleep(self.interval).await;
        };

        if state != ExecutionState::Completed {
            return Err(ExecutionError::Terminal {
                execution_id: execution_id.to_string(),
                state,
            }
            .into());
        }

        let result = self.client.execution_result(execution_id).await?;
        result.ok_or_else(|| {
            SyncError::from(ExecutionError::MissingResult(execution_id.to_string()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::config::QueryEngine;

    /// Scripted client: pops one state per status query.
    struct ScriptedClient {
        states: Mutex<Vec<ExecutionState>>,
        result: Option<ExecutionResult>,
        polls: Mutex<u32>,
    }

    impl ScriptedClient {
        fn new(states: Vec<ExecutionState>, result: Option<ExecutionResult>) -> Self {
            Self {
                states: Mutex::new(states),
                result,
                polls: Mutex::new(0),
            }
        }

        fn poll_count(&self) -> u32 {
            *self.polls.lock().unwrap()
        }
    }

    #[async_trait]
    impl DuneClient for ScriptedClient {
        async fn execute_query(
            &self,
            _query_id: u32,
            _engine: QueryEngine,
        ) -> Result<String, SyncError> {
            Ok("exec-1".to_string())
        }

        async fn execution_status(
            &self,
            _execution_id: &str,
        ) -> Result<ExecutionState, SyncError> {
            *self.polls.lock().unwrap() += 1;
            Ok(self.states.lock().unwrap().remove(0))
        }

        async fn execution_result(
            &self,
            _execution_id: &str,
        ) -> Result<Option<ExecutionResult>, SyncError> {
            Ok(self.result.clone())
        }

        async fn upload_table(&self, _table_name: &str, _data: String) -> Result<(), SyncError> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn polls_until_completed_then_fetches_the_result() {
        let client = ScriptedClient::new(
            vec![
                ExecutionState::Pending,
                ExecutionState::Executing,
                ExecutionState::Completed,
            ],
            Some(ExecutionResult::default()),
        );
        let poller = Poller::new(&client, Duration::from_secs(1));
        poller.await_result("exec-1").await.unwrap();
        assert_eq!(client.poll_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_execution_surfaces_the_terminal_state() {
        let client = ScriptedClient::new(
            vec![ExecutionState::Executing, ExecutionState::Failed],
            Some(ExecutionResult::default()),
        );
        let poller = Poller::new(&client, Duration::from_secs(1));
        let err = poller.await_result("exec-1").await.unwrap_err();
        match err {
            SyncError::Execution(ExecutionError::Terminal { state, .. }) => {
                assert_eq!(state, ExecutionState::Failed);
            }
            other => panic!("expected terminal error, got {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn expired_execution_is_a_normal_terminal_failure() {
        let client = ScriptedClient::new(vec![ExecutionState::Expired], None);
        let poller = Poller::new(&client, Duration::from_secs(1));
        let err = poller.await_result("exec-1").await.unwrap_err();
        match err {
            SyncError::Execution(ExecutionError::Terminal { state, .. }) => {
                assert_eq!(state, ExecutionState::Expired);
            }
            other => panic!("expected terminal error, got {other}"),
        }
        assert_eq!(client.poll_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn completed_execution_without_a_result_is_rejected() {
        let client = ScriptedClient::new(vec![ExecutionState::Completed], None);
        let poller = Poller::new(&client, Duration::from_secs(1));
        let err = poller.await_result("exec-1").await.unwrap_err();
        assert!(matches!(
            err,
            SyncError::Execution(ExecutionError::MissingResult(_))
        ));
    }
}
