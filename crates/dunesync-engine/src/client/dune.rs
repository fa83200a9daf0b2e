//! Dune API client: execution trigger, status poll, result fetch, and CSV
//! table upload.

use async_trait::async_trait;

use dunesync_types::{ExecutionResponse, ExecutionResult, ExecutionState, ResultsResponse};

use crate::config::QueryEngine;
use crate::error::SyncError;

const DEFAULT_BASE_URL: &str = "https://api.dune.com/api/v1";
const API_KEY_HEADER: &str = "X-Dune-API-Key";

/// Contract the engine requires from the remote query service.
///
/// Implemented over HTTP in production and by scripted mocks in tests.
#[async_trait]
pub trait DuneClient: Send + Sync {
    /// Trigger an execution of `query_id` on the given compute tier,
    /// returning the execution handle.
    async fn execute_query(
        &self,
        query_id: u32,
        engine: QueryEngine,
    ) -> Result<String, SyncError>;

    /// Current lifecycle state of an execution.
    async fn execution_status(&self, execution_id: &str) -> Result<ExecutionState, SyncError>;

    /// Result payload of an execution. `None` when the remote side reports
    /// completion without a result.
    async fn execution_result(
        &self,
        execution_id: &str,
    ) -> Result<Option<ExecutionResult>, SyncError>;

    /// Upload CSV data as a table under `table_name`.
    async fn upload_table(&self, table_name: &str, data: String) -> Result<(), SyncError>;
}

/// reqwest-backed [`DuneClient`] against the v1 API.
pub struct HttpDuneClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl HttpDuneClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Override the API endpoint, e.g. for a local stub server.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}/{path}", self.base_url))
            .header(API_KEY_HEADER, &self.api_key)
    }
}

#[async_trait]
impl DuneClient for HttpDuneClient {
    async fn execute_query(
        &self,
        query_id: u32,
        engine: QueryEngine,
    ) -> Result<String, SyncError> {
        let response: ExecutionResponse = self
            .request(reqwest::Method::POST, &format!("query/{query_id}/execute"))
            .json(&serde_json::json!({ "performance": engine.as_str() }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        tracing::debug!(
            query_id,
            execution_id = %response.execution_id,
            "triggered execution"
        );
        Ok(response.execution_id)
    }

    async fn execution_status(&self, execution_id: &str) -> Result<ExecutionState, SyncError> {
        let response: ExecutionResponse = self
            .request(
                reqwest::Method::GET,
                &format!("execution/{execution_id}/status"),
            )
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.state)
    }

    async fn execution_result(
        &self,
        execution_id: &str,
    ) -> Result<Option<ExecutionResult>, SyncError> {
        let response: ResultsResponse = self
            .request(
                reqwest::Method::GET,
                &format!("execution/{execution_id}/results"),
            )
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.result)
    }

    async fn upload_table(&self, table_name: &str, data: String) -> Result<(), SyncError> {
        self.request(reqwest::Method::POST, "table/upload/csv")
            .json(&serde_json::json!({ "table_name": table_name, "data": data }))
            .send()
            .await?
            .error_for_status()?;
        tracing::debug!(table_name, "uploaded table");
        Ok(())
    }
}
