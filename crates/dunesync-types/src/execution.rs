//! Remote execution lifecycle and result payload models.
//!
//! These are serde mirrors of the remote query API's JSON responses. The
//! state machine is: `Pending`/`Executing` are running states; `Completed`,
//! `Failed`, `Expired`, and `Cancelled` are terminal.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a triggered remote execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutionState {
    #[serde(rename = "QUERY_STATE_PENDING")]
    Pending,
    #[serde(rename = "QUERY_STATE_EXECUTING")]
    Executing,
    #[serde(rename = "QUERY_STATE_COMPLETED")]
    Completed,
    #[serde(rename = "QUERY_STATE_FAILED")]
    Failed,
    #[serde(rename = "QUERY_STATE_EXPIRED")]
    Expired,
    #[serde(rename = "QUERY_STATE_CANCELLED")]
    Cancelled,
}

impl ExecutionState {
    /// Terminal states end the polling loop; `Expired` is a normal terminal
    /// failure, not a transport error.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Failed | Self::Expired | Self::Cancelled
        )
    }
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Executing => "EXECUTING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::Expired => "EXPIRED",
            Self::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

/// Handle returned when triggering an execution, also the status poll shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResponse {
    pub execution_id: String,
    pub state: ExecutionState,
}

/// Full results payload for an execution.
///
/// `result` may be absent even on a nominally completed execution; callers
/// must treat that as a remote-side inconsistency, distinct from an empty
/// result set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsResponse {
    pub execution_id: String,
    pub state: ExecutionState,
    #[serde(default)]
    pub result: Option<ExecutionResult>,
}

/// Rows plus column metadata of a completed execution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionResult {
    #[serde(default)]
    pub rows: Vec<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub metadata: ResultMetadata,
}

/// Ordered column names and remote type tags. Parallel by position.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultMetadata {
    #[serde(default)]
    pub column_names: Vec<String>,
    #[serde(default)]
    pub column_types: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_state_classification() {
        assert!(!ExecutionState::Pending.is_terminal());
        assert!(!ExecutionState::Executing.is_terminal());
        assert!(ExecutionState::Completed.is_terminal());
        assert!(ExecutionState::Failed.is_terminal());
        assert!(ExecutionState::Expired.is_terminal());
        assert!(ExecutionState::Cancelled.is_terminal());
    }

    #[test]
    fn state_deserializes_from_remote_tags() {
        let state: ExecutionState =
            serde_json::from_str("\"QUERY_STATE_COMPLETED\"").unwrap();
        assert_eq!(state, ExecutionState::Completed);
        let state: ExecutionState =
            serde_json::from_str("\"QUERY_STATE_EXPIRED\"").unwrap();
        assert_eq!(state, ExecutionState::Expired);
    }

    #[test]
    fn results_response_with_null_result() {
        let raw = serde_json::json!({
            "execution_id": "01JB4JWVAFBX4ZDSW79JNGZ99X",
            "state": "QUERY_STATE_COMPLETED",
            "result": null,
        });
        let resp: ResultsResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(resp.state, ExecutionState::Completed);
        assert!(resp.result.is_none());
    }

    #[test]
    fn results_response_with_rows_and_metadata() {
        let raw = serde_json::json!({
            "execution_id": "01JB4JWVAFBX4ZDSW79JNGZ99X",
            "state": "QUERY_STATE_COMPLETED",
            "result": {
                "rows": [{"block_number": 20849352}],
                "metadata": {
                    "column_names": ["block_number"],
                    "column_types": ["bigint"],
                },
            },
        });
        let resp: ResultsResponse = serde_json::from_value(raw).unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.metadata.column_names, vec!["block_number"]);
        assert_eq!(result.metadata.column_types, vec!["bigint"]);
    }
}
