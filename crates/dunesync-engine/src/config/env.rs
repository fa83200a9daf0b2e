//! Process-scope secrets, loaded once at startup.

use crate::error::SyncError;

const DUNE_API_KEY_VAR: &str = "DUNE_API_KEY";
const DB_URL_VAR: &str = "DB_URL";

/// Required environment secrets: the remote API key and the database URL.
///
/// Loaded once and passed by value to collaborators; the engine never
/// re-reads process environment state after startup.
#[derive(Debug, Clone)]
pub struct Env {
    pub dune_api_key: String,
    pub db_url: String,
}

impl Env {
    /// Read both secrets, failing fast with a message naming the missing
    /// variable.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] when either variable is unset.
    pub fn load() -> Result<Self, SyncError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    // Lookup is injected so tests never touch process-global state.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SyncError> {
        Ok(Self {
            dune_api_key: require(&lookup, DUNE_API_KEY_VAR)?,
            db_url: require(&lookup, DB_URL_VAR)?,
        })
    }
}

fn require(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String, SyncError> {
    lookup(name).ok_or_else(|| SyncError::Config(format!("{name} environment variable must be set!")))
}
