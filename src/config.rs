//! Store configuration.
//!
//! Deserialized as the `store` section of the server configuration:
//!
//! ```yaml
//! store:
//!   backend: "mongo"
//!   uri: "mongodb://localhost:27017"
//!   database: "teamvotedb"
//!   collection: "users_test"
//!   connect_timeout_secs: 10
//!   operation_timeout_secs: 10
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::StoreError;

/// Which backend holds the user collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// MongoDB through the official driver. Requires the `backend-mongo` feature.
    #[default]
    Mongo,
    /// Process-local collection, lost on exit.
    InMemory,
}

/// Connection and timeout settings for the user store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: BackendKind,

    /// MongoDB connection string
    #[serde(default = "default_uri")]
    pub uri: String,

    #[serde(default = "default_database")]
    pub database: String,

    #[serde(default = "default_collection")]
    pub collection: String,

    /// Upper bound on establishing the initial connection
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Deadline applied to every individual store operation
    #[serde(default = "default_operation_timeout_secs")]
    pub operation_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            uri: default_uri(),
            database: default_database(),
            collection: default_collection(),
            connect_timeout_secs: default_connect_timeout_secs(),
            operation_timeout_secs: default_operation_timeout_secs(),
        }
    }
}

impl StoreConfig {
    /// Configuration for a process-local store, mainly for tests.
    pub fn in_memory() -> Self {
        Self {
            backend: BackendKind::InMemory,
            ..Self::default()
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.operation_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if self.connect_timeout_secs == 0 {
            return Err(StoreError::Config(
                "connect_timeout_secs must be > 0".into(),
            ));
        }
        if self.operation_timeout_secs == 0 {
            return Err(StoreError::Config(
                "operation_timeout_secs must be > 0".into(),
            ));
        }
        if self.backend == BackendKind::Mongo {
            if self.uri.trim().is_empty() {
                return Err(StoreError::Config("uri must not be empty".into()));
            }
            if self.database.trim().is_empty() || self.collection.trim().is_empty() {
                return Err(StoreError::Config(
                    "database and collection must not be empty".into(),
                ));
            }
        }
        Ok(())
    }
}

fn default_uri() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_database() -> String {
    "teamvotedb".to_string()
}

fn default_collection() -> String {
    "users_test".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_operation_timeout_secs() -> u64 {
    10
}
