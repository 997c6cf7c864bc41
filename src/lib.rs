//! User document store.
//!
//! This crate owns the `user` data model and the single collection it lives
//! in. [`UserRepository`] is the entry point: it wraps a [`UserStore`]
//! backend (MongoDB in production, in-memory for tests) and bounds every
//! operation with a per-call deadline.
//!
//! ```rust,no_run
//! use userd::{StoreConfig, UserPatch, UserRepository};
//!
//! # async fn demo() -> Result<(), userd::StoreError> {
//! let users = UserRepository::connect(&StoreConfig::default()).await?;
//! let ada = users.create(UserPatch::default().with_name("Ada")).await?;
//! let fetched = users.get(&ada.id_hex()).await?;
//! assert_eq!(fetched, ada);
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod config;
mod error;
pub mod model;

pub use backend::{build_backend, InMemoryBackend, UserStore};
#[cfg(feature = "backend-mongo")]
pub use backend::MongoBackend;
pub use bson::oid::ObjectId;
pub use config::{BackendKind, StoreConfig};
pub use error::StoreError;
pub use model::{parse_user_id, User, UserPatch};

use std::future::Future;
use std::time::Duration;

/// Shared handle to the user collection.
///
/// Identifiers arrive as client-supplied hex strings and are parsed here, so
/// a malformed id is reported as [`StoreError::InvalidId`] before any round
/// trip. Each call runs under `operation_timeout`; when it elapses the
/// in-flight future is dropped and [`StoreError::Timeout`] is returned.
pub struct UserRepository {
    backend: Box<dyn UserStore>,
    operation_timeout: Duration,
}

impl UserRepository {
    /// Build the configured backend and connect to it.
    pub async fn connect(cfg: &StoreConfig) -> Result<Self, StoreError> {
        cfg.validate()?;
        let backend = build_backend(cfg).await?;
        Ok(Self::new(backend, cfg.operation_timeout()))
    }

    pub fn new(backend: Box<dyn UserStore>, operation_timeout: Duration) -> Self {
        Self {
            backend,
            operation_timeout,
        }
    }

    /// Repository over a fresh in-memory backend.
    pub fn in_memory() -> Self {
        Self::new(
            Box::new(InMemoryBackend::new()),
            StoreConfig::in_memory().operation_timeout(),
        )
    }

    pub fn operation_timeout(&self) -> Duration {
        self.operation_timeout
    }

    pub async fn list(&self) -> Result<Vec<User>, StoreError> {
        self.deadline(self.backend.find_all()).await
    }

    pub async fn get(&self, id: &str) -> Result<User, StoreError> {
        let id = parse_user_id(id)?;
        self.deadline(self.backend.find_by_id(id)).await
    }

    pub async fn create(&self, fields: UserPatch) -> Result<User, StoreError> {
        let user = self.deadline(self.backend.insert(fields)).await?;
        tracing::info!(id = %user.id, "Created user");
        Ok(user)
    }

    /// Apply `patch` to an existing user and return the post-update document.
    pub async fn update(&self, id: &str, patch: UserPatch) -> Result<User, StoreError> {
        let id = parse_user_id(id)?;
        self.deadline(self.backend.find_and_update(id, patch)).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let id = parse_user_id(id)?;
        self.deadline(self.backend.delete(id)).await?;
        tracing::info!(id = %id, "Deleted user");
        Ok(())
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.deadline(self.backend.ping()).await
    }

    async fn deadline<T, F>(&self, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        tokio::time::timeout(self.operation_timeout, fut)
            .await
            .map_err(|_| StoreError::Timeout(self.operation_timeout))?
    }
}
