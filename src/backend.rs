use std::sync::RwLock;

use async_trait::async_trait;
use bson::oid::ObjectId;

use crate::config::{BackendKind, StoreConfig};
use crate::model::{User, UserPatch};
use crate::StoreError;

/// Single-collection document store holding users.
///
/// Every method maps to exactly one store round trip. Implementations report
/// a missing document as [`StoreError::NotFound`], never as `Ok` with a
/// placeholder.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Every user, in the backend's natural order.
    async fn find_all(&self) -> Result<Vec<User>, StoreError>;
    /// The user with the given identifier.
    async fn find_by_id(&self, id: ObjectId) -> Result<User, StoreError>;
    /// Insert the present fields of `fields` and return the stored user.
    async fn insert(&self, fields: UserPatch) -> Result<User, StoreError>;
    /// Set the present fields of `patch` on an existing user; returns the updated user.
    async fn find_and_update(&self, id: ObjectId, patch: UserPatch) -> Result<User, StoreError>;
    /// Remove the user; `NotFound` when nothing matched.
    async fn delete(&self, id: ObjectId) -> Result<(), StoreError>;
    /// Round trip to the store without touching data.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Build the backend selected by `cfg`.
///
/// For MongoDB this establishes the connection and waits for the server to
/// answer, bounded by `connect_timeout_secs`.
pub async fn build_backend(cfg: &StoreConfig) -> Result<Box<dyn UserStore>, StoreError> {
    match cfg.backend {
        BackendKind::InMemory => Ok(Box::new(InMemoryBackend::new())),
        BackendKind::Mongo => {
            #[cfg(feature = "backend-mongo")]
            {
                Ok(Box::new(MongoBackend::connect(cfg).await?))
            }
            #[cfg(not(feature = "backend-mongo"))]
            {
                Err(StoreError::Config(
                    "mongo backend disabled at compile time".into(),
                ))
            }
        }
    }
}

/// An in-memory backend keeping users in insertion order.
pub struct InMemoryBackend {
    users: RwLock<Vec<User>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for InMemoryBackend {
    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        let guard = self
            .users
            .read()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        Ok(guard.clone())
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<User, StoreError> {
        let guard = self
            .users
            .read()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        guard
            .iter()
            .find(|user| user.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(id))
    }

    async fn insert(&self, fields: UserPatch) -> Result<User, StoreError> {
        let user = fields.into_user(ObjectId::new());
        self.users
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))?
            .push(user.clone());
        Ok(user)
    }

    async fn find_and_update(&self, id: ObjectId, patch: UserPatch) -> Result<User, StoreError> {
        // Lookup and write happen under one write lock.
        let mut guard = self
            .users
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        let user = guard
            .iter_mut()
            .find(|user| user.id == id)
            .ok_or_else(|| StoreError::not_found(id))?;
        patch.apply(user);
        Ok(user.clone())
    }

    async fn delete(&self, id: ObjectId) -> Result<(), StoreError> {
        let mut guard = self
            .users
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        let before = guard.len();
        guard.retain(|user| user.id != id);
        if guard.len() == before {
            return Err(StoreError::not_found(id));
        }
        Ok(())
    }
}

/// The MongoDB backend implementation.
#[cfg(feature = "backend-mongo")]
pub mod mongo;

#[cfg(feature = "backend-mongo")]
pub use mongo::MongoBackend;
