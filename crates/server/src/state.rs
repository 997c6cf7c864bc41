use crate::config::ServerConfig;
use crate::error::ServerResult;
use std::sync::Arc;
use userd::UserRepository;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// User collection (shared across requests)
    pub users: Arc<UserRepository>,
}

impl ServerState {
    /// Create new server state, connecting to the configured store.
    ///
    /// Fails when the store cannot be reached within its connect timeout.
    pub async fn new(config: ServerConfig) -> ServerResult<Self> {
        let users = UserRepository::connect(&config.store).await?;
        Ok(Self::with_repository(config, users))
    }

    /// Create state around an already-built repository.
    pub fn with_repository(config: ServerConfig, users: UserRepository) -> Self {
        Self {
            config: Arc::new(config),
            users: Arc::new(users),
        }
    }
}
