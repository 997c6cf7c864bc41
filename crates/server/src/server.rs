//! Server initialization and routing
//!
//! This module handles the Axum server setup:
//! - Router configuration with all API endpoints
//! - Middleware stack (request id, logging, timeout, body limit)
//! - Store connection before the listener is bound

use crate::config::ServerConfig;
use crate::middleware::{log_requests, request_id};
use crate::routes::{health, users};
use crate::routes::{handle_middleware_error, hello, method_not_allowed, not_found};
use crate::state::ServerState;
use axum::error_handling::HandleErrorLayer;
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::timeout::TimeoutLayer;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Build the Axum router with all routes and middleware
///
/// Middleware stack, outermost first:
/// 1. Tracing spans
/// 2. Request ID tracking
/// 3. Request logging
/// 4. Timeout handling (elapsed requests become a JSON 408)
/// 5. Body size limit
///
/// Unknown paths and unsupported methods answer with the same JSON error
/// body as handler failures.
pub fn build_router(state: Arc<ServerState>) -> Router {
    let user_routes = Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        );

    Router::new()
        .route("/", get(hello))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .merge(user_routes)
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(DefaultBodyLimit::max(state.config.max_body_size()))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(state.config.timeout())),
        )
        .layer(from_fn(log_requests))
        .layer(from_fn(request_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the user HTTP server
///
/// Connects to the configured store, then binds and serves until the
/// listener fails. Returns an error without serving if the store cannot be
/// reached within its connect timeout or the address cannot be bound.
///
/// # Example
///
/// ```rust,no_run
/// use server::ServerConfig;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = ServerConfig::load()?;
///     server::start_server(config).await?;
///     Ok(())
/// }
/// ```
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(config.log_level.as_str())
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .json()
        .init();

    // Parse bind address before touching the store
    let addr: SocketAddr = config.socket_addr()?;

    tracing::info!(
        backend = ?config.store.backend,
        database = %config.store.database,
        collection = %config.store.collection,
        connect_timeout_secs = config.store.connect_timeout_secs,
        "Connecting to user store"
    );
    let state = Arc::new(ServerState::new(config.clone()).await?);

    let app = build_router(state);

    tracing::info!("Starting userd server on {}", addr);
    tracing::info!(
        "Request timeout: {}s, store operation timeout: {}s, max body: {}MB",
        config.timeout_secs,
        config.store.operation_timeout_secs,
        config.max_body_size_mb
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
