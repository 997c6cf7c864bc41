//! userd server - HTTP REST API over the user collection
//!
//! Exposes create/read/update/delete for a single `user` resource stored in
//! MongoDB. Handlers return [`ServerResult`]; every failure is turned into a
//! JSON body of the form `{"error": {"code": ..., "message": ...}}` by one
//! [`IntoResponse`](axum::response::IntoResponse) impl on [`ServerError`].
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `GET /` - smoke check, plain text
//! - `GET /health` - liveness probe
//! - `GET /ready` - readiness probe (pings the store)
//! - `GET /users` - list users
//! - `POST /users` - create a user (201)
//! - `GET /users/{id}` - fetch a user
//! - `PUT /users/{id}` - update name/email, returns the updated user
//! - `DELETE /users/{id}` - delete a user (204, 404 if absent)

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
