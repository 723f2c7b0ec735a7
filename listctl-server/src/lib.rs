//! listctl-server: shared to-do lists over HTTP
//!
//! Users create lists, invite each other, and add or update items in the
//! lists they belong to. Authentication is done upstream; this crate only
//! consumes the resolved caller identity.
//!
//! Layers, leaves first:
//! - [`db`]: SQLite pool, schema and repositories
//! - [`service`]: membership checks and mutations
//! - [`http`]: axum routes, transfer shapes and status mapping

pub mod db;
pub mod http;
pub mod identity;
pub mod models;
pub mod service;

pub use db::DbError;
pub use http::{run_server, ServerConfig};
pub use identity::{IdentityProvider, TrustedHeaderIdentity};
pub use service::ServiceError;
