//! Axum server setup
//!
//! Server skeleton with:
//! - Localhost-only CORS by default
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::routes;
use crate::identity::{IdentityProvider, TrustedHeaderIdentity, DEFAULT_IDENTITY_HEADER};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:3030)
    pub bind_addr: SocketAddr,

    /// Allow permissive CORS (default: false = localhost only)
    ///
    /// WARNING: Setting this to true allows any origin.
    pub cors_permissive: bool,

    /// Request header carrying the authenticated username
    pub identity_header: HeaderName,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3030)),
            cors_permissive: false,
            identity_header: HeaderName::from_static(DEFAULT_IDENTITY_HEADER),
        }
    }
}

impl ServerConfig {
    /// Replace the identity header, accepting any header-name spelling.
    pub fn with_identity_header(mut self, name: &str) -> Result<Self, ServerError> {
        self.identity_header = HeaderName::from_bytes(name.trim().as_bytes())
            .map_err(|_| ServerError::InvalidHeader(name.to_owned()))?;
        Ok(self)
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(pool: SqlitePool, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { pool, identity }
    }
}

/// All API routes with request tracing, without CORS.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::lists::router())
        .merge(routes::items::router())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

fn cors_layer(permissive: bool) -> CorsLayer {
    if permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://localhost:3030"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
            HeaderValue::from_static("http://127.0.0.1:3030"),
        ])
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Run the HTTP server.
///
/// The pool must already have its schema (see [`crate::db::init`]).
///
/// # Example
///
/// ```ignore
/// let pool = listctl_server::db::init("sqlite://listctl.db").await?;
/// run_server(pool, ServerConfig::default()).await?;
/// ```
pub async fn run_server(pool: SqlitePool, config: ServerConfig) -> Result<(), ServerError> {
    tracing::info!(header = %config.identity_header, "trusting upstream identity header");
    let identity = TrustedHeaderIdentity::new(pool.clone(), config.identity_header.clone());
    let state = AppState::new(pool, Arc::new(identity));

    let app = build_router(state).layer(cors_layer(config.cors_permissive));

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid identity header name: '{0}'")]
    InvalidHeader(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 3030);
        assert!(!config.cors_permissive);
        assert_eq!(config.identity_header.as_str(), "x-forwarded-user");
    }

    #[test]
    fn identity_header_is_normalized() {
        let config = ServerConfig::default()
            .with_identity_header("X-Auth-Request-User")
            .unwrap();
        assert_eq!(config.identity_header.as_str(), "x-auth-request-user");
    }

    #[test]
    fn invalid_identity_header_is_rejected() {
        let err = ServerConfig::default()
            .with_identity_header("not a header")
            .unwrap_err();
        assert!(matches!(err, ServerError::InvalidHeader(_)));
    }
}
