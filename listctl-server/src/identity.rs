//! Caller identity boundary
//!
//! Authentication happens upstream (reverse proxy, gateway, SSO sidecar).
//! The server only needs to turn a request into "which user is calling"
//! and to resolve usernames, so that capability is a trait injected into
//! the application state.

use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderName};
use sqlx::SqlitePool;

use crate::db::{DbError, User, UserRepo};
use crate::models::Username;

/// Header set by the upstream authenticator when none is configured
pub const DEFAULT_IDENTITY_HEADER: &str = "x-forwarded-user";

#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    /// The authenticated caller, or `None` for anonymous requests.
    async fn current_user(&self, headers: &HeaderMap) -> Result<Option<User>, DbError>;

    /// Resolve a username to a known user.
    async fn find_user_by_name(&self, name: &str) -> Result<Option<User>, DbError>;
}

/// Trusts a header written by an authenticating proxy.
///
/// The header value is a username that must already be registered.
/// Anything else (missing header, non-UTF-8, invalid or unknown name)
/// makes the request anonymous.
#[derive(Clone)]
pub struct TrustedHeaderIdentity {
    pool: SqlitePool,
    header: HeaderName,
}

impl TrustedHeaderIdentity {
    pub fn new(pool: SqlitePool, header: HeaderName) -> Self {
        Self { pool, header }
    }

    /// Use [`DEFAULT_IDENTITY_HEADER`].
    pub fn with_default_header(pool: SqlitePool) -> Self {
        Self::new(pool, HeaderName::from_static(DEFAULT_IDENTITY_HEADER))
    }
}

#[async_trait]
impl IdentityProvider for TrustedHeaderIdentity {
    async fn current_user(&self, headers: &HeaderMap) -> Result<Option<User>, DbError> {
        let Some(value) = headers.get(&self.header) else {
            return Ok(None);
        };

        let Ok(raw) = value.to_str() else {
            tracing::debug!(header = %self.header, "identity header is not valid UTF-8");
            return Ok(None);
        };

        let user = self.find_user_by_name(raw.trim()).await?;
        if user.is_none() {
            tracing::debug!(username = %raw, "identity header names an unknown user");
        }
        Ok(user)
    }

    async fn find_user_by_name(&self, name: &str) -> Result<Option<User>, DbError> {
        let Ok(username) = Username::new(name) else {
            return Ok(None);
        };
        UserRepo::new(&self.pool).find_by_name(username.as_str()).await
    }
}
