//! Identity records and the store contract the auth components read from.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gatekeep_core::AppError;
use thiserror::Error;

use crate::role::Role;

/// A persisted user as seen by authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: i64,
    pub login: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("id", &self.id)
            .field("login", &self.login)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("User with email {0} already exists")]
    Conflict(String),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => AppError::bad_request(err),
            StoreError::Backend(_) => AppError::internal(err),
        }
    }
}

/// Read access to persisted identities.
///
/// Lookups distinguish "no such identity" (`Ok(None)`) from a failed lookup
/// (`Err`). Implementations own their connection handling and timeouts.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Identity>, StoreError>;

    /// Looks up an identity by its login name (email or username).
    async fn find_by_login(&self, login: &str) -> Result<Option<Identity>, StoreError>;
}
