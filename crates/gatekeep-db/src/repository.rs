//! User-record operations beyond the lookups authentication needs.

use async_trait::async_trait;
use gatekeep_auth::{Identity, IdentityStore, Role, StoreError};

/// A user about to be stored. The password is already hashed.
#[derive(Clone)]
pub struct NewUser {
    pub login: String,
    pub password_hash: String,
    pub role: Role,
}

/// Partial update; `None` leaves a column untouched.
#[derive(Clone, Default)]
pub struct UserChanges {
    pub login: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.login.is_none() && self.password_hash.is_none() && self.role.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    /// Case-insensitive substring of the login name.
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

#[async_trait]
pub trait UserRepository: IdentityStore {
    /// Fails with [`StoreError::Conflict`] when the login is taken.
    async fn create(&self, user: NewUser) -> Result<Identity, StoreError>;

    /// One page of users ordered by id, plus the total matching count.
    async fn list(&self, query: &UserQuery) -> Result<(Vec<Identity>, i64), StoreError>;

    async fn update(&self, id: i64, changes: UserChanges) -> Result<Option<Identity>, StoreError>;

    /// Returns false when no such user existed.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("login", &self.login)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for UserChanges {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserChanges")
            .field("login", &self.login)
            .field("password_hash", &self.password_hash.as_ref().map(|_| "<redacted>"))
            .field("role", &self.role)
            .finish()
    }
}
