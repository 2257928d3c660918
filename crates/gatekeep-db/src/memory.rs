//! In-process [`UserRepository`] for tests and database-less local runs.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use gatekeep_auth::{Identity, IdentityStore, StoreError};
use tokio::sync::RwLock;

use crate::repository::{NewUser, UserChanges, UserQuery, UserRepository};

#[derive(Default)]
struct Inner {
    next_id: i64,
    users: BTreeMap<i64, Identity>,
}

impl Inner {
    fn login_taken(&self, login: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.login == login && Some(u.id) != except)
    }
}

/// Mirrors the `users` table semantics: ids are never reused and logins are
/// unique (case-sensitive).
#[derive(Default)]
pub struct MemoryUserStore {
    inner: RwLock<Inner>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl IdentityStore for MemoryUserStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Identity>, StoreError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<Identity>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.login == login).cloned())
    }
}

#[async_trait]
impl UserRepository for MemoryUserStore {
    async fn create(&self, user: NewUser) -> Result<Identity, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.login_taken(&user.login, None) {
            return Err(StoreError::Conflict(user.login));
        }

        inner.next_id += 1;
        let now = Utc::now();
        let identity = Identity {
            id: inner.next_id,
            login: user.login,
            password_hash: user.password_hash,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        inner.users.insert(identity.id, identity.clone());
        Ok(identity)
    }

    async fn list(&self, query: &UserQuery) -> Result<(Vec<Identity>, i64), StoreError> {
        let inner = self.inner.read().await;
        let needle = query.search.as_deref().map(str::to_lowercase);
        let matching: Vec<&Identity> = inner
            .users
            .values()
            .filter(|u| match &needle {
                Some(n) => u.login.to_lowercase().contains(n.as_str()),
                None => true,
            })
            .collect();

        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(query.offset.max(0) as usize)
            .take(query.limit.max(0) as usize)
            .cloned()
            .collect();

        Ok((page, total))
    }

    async fn update(&self, id: i64, changes: UserChanges) -> Result<Option<Identity>, StoreError> {
        let mut inner = self.inner.write().await;
        if let Some(login) = &changes.login {
            if inner.login_taken(login, Some(id)) {
                return Err(StoreError::Conflict(login.clone()));
            }
        }

        let Some(user) = inner.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(login) = changes.login {
            user.login = login;
        }
        if let Some(hash) = changes.password_hash {
            user.password_hash = hash;
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.users.remove(&id).is_some())
    }
}
