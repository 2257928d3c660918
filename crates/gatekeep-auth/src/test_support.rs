use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::identity::{Identity, IdentityStore, StoreError};
use crate::role::Role;

pub(crate) fn identity(id: i64, login: &str, password_hash: &str, role: Role) -> Identity {
    let now = Utc::now();
    Identity {
        id,
        login: login.to_string(),
        password_hash: password_hash.to_string(),
        role,
        created_at: now,
        updated_at: now,
    }
}

#[derive(Default)]
pub(crate) struct StubStore {
    identities: Mutex<HashMap<i64, Identity>>,
    failing: bool,
}

impl StubStore {
    pub(crate) fn with(identities: Vec<Identity>) -> Self {
        Self {
            identities: Mutex::new(identities.into_iter().map(|i| (i.id, i)).collect()),
            failing: false,
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub(crate) fn remove(&self, id: i64) {
        self.identities.lock().unwrap().remove(&id);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing {
            return Err(StoreError::Backend(anyhow::anyhow!("connection reset by peer")));
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityStore for StubStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Identity>, StoreError> {
        self.check()?;
        Ok(self.identities.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<Identity>, StoreError> {
        self.check()?;
        Ok(self
            .identities
            .lock()
            .unwrap()
            .values()
            .find(|i| i.login == login)
            .cloned())
    }
}
