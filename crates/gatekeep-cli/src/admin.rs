use anyhow::{Result, bail};
use gatekeep_auth::{Identity, Role};
use gatekeep_core::hash_password;
use gatekeep_db::{NewUser, UserRepository};

/// Creates an account with the admin role.
pub async fn create_admin(
    store: &dyn UserRepository,
    login: &str,
    password: &str,
) -> Result<Identity> {
    let login = login.trim();
    if login.is_empty() {
        bail!("login must not be empty");
    }
    if password.is_empty() {
        bail!("password must not be empty");
    }

    let password_hash = hash_password(password).map_err(|e| e.error)?;
    let admin = store
        .create(NewUser {
            login: login.to_string(),
            password_hash,
            role: Role::Admin,
        })
        .await?;

    Ok(admin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatekeep_auth::IdentityStore;
    use gatekeep_core::verify_password;
    use gatekeep_db::MemoryUserStore;

    #[tokio::test]
    async fn test_create_admin_hashes_password() {
        let store = MemoryUserStore::new();
        let admin = create_admin(&store, "  root@example.com ", "hunter22").await.unwrap();

        assert_eq!(admin.login, "root@example.com");
        assert_eq!(admin.role, Role::Admin);
        let stored = store.find_by_id(admin.id).await.unwrap().unwrap();
        assert!(verify_password("hunter22", &stored.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_create_admin_rejects_blank_input() {
        let store = MemoryUserStore::new();
        assert!(create_admin(&store, "   ", "hunter22").await.is_err());
        assert!(create_admin(&store, "root@example.com", "").await.is_err());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_create_admin_twice_conflicts() {
        let store = MemoryUserStore::new();
        create_admin(&store, "root@example.com", "hunter22").await.unwrap();
        let err = create_admin(&store, "root@example.com", "hunter22").await.unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }
}
