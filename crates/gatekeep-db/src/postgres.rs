use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gatekeep_auth::{Identity, IdentityStore, Role, StoreError};
use sqlx::PgPool;
use tracing::instrument;

use crate::repository::{NewUser, UserChanges, UserQuery, UserRepository};

const USER_COLUMNS: &str = "id, login, password_hash, role, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    login: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for Identity {
    fn from(row: UserRow) -> Self {
        Identity {
            id: row.id,
            login: row.login,
            password_hash: row.password_hash,
            role: Role::from_name(&row.role),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Escapes LIKE metacharacters so `search` matches literally.
pub(crate) fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn store_error(err: sqlx::Error, login: Option<&str>, action: &str) -> StoreError {
    if let (sqlx::Error::Database(db_err), Some(login)) = (&err, login) {
        if db_err.is_unique_violation() {
            return StoreError::Conflict(login.to_string());
        }
    }
    StoreError::Backend(anyhow::Error::new(err).context(format!("failed to {}", action)))
}

/// [`UserRepository`] over the `users` table.
#[derive(Clone, Debug)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl IdentityStore for PgUserStore {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> Result<Option<Identity>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error(e, None, "fetch user by id"))?;

        Ok(row.map(Identity::from))
    }

    #[instrument(skip(self))]
    async fn find_by_login(&self, login: &str) -> Result<Option<Identity>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE login = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(login)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error(e, None, "fetch user by login"))?;

        Ok(row.map(Identity::from))
    }
}

#[async_trait]
impl UserRepository for PgUserStore {
    #[instrument(skip(self))]
    async fn create(&self, user: NewUser) -> Result<Identity, StoreError> {
        let sql = format!(
            "INSERT INTO users (login, password_hash, role) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(&user.login)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| store_error(e, Some(user.login.as_str()), "insert user"))?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn list(&self, query: &UserQuery) -> Result<(Vec<Identity>, i64), StoreError> {
        let pattern = query.search.as_deref().map(like_pattern);

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE ($1::TEXT IS NULL OR login ILIKE $1)",
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| store_error(e, None, "count users"))?;

        let sql = format!(
            "SELECT {} FROM users WHERE ($1::TEXT IS NULL OR login ILIKE $1) \
             ORDER BY id LIMIT $2 OFFSET $3",
            USER_COLUMNS
        );
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(&pattern)
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| store_error(e, None, "list users"))?;

        Ok((rows.into_iter().map(Identity::from).collect(), total))
    }

    #[instrument(skip(self))]
    async fn update(&self, id: i64, changes: UserChanges) -> Result<Option<Identity>, StoreError> {
        let sql = format!(
            "UPDATE users SET \
                login = COALESCE($2, login), \
                password_hash = COALESCE($3, password_hash), \
                role = COALESCE($4, role), \
                updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .bind(&changes.login)
            .bind(&changes.password_hash)
            .bind(changes.role.map(|r| r.as_str()))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error(e, changes.login.as_deref(), "update user"))?;

        Ok(row.map(Identity::from))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| store_error(e, None, "delete user"))?;

        Ok(result.rows_affected() > 0)
    }
}
