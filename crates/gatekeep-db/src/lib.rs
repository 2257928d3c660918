//! # Gatekeep DB
//!
//! Database pool and user stores for the Gatekeep API.
//!
//! - [`init_db_pool`] / [`run_migrations`]: PostgreSQL pool setup
//! - [`UserRepository`]: user-record CRUD on top of [`IdentityStore`](gatekeep_auth::IdentityStore)
//! - [`PgUserStore`]: the PostgreSQL implementation
//! - `MemoryUserStore` (feature `memory`): an in-process implementation for tests and local runs
//!
//! # Example
//!
//! ```ignore
//! use gatekeep_config::DatabaseConfig;
//! use gatekeep_db::{PgUserStore, init_db_pool, run_migrations};
//!
//! let pool = init_db_pool(&DatabaseConfig::from_env()?).await?;
//! run_migrations(&pool).await?;
//! let store = PgUserStore::new(pool);
//! ```

use std::time::Duration;

use gatekeep_config::DatabaseConfig;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

#[cfg(any(test, feature = "memory"))]
pub mod memory;
pub mod postgres;
pub mod repository;

#[cfg(any(test, feature = "memory"))]
pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;
pub use repository::{NewUser, UserChanges, UserQuery, UserRepository};

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Opens a PostgreSQL pool with the configured size and acquire timeout.
///
/// Call once at startup; the pool is cheap to clone.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(&config.url)
        .await?;

    info!(
        max_connections = config.max_connections,
        "database pool ready"
    );
    Ok(pool)
}

/// Applies the embedded migrations under `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
