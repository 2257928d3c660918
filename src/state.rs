use std::sync::Arc;

use anyhow::Context;
use gatekeep_auth::{AccessGuard, IdentityStore, SessionIssuer, TokenCodec};
use gatekeep_config::{CorsConfig, DatabaseConfig, JwtConfig};
use gatekeep_db::{PgUserStore, UserRepository, init_db_pool, run_migrations};

/// Shared handles for every request. The guard and issuer read from the
/// same store that backs `users`.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub guard: AccessGuard,
    pub issuer: SessionIssuer,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn new<S>(store: Arc<S>, jwt_config: &JwtConfig, cors_config: CorsConfig) -> Self
    where
        S: UserRepository + 'static,
    {
        let codec = Arc::new(TokenCodec::from_config(jwt_config));
        let identities: Arc<dyn IdentityStore> = store.clone();

        Self {
            users: store,
            guard: AccessGuard::new(codec.clone(), identities.clone()),
            issuer: SessionIssuer::new(codec, identities, jwt_config.token_expiry),
            cors_config,
        }
    }
}

/// Builds state from the environment: JWT settings, a migrated PostgreSQL
/// pool and CORS origins.
pub async fn init_app_state() -> anyhow::Result<AppState> {
    let jwt_config = JwtConfig::from_env()?;
    let database_config = DatabaseConfig::from_env()?;

    let pool = init_db_pool(&database_config)
        .await
        .context("Failed to connect to database")?;
    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    Ok(AppState::new(
        Arc::new(PgUserStore::new(pool)),
        &jwt_config,
        CorsConfig::from_env(),
    ))
}
