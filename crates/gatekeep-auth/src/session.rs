//! Login-time session issuing.

use std::sync::Arc;

use chrono::Utc;
use gatekeep_core::{AppError, verify_password};
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::claims::Claims;
use crate::identity::{Identity, IdentityStore};
use crate::jwt::{TokenCodec, TokenError};

/// Login identifier plus the plaintext secret presented with it.
#[derive(Clone)]
pub struct Credential {
    pub login: String,
    pub secret: String,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("login", &self.login)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum LoginError {
    /// Unknown login, wrong secret, or a failed lookup. Callers always see
    /// the same message.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("error generating token")]
    TokenGeneration(#[source] TokenError),
}

impl From<LoginError> for AppError {
    fn from(err: LoginError) -> Self {
        match err {
            LoginError::InvalidCredentials => AppError::bad_request(err),
            LoginError::TokenGeneration(_) => AppError::internal(err),
        }
    }
}

/// Checks credentials and issues signed session tokens.
///
/// No session record is kept; the token is the session.
#[derive(Clone)]
pub struct SessionIssuer {
    codec: Arc<TokenCodec>,
    identities: Arc<dyn IdentityStore>,
    token_ttl: i64,
}

impl SessionIssuer {
    pub fn new(codec: Arc<TokenCodec>, identities: Arc<dyn IdentityStore>, token_ttl: i64) -> Self {
        Self {
            codec,
            identities,
            token_ttl,
        }
    }

    pub fn token_ttl(&self) -> i64 {
        self.token_ttl
    }

    /// Claim set for `identity` valid from `now` for the configured TTL.
    pub fn issue(&self, identity: &Identity, now: i64) -> Result<Claims, LoginError> {
        let exp = now
            .checked_add(self.token_ttl)
            .ok_or(LoginError::TokenGeneration(TokenError::ExpiryOutOfRange))?;
        Ok(Claims::new(identity.id, identity.role, exp))
    }

    #[instrument(skip_all, fields(login = %credential.login))]
    pub async fn login(&self, credential: &Credential) -> Result<String, LoginError> {
        let identity = match self.identities.find_by_login(&credential.login).await {
            Ok(Some(identity)) => identity,
            Ok(None) => {
                info!("login rejected: unknown login");
                return Err(LoginError::InvalidCredentials);
            }
            Err(e) => {
                error!(error = %e, "identity lookup failed during login");
                return Err(LoginError::InvalidCredentials);
            }
        };

        // bcrypt blocks; keep it off the async workers.
        let secret = credential.secret.clone();
        let hash = identity.password_hash.clone();
        match tokio::task::spawn_blocking(move || verify_password(&secret, &hash)).await {
            Ok(Ok(true)) => {}
            Ok(Ok(false)) => {
                info!(user_id = identity.id, "login rejected: wrong password");
                return Err(LoginError::InvalidCredentials);
            }
            Ok(Err(e)) => {
                warn!(user_id = identity.id, error = %e, "stored password hash is unreadable");
                return Err(LoginError::InvalidCredentials);
            }
            Err(e) => {
                error!(user_id = identity.id, error = %e, "password verification task failed");
                return Err(LoginError::InvalidCredentials);
            }
        }

        let claims = self.issue(&identity, Utc::now().timestamp()).map_err(|e| {
            error!(user_id = identity.id, ttl = self.token_ttl, "session expiry overflows");
            e
        })?;

        let token = self.codec.encode(&claims).map_err(|e| {
            error!(user_id = identity.id, error = ?e, "failed to sign session token");
            LoginError::TokenGeneration(e)
        })?;

        info!(user_id = identity.id, role = %identity.role, "session issued");
        Ok(token)
    }
}
