//! Per-request authentication and role check.
//!
//! [`AccessGuard::authorize`] walks a fixed sequence of checks and stops at
//! the first failure:
//!
//! ```text
//! header present → "Bearer <token>" → signature → not expired
//!     → identity exists → role claim present → role allowed → admit
//! ```
//!
//! Every authentication check runs before any role check, so a caller never
//! learns what a route requires before proving who they are.

use std::sync::Arc;

use chrono::Utc;
use gatekeep_core::AppError;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::identity::{Identity, IdentityStore};
use crate::jwt::TokenCodec;
use crate::role::Role;

/// Why a request was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Authorization header is missing")]
    MissingHeader,

    #[error("Invalid token format")]
    BadFormat,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Token expired")]
    Expired,

    #[error("User not found")]
    UserNotFound,

    #[error("Role claim is missing")]
    RoleClaimMissing,

    #[error("You do not have access to this resource")]
    AccessDenied,
}

impl Rejection {
    /// True for failures that happen after identity is established.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Rejection::RoleClaimMissing | Rejection::AccessDenied)
    }
}

impl From<Rejection> for AppError {
    fn from(rejection: Rejection) -> Self {
        if rejection.is_forbidden() {
            AppError::forbidden(rejection)
        } else {
            AppError::unauthorized(rejection)
        }
    }
}

/// Splits `Bearer <token>`. The header must be exactly two space-separated
/// parts with the first being literally `Bearer`.
pub fn bearer_token(header: &str) -> Result<&str, Rejection> {
    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Ok(token),
        _ => Err(Rejection::BadFormat),
    }
}

#[derive(Clone)]
pub struct AccessGuard {
    codec: Arc<TokenCodec>,
    identities: Arc<dyn IdentityStore>,
}

impl AccessGuard {
    pub fn new(codec: Arc<TokenCodec>, identities: Arc<dyn IdentityStore>) -> Self {
        Self { codec, identities }
    }

    pub async fn authorize(
        &self,
        authorization: Option<&str>,
        allowed: &[Role],
    ) -> Result<Identity, Rejection> {
        self.authorize_at(authorization, allowed, Utc::now().timestamp())
            .await
    }

    /// Same as [`authorize`](Self::authorize) with an explicit clock reading.
    pub async fn authorize_at(
        &self,
        authorization: Option<&str>,
        allowed: &[Role],
        now: i64,
    ) -> Result<Identity, Rejection> {
        let header = match authorization {
            Some(value) if !value.is_empty() => value,
            _ => {
                debug!("request without authorization header");
                return Err(Rejection::MissingHeader);
            }
        };

        let token = bearer_token(header).inspect_err(|_| {
            debug!("authorization header is not a bearer token");
        })?;

        let claims = self.codec.decode(token).map_err(|e| {
            warn!(error = %e, "rejected token");
            Rejection::InvalidToken
        })?;

        if claims.is_expired_at(now) {
            info!(user_id = claims.sub, exp = claims.exp, "token expired");
            return Err(Rejection::Expired);
        }

        let identity = match self.identities.find_by_id(claims.sub).await {
            Ok(Some(identity)) => identity,
            Ok(None) => {
                info!(user_id = claims.sub, "token subject no longer exists");
                return Err(Rejection::UserNotFound);
            }
            Err(e) => {
                error!(user_id = claims.sub, error = %e, "identity lookup failed");
                return Err(Rejection::UserNotFound);
            }
        };

        let Some(role) = claims.role.as_deref() else {
            warn!(user_id = identity.id, "token has no usable role claim");
            return Err(Rejection::RoleClaimMissing);
        };

        if !allowed.iter().any(|r| r.as_str() == role) {
            info!(user_id = identity.id, role, "role not permitted for route");
            return Err(Rejection::AccessDenied);
        }

        debug!(user_id = identity.id, role, "request admitted");
        Ok(identity)
    }
}

impl std::fmt::Debug for AccessGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGuard")
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}
