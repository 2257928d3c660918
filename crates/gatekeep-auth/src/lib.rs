//! # Gatekeep Auth
//!
//! Token-based authentication and role-gated access for the Gatekeep API.
//!
//! - [`jwt`]: [`TokenCodec`], signing and verifying session tokens
//! - [`session`]: [`SessionIssuer`], credential check and token issuance at login
//! - [`guard`]: [`AccessGuard`], per-request token validation and role check
//! - [`identity`]: the [`IdentityStore`] contract both components read from
//! - [`claims`] and [`role`]: the shared claim set and role types
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use gatekeep_auth::{AccessGuard, Credential, Role, SessionIssuer, TokenCodec};
//!
//! let codec = Arc::new(TokenCodec::from_config(&jwt_config));
//! let issuer = SessionIssuer::new(codec.clone(), store.clone(), jwt_config.token_expiry);
//! let guard = AccessGuard::new(codec, store);
//!
//! let token = issuer.login(&credential).await?;
//! let identity = guard
//!     .authorize(Some(&format!("Bearer {}", token)), &[Role::Admin])
//!     .await?;
//! ```

pub mod claims;
pub mod guard;
pub mod identity;
pub mod jwt;
pub mod role;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types at crate root
pub use claims::Claims;
pub use guard::{AccessGuard, Rejection, bearer_token};
pub use identity::{Identity, IdentityStore, StoreError};
pub use jwt::{TokenCodec, TokenError};
pub use role::Role;
pub use session::{Credential, LoginError, SessionIssuer};
