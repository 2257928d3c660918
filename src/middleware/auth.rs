use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use gatekeep_auth::{Identity, Rejection};
use gatekeep_core::AppError;

/// The identity admitted by the access guard for this request.
///
/// Only available on routes behind [`require_roles`](super::role::require_roles);
/// anywhere else extraction fails with a 500.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| AppError::internal(anyhow::anyhow!("CurrentUser requested on an unguarded route")))
    }
}

/// Reads `Authorization`. A value that is not visible ASCII counts as
/// missing.
pub fn authorization_header(headers: &HeaderMap) -> Result<Option<&str>, Rejection> {
    match headers.get(header::AUTHORIZATION) {
        None => Ok(None),
        Some(value) => value.to_str().map(Some).map_err(|_| Rejection::MissingHeader),
    }
}
