//! Role-gated route layers.
//!
//! ```rust,ignore
//! use axum::{Router, middleware};
//! use crate::middleware::role::require_admin;
//!
//! let admin_routes = Router::new()
//!     .route("/", post(create_user))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));
//! ```

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use gatekeep_auth::Role;
use gatekeep_core::AppError;

use crate::middleware::auth::{CurrentUser, authorization_header};
use crate::state::AppState;

/// Runs the access guard with `allowed_roles` and, on admission, stores the
/// identity as [`CurrentUser`] before calling the inner service.
pub async fn require_roles(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
    allowed_roles: &[Role],
) -> Result<Response, AppError> {
    let header = authorization_header(req.headers())?;
    let identity = state.guard.authorize(header, allowed_roles).await?;

    req.extensions_mut().insert(CurrentUser(identity));
    Ok(next.run(req).await)
}

/// Any authenticated role.
pub async fn require_member(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, &Role::ALL).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, &[Role::Admin]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}
