use axum::{
    Router,
    routing::{get, post, put},
};

use crate::modules::users::controller::{
    create_user, delete_user, get_me, get_user, get_users, update_user,
};
use crate::state::AppState;

/// Read routes, open to every authenticated role.
pub fn init_users_read_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_users))
        .route("/me", get(get_me))
        .route("/{id}", get(get_user))
}

/// Write routes, admin only.
pub fn init_users_admin_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_user))
        .route("/{id}", put(update_user).delete(delete_user))
}
