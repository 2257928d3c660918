//! Request authentication and role checks.
//!
//! - [`role`]: route layers that run the access guard (`require_member`, `require_admin`)
//! - [`auth`]: the [`CurrentUser`](auth::CurrentUser) extractor for guarded handlers
//!
//! # Flow
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. The route layer runs `AccessGuard::authorize` with the route's allowed roles
//! 3. On admission the resolved identity is stored in request extensions
//! 4. Handlers take `CurrentUser` to read it

pub mod auth;
pub mod role;
