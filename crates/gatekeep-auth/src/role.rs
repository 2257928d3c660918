//! User roles.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Closed set of roles a user can hold.
///
/// The canonical names (`"admin"`, `"user"`) are what tokens carry in their
/// `role` claim, what the database stores, and what route allow-lists match
/// against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Admin, Role::User];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    /// Resolves a stored role name.
    ///
    /// Any name other than an exact canonical one, including the empty
    /// string, resolves to [`Role::User`], the least-privileged role. A
    /// corrupted or legacy value can therefore never grant admin rights.
    pub fn from_name(name: &str) -> Self {
        match name {
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
