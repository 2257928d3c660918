//! Token claim set.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::role::Role;

/// Claims carried inside a session token.
///
/// - `sub`: numeric ID of the user the token was issued to
/// - `exp`: absolute expiry (Unix timestamp, seconds)
/// - `role`: role name at issuance time
///
/// `role` is `None` when the claim is absent or is not a JSON string, so the
/// access guard can tell a missing role apart from a disallowed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub exp: i64,
    #[serde(
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub role: Option<String>,
}

impl Claims {
    pub fn new(sub: i64, role: Role, exp: i64) -> Self {
        Self {
            sub,
            exp,
            role: Some(role.as_str().to_string()),
        }
    }

    /// A token is expired once the current time reaches its `exp`.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp <= now
    }
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}
