/// Bearer token model
///
/// A token is issued on every successful login and bound to exactly one user.
/// Tokens never expire and are never revoked; a user may hold any number of
/// them at once.
///
/// # Security
///
/// - Only the SHA-256 hash of the token value is stored
/// - The plaintext value is returned once, in the login response
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tokens (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     value_hash VARCHAR(64) NOT NULL UNIQUE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token row as stored (hash only)
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Token {
    pub id: Uuid,

    /// SHA-256 hex digest of the bearer value
    pub value_hash: String,

    /// User this token authenticates as
    pub user_id: Uuid,

    pub created_at: DateTime<Utc>,
}

/// Input for persisting a freshly generated token
#[derive(Debug, Clone)]
pub struct CreateToken {
    pub value_hash: String,
    pub user_id: Uuid,
}

/// Login response: the stored token plus its plaintext value
///
/// This is the only place the plaintext value ever appears.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    pub id: Uuid,
    pub value: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl IssuedToken {
    pub fn new(token: Token, value: String) -> Self {
        Self {
            id: token.id,
            value,
            user_id: token.user_id,
            created_at: token.created_at,
        }
    }
}
