/// User model
///
/// Users own acronyms and authenticate either with basic credentials
/// (username + password, on login) or with a bearer token issued at login.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     username VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL
/// );
/// ```
///
/// # Redaction
///
/// The full [`User`] row carries the Argon2id password hash and is never
/// serialized to clients. Every HTTP response uses [`PublicUser`] instead.
///
/// ```
/// use til_shared::models::user::{PublicUser, User};
/// use uuid::Uuid;
///
/// let user = User {
///     id: Uuid::new_v4(),
///     name: "Ada".to_string(),
///     username: "ada".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// };
///
/// let public = PublicUser::from(user);
/// let json = serde_json::to_value(&public).unwrap();
/// assert!(json.get("password_hash").is_none());
/// ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// User row as stored
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Login name, unique across all users
    pub username: String,

    /// Argon2id password hash (PHC string format)
    pub password_hash: String,
}

/// Redacted projection of a user, safe to return to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub username: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            username: user.username,
        }
    }
}

/// Input for creating a new user
///
/// `password_hash` is already hashed; the plaintext never reaches the store.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub username: String,
    pub password_hash: String,
}

/// Signup payload, as decoded from `POST /api/users`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserData {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 255, message = "Username must be 1-255 characters"))]
    pub username: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Grace Hopper".to_string(),
            username: "grace".to_string(),
            password_hash: "$argon2id$v=19$m=65536,t=3,p=4$c2FsdA$aGFzaA".to_string(),
        }
    }

    #[test]
    fn test_public_user_drops_password_hash() {
        let user = sample_user();
        let id = user.id;

        let public = PublicUser::from(user);
        assert_eq!(public.id, id);
        assert_eq!(public.username, "grace");

        let json = serde_json::to_value(&public).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 3);
        assert!(json.get("password_hash").is_none());
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_create_user_data_validation() {
        let ok = CreateUserData {
            name: "Grace".to_string(),
            username: "grace".to_string(),
            password: "long-enough".to_string(),
        };
        assert!(ok.validate().is_ok());

        let short_password = CreateUserData {
            password: "short".to_string(),
            ..ok.clone()
        };
        let errors = short_password.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));

        let empty_username = CreateUserData {
            username: String::new(),
            ..ok
        };
        let errors = empty_username.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("username"));
    }
}
