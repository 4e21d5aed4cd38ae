/// Acronym model
///
/// # Schema
///
/// ```sql
/// CREATE TABLE acronyms (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     short VARCHAR(255) NOT NULL,
///     long VARCHAR(1024) NOT NULL,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// `created_at` only backs the store's default ordering (see
/// [`Store::first_acronym`](crate::store::Store::first_acronym)); it is not
/// part of the JSON representation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Acronym record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Acronym {
    /// Unique acronym ID
    pub id: Uuid,

    /// Short form, e.g. "TIL"
    pub short: String,

    /// Long form, e.g. "Today I Learned"
    pub long: String,

    /// Owning user
    pub user_id: Uuid,
}

/// Create/update payload for acronyms
///
/// The owner is never taken from the payload; it is always the
/// authenticated caller.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AcronymData {
    #[validate(length(min = 1, max = 255, message = "Short form must be 1-255 characters"))]
    pub short: String,

    #[validate(length(min = 1, max = 1024, message = "Long form must be 1-1024 characters"))]
    pub long: String,
}

/// Input for inserting or overwriting an acronym row
#[derive(Debug, Clone)]
pub struct SaveAcronym {
    pub short: String,
    pub long: String,
    pub user_id: Uuid,
}

impl SaveAcronym {
    /// Combines a payload with the user that will own the row
    pub fn owned_by(data: AcronymData, user_id: Uuid) -> Self {
        Self {
            short: data.short,
            long: data.long,
            user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acronym_json_shape() {
        let acronym = Acronym {
            id: Uuid::nil(),
            short: "OMG".to_string(),
            long: "Oh My God".to_string(),
            user_id: Uuid::nil(),
        };

        let json = serde_json::to_value(&acronym).unwrap();
        assert_eq!(json["short"], "OMG");
        assert_eq!(json["long"], "Oh My God");
        assert_eq!(json["user_id"], Uuid::nil().to_string());
    }

    #[test]
    fn test_acronym_data_rejects_empty_fields() {
        let data = AcronymData {
            short: String::new(),
            long: "Laugh Out Loud".to_string(),
        };
        let errors = data.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("short"));
        assert!(!errors.field_errors().contains_key("long"));
    }

    #[test]
    fn test_save_acronym_takes_owner_from_caller() {
        let owner = Uuid::new_v4();
        let save = SaveAcronym::owned_by(
            AcronymData {
                short: "IKR".to_string(),
                long: "I Know Right".to_string(),
            },
            owner,
        );
        assert_eq!(save.user_id, owner);
        assert_eq!(save.short, "IKR");
    }
}
