/// Category model and the acronym/category association
///
/// # Schema
///
/// ```sql
/// CREATE TABLE categories (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE acronym_category_pivot (
///     acronym_id UUID NOT NULL REFERENCES acronyms(id) ON DELETE CASCADE,
///     category_id UUID NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (acronym_id, category_id)
/// );
/// ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Category record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}

/// Payload for `POST /api/categories`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CategoryData {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
}

/// One row of the acronym/category join table
///
/// Has no identity beyond the pair of foreign keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::FromRow)]
pub struct AcronymCategoryPivot {
    pub acronym_id: Uuid,
    pub category_id: Uuid,
}

impl AcronymCategoryPivot {
    pub fn new(acronym_id: Uuid, category_id: Uuid) -> Self {
        Self {
            acronym_id,
            category_id,
        }
    }
}
