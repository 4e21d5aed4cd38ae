/// API route handlers, organized by resource
///
/// - `health`: Health check endpoint
/// - `acronyms`: Acronym CRUD, search, sort, owner and category links
/// - `users`: Signup, listing, login
/// - `categories`: Category CRUD-lite and per-category acronyms

pub mod acronyms;
pub mod categories;
pub mod health;
pub mod users;

use crate::error::{ApiError, ApiResult};
use uuid::Uuid;

/// Parses a path id; an unparsable id names no record, so it is a 404
pub(crate) fn parse_id(raw: &str, resource: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(format!("{} not found", resource)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "Acronym").unwrap(), id);

        match parse_id("not-a-uuid", "Acronym") {
            Err(ApiError::NotFound(msg)) => assert_eq!(msg, "Acronym not found"),
            other => panic!("expected not found, got {:?}", other),
        }
    }
}
