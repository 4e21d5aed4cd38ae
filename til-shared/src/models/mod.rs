/// Data models
///
/// Plain records shared by the store implementations, the services and the
/// HTTP layer.
///
/// # Models
///
/// - `user`: User accounts and the redacted [`user::PublicUser`] projection
/// - `token`: Bearer tokens issued at login
/// - `acronym`: Acronyms, each owned by one user
/// - `category`: Categories and the acronym/category pivot
///
/// # Example
///
/// ```
/// use til_shared::models::acronym::{AcronymData, SaveAcronym};
/// use uuid::Uuid;
///
/// let owner = Uuid::new_v4();
/// let save = SaveAcronym::owned_by(
///     AcronymData { short: "TIL".into(), long: "Today I Learned".into() },
///     owner,
/// );
/// assert_eq!(save.user_id, owner);
/// ```

pub mod acronym;
pub mod category;
pub mod token;
pub mod user;
