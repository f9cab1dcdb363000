use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Auxiliary per-user profile, associated 1:1 with a [`super::User`].
///
/// Holds the descriptive fields that don't belong on the account itself.
/// Not every deployment creates profiles; the provisioning service treats a
/// missing profile as "nowhere to put profile fields" rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub display_name: Option<String>,
    pub department: Option<String>,
    pub organization: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProfile {
    pub user_id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub display_name: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub department: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub organization: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
}
