use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// The local application account a federated identity resolves to.
///
/// Accounts provisioned from a SAML assertion carry no usable credential:
/// `password_hash` stays `None`, which disables local password login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Unique login name, derived from the assertion's username attribute.
    pub username: String,
    pub email: Option<String>,
    pub name: Option<String>,
    /// `None` means local password login is disabled for this account.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether the account can authenticate with a local password.
    pub fn has_usable_password(&self) -> bool {
        self.password_hash.is_some()
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 255))]
    pub username: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
}
