//! Static registry of assignable account and profile fields.
//!
//! The attribute mapping addresses local fields by name. Rather than probing
//! entities reflectively, each assignable field is enumerated here with a
//! typed setter. Account fields shadow profile fields: a name that resolves
//! to the account is never tried against the profile.

use super::{Profile, User};

/// Sentinel field name that designates the username target in a mapping.
pub const USERNAME_FIELD: &str = "username";

/// Where a mapped field name lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTarget {
    Account(AccountField),
    Profile(ProfileField),
}

impl FieldTarget {
    /// Resolve a local field name from the mapping to its target, account
    /// fields first. Unknown names resolve to `None` and are skipped by the
    /// caller.
    pub fn resolve(name: &str) -> Option<FieldTarget> {
        if let Some(field) = AccountField::resolve(name) {
            return Some(FieldTarget::Account(field));
        }
        ProfileField::resolve(name).map(FieldTarget::Profile)
    }
}

/// Assignable fields on the account entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountField {
    Username,
    Email,
    Name,
}

impl AccountField {
    pub fn resolve(name: &str) -> Option<Self> {
        match name {
            USERNAME_FIELD => Some(Self::Username),
            "email" => Some(Self::Email),
            "name" => Some(Self::Name),
            _ => None,
        }
    }

    /// Set the field from an assertion value. Returns whether the stored
    /// value actually changed.
    pub fn apply(&self, user: &mut User, value: &str) -> bool {
        match self {
            Self::Username => {
                if user.username == value {
                    return false;
                }
                user.username = value.to_string();
                true
            }
            Self::Email => set_optional(&mut user.email, value),
            Self::Name => set_optional(&mut user.name, value),
        }
    }
}

/// Assignable fields on the profile entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    DisplayName,
    Department,
    Organization,
    Phone,
}

impl ProfileField {
    pub fn resolve(name: &str) -> Option<Self> {
        match name {
            "display_name" => Some(Self::DisplayName),
            "department" => Some(Self::Department),
            "organization" => Some(Self::Organization),
            "phone" => Some(Self::Phone),
            _ => None,
        }
    }

    /// Set the field from an assertion value. Returns whether the stored
    /// value actually changed.
    pub fn apply(&self, profile: &mut Profile, value: &str) -> bool {
        let slot = match self {
            Self::DisplayName => &mut profile.display_name,
            Self::Department => &mut profile.department,
            Self::Organization => &mut profile.organization,
            Self::Phone => &mut profile.phone,
        };
        set_optional(slot, value)
    }
}

fn set_optional(slot: &mut Option<String>, value: &str) -> bool {
    if slot.as_deref() == Some(value) {
        return false;
    }
    *slot = Some(value.to_string());
    true
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;

    fn test_user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: None,
            name: None,
            password_hash: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn test_profile(user_id: Uuid) -> Profile {
        let now = Utc::now();
        Profile {
            id: Uuid::new_v4(),
            user_id,
            display_name: None,
            department: None,
            organization: None,
            phone: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    #[case("username", Some(FieldTarget::Account(AccountField::Username)))]
    #[case("email", Some(FieldTarget::Account(AccountField::Email)))]
    #[case("name", Some(FieldTarget::Account(AccountField::Name)))]
    #[case("display_name", Some(FieldTarget::Profile(ProfileField::DisplayName)))]
    #[case("department", Some(FieldTarget::Profile(ProfileField::Department)))]
    #[case("organization", Some(FieldTarget::Profile(ProfileField::Organization)))]
    #[case("phone", Some(FieldTarget::Profile(ProfileField::Phone)))]
    #[case("shoe_size", None)]
    #[case("", None)]
    fn resolve_field_names(#[case] name: &str, #[case] expected: Option<FieldTarget>) {
        assert_eq!(FieldTarget::resolve(name), expected);
    }

    #[test]
    fn account_setter_reports_change() {
        let mut user = test_user();

        assert!(AccountField::Email.apply(&mut user, "alice@example.com"));
        assert_eq!(user.email.as_deref(), Some("alice@example.com"));

        // Same value again is not a change
        assert!(!AccountField::Email.apply(&mut user, "alice@example.com"));

        assert!(AccountField::Email.apply(&mut user, "alice@corp.example.com"));
    }

    #[test]
    fn username_setter_compares_current_value() {
        let mut user = test_user();
        assert!(!AccountField::Username.apply(&mut user, "alice"));
        assert!(AccountField::Username.apply(&mut user, "alice2"));
        assert_eq!(user.username, "alice2");
    }

    #[test]
    fn profile_setter_reports_change() {
        let mut profile = test_profile(Uuid::new_v4());

        assert!(ProfileField::Department.apply(&mut profile, "Engineering"));
        assert!(!ProfileField::Department.apply(&mut profile, "Engineering"));
        assert_eq!(profile.department.as_deref(), Some("Engineering"));

        assert!(ProfileField::Phone.apply(&mut profile, "+1 555 0100"));
        assert_eq!(profile.phone.as_deref(), Some("+1 555 0100"));
    }
}
