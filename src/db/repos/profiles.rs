use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::error::DbResult,
    models::{CreateProfile, Profile},
};

/// Repository for the auxiliary profile entity (1:1 with a user).
///
/// Profiles are created elsewhere in the application; the provisioning
/// service only loads and updates them, and tolerates their absence.
#[async_trait]
pub trait ProfileRepo: Send + Sync {
    async fn create(&self, input: CreateProfile) -> DbResult<Profile>;
    async fn get_by_user_id(&self, user_id: Uuid) -> DbResult<Option<Profile>>;

    /// Persist the current field values of an existing profile.
    async fn save(&self, profile: &Profile) -> DbResult<()>;
}
