//! Shared tests for ProfileRepo implementations

use uuid::Uuid;

use crate::{
    db::{
        error::DbError,
        repos::{ProfileRepo, UserRepo},
    },
    models::{CreateProfile, CreateUser},
};

/// Test context containing the repos needed for profile tests
pub struct ProfileTestContext<'a> {
    pub profile_repo: &'a dyn ProfileRepo,
    pub user_repo: &'a dyn UserRepo,
}

impl ProfileTestContext<'_> {
    /// Create a backing user and return its ID
    async fn create_test_user(&self, username: &str) -> Uuid {
        self.user_repo
            .create(CreateUser {
                username: username.to_string(),
                email: None,
                name: None,
            })
            .await
            .expect("Failed to create test user")
            .id
    }
}

fn create_profile_input(user_id: Uuid, display_name: Option<&str>) -> CreateProfile {
    CreateProfile {
        user_id,
        display_name: display_name.map(|n| n.to_string()),
        department: None,
        organization: None,
        phone: None,
    }
}

pub async fn test_create_profile(ctx: &ProfileTestContext<'_>) {
    let user_id = ctx.create_test_user("alice").await;

    let profile = ctx
        .profile_repo
        .create(create_profile_input(user_id, Some("Alice Example")))
        .await
        .expect("Failed to create profile");

    assert_eq!(profile.user_id, user_id);
    assert_eq!(profile.display_name, Some("Alice Example".to_string()));

    let fetched = ctx
        .profile_repo
        .get_by_user_id(user_id)
        .await
        .expect("Failed to get profile")
        .expect("Profile not found");

    assert_eq!(fetched.id, profile.id);
}

pub async fn test_create_duplicate_profile_fails(ctx: &ProfileTestContext<'_>) {
    let user_id = ctx.create_test_user("bob").await;

    ctx.profile_repo
        .create(create_profile_input(user_id, None))
        .await
        .expect("Failed to create first profile");

    let result = ctx
        .profile_repo
        .create(create_profile_input(user_id, None))
        .await;

    assert!(matches!(result, Err(DbError::Conflict(_))));
}

pub async fn test_get_by_user_id_missing(ctx: &ProfileTestContext<'_>) {
    let result = ctx
        .profile_repo
        .get_by_user_id(Uuid::new_v4())
        .await
        .expect("Lookup should not fail");

    assert!(result.is_none());
}

pub async fn test_save_updates_fields(ctx: &ProfileTestContext<'_>) {
    let user_id = ctx.create_test_user("carol").await;

    let mut profile = ctx
        .profile_repo
        .create(create_profile_input(user_id, None))
        .await
        .expect("Failed to create profile");

    profile.department = Some("Engineering".to_string());
    profile.phone = Some("+1 555 0100".to_string());
    ctx.profile_repo
        .save(&profile)
        .await
        .expect("Failed to save");

    let fetched = ctx
        .profile_repo
        .get_by_user_id(user_id)
        .await
        .expect("Failed to get profile")
        .expect("Profile not found");

    assert_eq!(fetched.department, Some("Engineering".to_string()));
    assert_eq!(fetched.phone, Some("+1 555 0100".to_string()));
}
