use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::error::DbResult,
    models::{CreateUser, User},
};

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn create(&self, input: CreateUser) -> DbResult<User>;
    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<User>>;
    async fn get_by_username(&self, username: &str) -> DbResult<Option<User>>;

    /// Atomically fetch the user with this username, creating it if absent.
    ///
    /// Returns the user and whether it was created by this call. Concurrent
    /// calls for the same new username must resolve to a single row: the
    /// insert races on the unique index and losers fall through to the fetch.
    async fn get_or_create(&self, username: &str) -> DbResult<(User, bool)>;

    /// Persist the current field values of an existing user.
    async fn save(&self, user: &User) -> DbResult<()>;

    async fn count(&self) -> DbResult<i64>;
}
