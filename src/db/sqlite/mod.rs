mod common;
mod profiles;
mod users;

pub use profiles::SqliteProfileRepo;
use sqlx::SqlitePool;
pub use users::SqliteUserRepo;

use crate::db::error::DbResult;

/// Create the tables this crate owns, if they don't exist yet.
///
/// UUIDs and timestamps are stored as TEXT, matching how sqlx binds
/// `Uuid::to_string()` and `DateTime<Utc>` on SQLite.
pub async fn init_schema(pool: &SqlitePool) -> DbResult<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY NOT NULL,
            username TEXT NOT NULL UNIQUE,
            email TEXT,
            name TEXT,
            password_hash TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_profiles (
            id TEXT PRIMARY KEY NOT NULL,
            user_id TEXT NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
            display_name TEXT,
            department TEXT,
            organization TEXT,
            phone TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
