mod profiles;
mod users;

pub use profiles::PostgresProfileRepo;
use sqlx::PgPool;
pub use users::PostgresUserRepo;

use crate::db::error::DbResult;

/// Create the tables this crate owns, if they don't exist yet.
pub async fn init_schema(pool: &PgPool) -> DbResult<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            email TEXT,
            name TEXT,
            password_hash TEXT,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_profiles (
            id UUID PRIMARY KEY,
            user_id UUID NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
            display_name TEXT,
            department TEXT,
            organization TEXT,
            phone TEXT,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
