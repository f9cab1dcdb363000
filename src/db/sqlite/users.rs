use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;
use validator::Validate;

use super::common::parse_uuid;
use crate::{
    db::{
        error::{DbError, DbResult},
        repos::UserRepo,
    },
    models::{CreateUser, User},
};

pub struct SqliteUserRepo {
    pool: SqlitePool,
}

impl SqliteUserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> DbResult<User> {
        Ok(User {
            id: parse_uuid(&row.get::<String, _>("id"))?,
            username: row.get("username"),
            email: row.get("email"),
            name: row.get("name"),
            password_hash: row.get("password_hash"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    async fn fetch_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let result = sqlx::query(
            r#"
            SELECT id, username, email, name, password_hash, created_at, updated_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        match result {
            Some(row) => Ok(Some(Self::user_from_row(&row)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl UserRepo for SqliteUserRepo {
    async fn create(&self, input: CreateUser) -> DbResult<User> {
        input
            .validate()
            .map_err(|e| DbError::Validation(e.to_string()))?;

        let id = Uuid::new_v4();
        let now = chrono::Utc::now();

        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, name, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, NULL, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&input.username)
        .bind(&input.email)
        .bind(&input.name)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => DbError::Conflict(
                format!("User with username '{}' already exists", input.username),
            ),
            _ => DbError::from(e),
        })?;

        Ok(User {
            id,
            username: input.username,
            email: input.email,
            name: input.name,
            password_hash: None,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<User>> {
        let result = sqlx::query(
            r#"
            SELECT id, username, email, name, password_hash, created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match result {
            Some(row) => Ok(Some(Self::user_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn get_by_username(&self, username: &str) -> DbResult<Option<User>> {
        self.fetch_by_username(username).await
    }

    async fn get_or_create(&self, username: &str) -> DbResult<(User, bool)> {
        let id = Uuid::new_v4();
        let now = chrono::Utc::now();

        // The unique index on username arbitrates concurrent first logins:
        // exactly one insert lands, the rest fall through to the fetch.
        let result = sqlx::query(
            r#"
            INSERT INTO users (id, username, email, name, password_hash, created_at, updated_at)
            VALUES (?, ?, NULL, NULL, NULL, ?, ?)
            ON CONFLICT(username) DO NOTHING
            "#,
        )
        .bind(id.to_string())
        .bind(username)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let created = result.rows_affected() == 1;

        let user = self.fetch_by_username(username).await?.ok_or_else(|| {
            DbError::Internal(format!("User '{}' disappeared after get_or_create", username))
        })?;

        Ok((user, created))
    }

    async fn save(&self, user: &User) -> DbResult<()> {
        let now = chrono::Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = ?, email = ?, name = ?, password_hash = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(now)
        .bind(user.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => DbError::Conflict(
                format!("User with username '{}' already exists", user.username),
            ),
            _ => DbError::from(e),
        })?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }

        Ok(())
    }

    async fn count(&self) -> DbResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("count"))
    }
}
