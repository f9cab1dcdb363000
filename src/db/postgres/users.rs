use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{
        error::{DbError, DbResult},
        repos::UserRepo,
    },
    models::{CreateUser, User},
};

pub struct PostgresUserRepo {
    pool: PgPool,
}

impl PostgresUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn user_from_row(row: &sqlx::postgres::PgRow) -> User {
        User {
            id: row.get("id"),
            username: row.get("username"),
            email: row.get("email"),
            name: row.get("name"),
            password_hash: row.get("password_hash"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    async fn fetch_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let result = sqlx::query(
            r#"
            SELECT id, username, email, name, password_hash, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result.as_ref().map(Self::user_from_row))
    }
}

#[async_trait]
impl UserRepo for PostgresUserRepo {
    async fn create(&self, input: CreateUser) -> DbResult<User> {
        input
            .validate()
            .map_err(|e| DbError::Validation(e.to_string()))?;

        let row = sqlx::query(
            r#"
            INSERT INTO users (id, username, email, name, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NULL, now(), now())
            RETURNING id, username, email, name, password_hash, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.username)
        .bind(&input.email)
        .bind(&input.name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => DbError::Conflict(
                format!("User with username '{}' already exists", input.username),
            ),
            _ => DbError::from(e),
        })?;

        Ok(Self::user_from_row(&row))
    }

    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<User>> {
        let result = sqlx::query(
            r#"
            SELECT id, username, email, name, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result.as_ref().map(Self::user_from_row))
    }

    async fn get_by_username(&self, username: &str) -> DbResult<Option<User>> {
        self.fetch_by_username(username).await
    }

    async fn get_or_create(&self, username: &str) -> DbResult<(User, bool)> {
        // The unique index on username arbitrates concurrent first logins:
        // exactly one insert lands, the rest fall through to the fetch.
        let result = sqlx::query(
            r#"
            INSERT INTO users (id, username, email, name, password_hash, created_at, updated_at)
            VALUES ($1, $2, NULL, NULL, NULL, now(), now())
            ON CONFLICT (username) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .execute(&self.pool)
        .await?;

        let created = result.rows_affected() == 1;

        let user = self.fetch_by_username(username).await?.ok_or_else(|| {
            DbError::Internal(format!("User '{}' disappeared after get_or_create", username))
        })?;

        Ok((user, created))
    }

    async fn save(&self, user: &User) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = $1, email = $2, name = $3, password_hash = $4, updated_at = now()
            WHERE id = $5
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.id)
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
