use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;
use validator::Validate;

use super::common::parse_uuid;
use crate::{
    db::{
        error::{DbError, DbResult},
        repos::ProfileRepo,
    },
    models::{CreateProfile, Profile},
};

pub struct SqliteProfileRepo {
    pool: SqlitePool,
}

impl SqliteProfileRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn profile_from_row(row: &sqlx::sqlite::SqliteRow) -> DbResult<Profile> {
        Ok(Profile {
            id: parse_uuid(&row.get::<String, _>("id"))?,
            user_id: parse_uuid(&row.get::<String, _>("user_id"))?,
            display_name: row.get("display_name"),
            department: row.get("department"),
            organization: row.get("organization"),
            phone: row.get("phone"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

#[async_trait]
impl ProfileRepo for SqliteProfileRepo {
    async fn create(&self, input: CreateProfile) -> DbResult<Profile> {
        input
            .validate()
            .map_err(|e| DbError::Validation(e.to_string()))?;

        let id = Uuid::new_v4();
        let now = chrono::Utc::now();

        sqlx::query(
            r#"
            INSERT INTO user_profiles
                (id, user_id, display_name, department, organization, phone, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(input.user_id.to_string())
        .bind(&input.display_name)
        .bind(&input.department)
        .bind(&input.organization)
        .bind(&input.phone)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => DbError::Conflict(
                format!("Profile for user '{}' already exists", input.user_id),
            ),
            _ => DbError::from(e),
        })?;

        Ok(Profile {
            id,
            user_id: input.user_id,
            display_name: input.display_name,
            department: input.department,
            organization: input.organization,
            phone: input.phone,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_user_id(&self, user_id: Uuid) -> DbResult<Option<Profile>> {
        let result = sqlx::query(
            r#"
            SELECT id, user_id, display_name, department, organization, phone,
                   created_at, updated_at
            FROM user_profiles
            WHERE user_id = ?
            "#,
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match result {
            Some(row) => Ok(Some(Self::profile_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, profile: &Profile) -> DbResult<()> {
        let now = chrono::Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE user_profiles
            SET display_name = ?, department = ?, organization = ?, phone = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&profile.display_name)
        .bind(&profile.department)
        .bind(&profile.organization)
        .bind(&profile.phone)
        .bind(now)
        .bind(profile.id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{
        sqlite::SqliteUserRepo,
        tests::{self, profiles::ProfileTestContext},
    };

    async fn create_test_pool() -> SqlitePool {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory SQLite pool");

        super::super::init_schema(&pool)
            .await
            .expect("Failed to create schema");

        pool
    }

    macro_rules! sqlite_profile_test {
        ($name:ident) => {
            #[tokio::test]
            async fn $name() {
                let pool = create_test_pool().await;
                let user_repo = SqliteUserRepo::new(pool.clone());
                let repo = SqliteProfileRepo::new(pool);
                let ctx = ProfileTestContext {
                    profile_repo: &repo,
                    user_repo: &user_repo,
                };
                tests::profiles::$name(&ctx).await;
            }
        };
    }

    sqlite_profile_test!(test_create_profile);
    sqlite_profile_test!(test_create_duplicate_profile_fails);
    sqlite_profile_test!(test_get_by_user_id_missing);
    sqlite_profile_test!(test_save_updates_fields);
}
