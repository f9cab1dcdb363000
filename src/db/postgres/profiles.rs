use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{
        error::{DbError, DbResult},
        repos::ProfileRepo,
    },
    models::{CreateProfile, Profile},
};

pub struct PostgresProfileRepo {
    pool: PgPool,
}

impl PostgresProfileRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn profile_from_row(row: &sqlx::postgres::PgRow) -> Profile {
        Profile {
            id: row.get("id"),
            user_id: row.get("user_id"),
            display_name: row.get("display_name"),
            department: row.get("department"),
            organization: row.get("organization"),
            phone: row.get("phone"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

#[async_trait]
impl ProfileRepo for PostgresProfileRepo {
    async fn create(&self, input: CreateProfile) -> DbResult<Profile> {
        input
            .validate()
            .map_err(|e| DbError::Validation(e.to_string()))?;

        let row = sqlx::query(
            r#"
            INSERT INTO user_profiles
                (id, user_id, display_name, department, organization, phone, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, now(), now())
            RETURNING id, user_id, display_name, department, organization, phone,
                      created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.user_id)
        .bind(&input.display_name)
        .bind(&input.department)
        .bind(&input.organization)
        .bind(&input.phone)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => DbError::Conflict(
                format!("Profile for user '{}' already exists", input.user_id),
            ),
            _ => DbError::from(e),
        })?;

        Ok(Self::profile_from_row(&row))
    }

    async fn get_by_user_id(&self, user_id: Uuid) -> DbResult<Option<Profile>> {
        let result = sqlx::query(
            r#"
            SELECT id, user_id, display_name, department, organization, phone,
                   created_at, updated_at
            FROM user_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result.as_ref().map(Self::profile_from_row))
    }

    async fn save(&self, profile: &Profile) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE user_profiles
            SET display_name = $1, department = $2, organization = $3, phone = $4,
                updated_at = now()
            WHERE id = $5
            "#,
        )
        .bind(&profile.display_name)
        .bind(&profile.department)
        .bind(&profile.organization)
        .bind(&profile.phone)
        .bind(profile.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }

        Ok(())
    }
}
