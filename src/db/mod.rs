mod error;
#[cfg(feature = "database-postgres")]
pub mod postgres;
pub mod repos;
#[cfg(feature = "database-sqlite")]
pub mod sqlite;

#[cfg(all(test, feature = "database-sqlite"))]
pub mod tests;

use std::sync::Arc;

pub use error::{DbError, DbResult};
pub use repos::*;

use crate::config::DatabaseConfig;

/// Cached repository trait objects, created once at construction.
struct CachedRepos {
    users: Arc<dyn UserRepo>,
    profiles: Arc<dyn ProfileRepo>,
}

enum PoolStorage {
    #[cfg(feature = "database-sqlite")]
    Sqlite(sqlx::SqlitePool),
    #[cfg(feature = "database-postgres")]
    Postgres(sqlx::PgPool),
    #[cfg(not(any(feature = "database-sqlite", feature = "database-postgres")))]
    _None(std::convert::Infallible),
}

/// Database pool supporting both SQLite and PostgreSQL.
///
/// Repositories are cached at construction time to avoid allocation on each
/// access.
pub struct DbPool {
    #[allow(dead_code)] // Direct pool access
    inner: PoolStorage,
    repos: CachedRepos,
}

impl DbPool {
    /// Create a DbPool from an existing SQLite pool.
    /// Primarily useful for testing.
    #[cfg(feature = "database-sqlite")]
    pub fn from_sqlite(pool: sqlx::SqlitePool) -> Self {
        let repos = CachedRepos {
            users: Arc::new(sqlite::SqliteUserRepo::new(pool.clone())),
            profiles: Arc::new(sqlite::SqliteProfileRepo::new(pool.clone())),
        };
        Self {
            inner: PoolStorage::Sqlite(pool),
            repos,
        }
    }

    /// Create a DbPool from an existing PostgreSQL pool.
    #[cfg(feature = "database-postgres")]
    pub fn from_postgres(pool: sqlx::PgPool) -> Self {
        let repos = CachedRepos {
            users: Arc::new(postgres::PostgresUserRepo::new(pool.clone())),
            profiles: Arc::new(postgres::PostgresProfileRepo::new(pool.clone())),
        };
        Self {
            inner: PoolStorage::Postgres(pool),
            repos,
        }
    }

    /// Connect according to configuration and ensure the schema exists.
    pub async fn connect(config: &DatabaseConfig) -> DbResult<Self> {
        match config {
            DatabaseConfig::None => Err(DbError::NotConfigured),

            #[cfg(feature = "database-sqlite")]
            DatabaseConfig::Sqlite(c) => {
                let options = sqlx::sqlite::SqliteConnectOptions::new()
                    .filename(&c.path)
                    .create_if_missing(c.create_if_missing);
                let pool = sqlx::sqlite::SqlitePoolOptions::new()
                    .max_connections(c.max_connections)
                    .connect_with(options)
                    .await?;
                sqlite::init_schema(&pool).await?;
                Ok(Self::from_sqlite(pool))
            }

            #[cfg(feature = "database-postgres")]
            DatabaseConfig::Postgres(c) => {
                let pool = sqlx::postgres::PgPoolOptions::new()
                    .min_connections(c.min_connections)
                    .max_connections(c.max_connections)
                    .connect(&c.url)
                    .await?;
                postgres::init_schema(&pool).await?;
                Ok(Self::from_postgres(pool))
            }
        }
    }

    /// Get user repository
    pub fn users(&self) -> Arc<dyn UserRepo> {
        Arc::clone(&self.repos.users)
    }

    /// Get profile repository
    pub fn profiles(&self) -> Arc<dyn ProfileRepo> {
        Arc::clone(&self.repos.profiles)
    }
}
