use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use crate::core::error::ConfigError;
use crate::types::{Role, User};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Username already taken")]
    DuplicateUsername,
    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),
    #[error("Corrupt user record: {0}")]
    Corrupt(String),
}

/// Fields of a user that does not exist yet; the store assigns the id.
#[derive(Clone)]
pub(crate) struct NewUser {
    pub(crate) username: String,
    pub(crate) password_hash: String,
    pub(crate) role: Role,
}

/// Durable record of users. Implementations own username uniqueness:
/// of any number of concurrent `create` calls for one username, exactly one
/// succeeds and the rest return [`StoreError::DuplicateUsername`].
#[async_trait]
pub(crate) trait CredentialStore: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
}

#[derive(Clone, Debug)]
pub(crate) struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub(crate) async fn connect(
        database_url: &str,
        max_connections: u32,
    ) -> Result<Self, ConfigError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        sqlx::migrate!().run(&pool).await?;

        Ok(PgStore { pool })
    }
}

#[async_trait]
impl CredentialStore for PgStore {
    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let id: i32 = match sqlx::query(
            "INSERT INTO users (username, password_hash, role) VALUES ($1, $2, $3) RETURNING id;",
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .map(|row: PgRow| row.get("id"))
        .fetch_one(&self.pool)
        .await
        {
            Ok(id) => id,
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Err(StoreError::DuplicateUsername);
            }
            Err(e) => return Err(StoreError::Sql(e)),
        };

        Ok(User {
            id,
            username: user.username,
            password_hash: user.password_hash,
            role: user.role,
        })
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(
            "SELECT id, username, password_hash, role FROM users WHERE username = $1;",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(map_user).transpose()
    }
}

fn map_user(row: PgRow) -> Result<User, StoreError> {
    let role: String = row.get("role");

    Ok(User {
        id: row.get("id"),
        username: row.get("username"),
        password_hash: row.get("password_hash"),
        role: role.parse().map_err(StoreError::Corrupt)?,
    })
}
