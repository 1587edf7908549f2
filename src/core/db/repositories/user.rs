//! User repository for database operations
//!
//! Users are only ever inserted and looked up. Uniqueness of `username` and
//! `email` is enforced by the table's UNIQUE constraints; a violation is
//! reported as the matching `*AlreadyExists` variant rather than a raw
//! database error, so a signup that loses a race still gets a conflict.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::db::models::{CreateUser, User};

/// Name of the UNIQUE constraint on `users.username`
pub const USERNAME_CONSTRAINT: &str = "users_username_key";

/// Name of the UNIQUE constraint on `users.email`
pub const EMAIL_CONSTRAINT: &str = "users_email_key";

/// User repository error types
#[derive(Debug, thiserror::Error)]
pub enum UserRepositoryError {
    #[error("Username already exists")]
    UsernameAlreadyExists,

    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Credential store
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. `password_hash` must already be hashed.
    async fn create(&self, user: CreateUser) -> Result<User, UserRepositoryError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserRepositoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError>;
}

/// PostgreSQL-backed user store
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn create(&self, user: CreateUser) -> Result<User, UserRepositoryError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserRepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

/// Translate a UNIQUE violation on `users` into the conflicting field
fn map_unique_violation(err: sqlx::Error) -> UserRepositoryError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
    {
        match db_err.constraint() {
            Some(USERNAME_CONSTRAINT) => return UserRepositoryError::UsernameAlreadyExists,
            Some(EMAIL_CONSTRAINT) => return UserRepositoryError::EmailAlreadyExists,
            _ => {}
        }
    }

    UserRepositoryError::DatabaseError(err)
}
