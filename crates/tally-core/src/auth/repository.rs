//! User repository
//!
//! Abstracts user storage so register/login logic can run against a mock.

use async_trait::async_trait;
use chrono::Utc;

use super::types::NewUser;
use crate::error::{Error, Result};
use crate::models::User;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Find user by ID
    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;

    /// Check if username exists
    async fn username_exists(&self, username: &str) -> Result<bool>;

    /// Create a new user
    async fn create_user(&self, user: NewUser) -> Result<User>;
}

pub(crate) fn username_taken(username: &str) -> String {
    format!(
        "Username '{}' is already taken. Please choose another username.",
        username
    )
}

/// SQLite implementation of UserRepository
pub struct SqliteUserRepository<'a> {
    pool: &'a sqlx::SqlitePool,
}

impl<'a> SqliteUserRepository<'a> {
    pub fn new(pool: &'a sqlx::SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl<'a> UserRepository for SqliteUserRepository<'a> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(user)
    }

    async fn username_exists(&self, username: &str) -> Result<bool> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(self.pool)
            .await?;
        Ok(count.0 > 0)
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(Utc::now())
        .execute(self.pool)
        .await
        .map_err(|e| {
            // A concurrent registration can win the race past `username_exists`
            if e.as_database_error().is_some_and(|d| d.is_unique_violation()) {
                Error::conflict(username_taken(&user.username))
            } else {
                Error::from(e)
            }
        })?;

        let created: User = sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(&user.id)
            .fetch_one(self.pool)
            .await?;
        Ok(created)
    }
}
