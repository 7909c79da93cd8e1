use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use deadpool_postgres::Pool;
use tokio::sync::RwLock;
use tokio_postgres::{error::SqlState, Row};
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::user::User,
};

/// Storage operations for user records.
#[async_trait]
pub trait UserRepository {
    /// Inserts a new user. Fails with `Conflict` when the email is taken.
    async fn create(&self, email: &str, hashed_password: &str) -> Result<User>;
    /// Finds a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    /// Replaces a user's email and credential.
    async fn update_credentials(
        &self,
        user_id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<User>;
}

fn email_taken() -> AppError {
    AppError::Conflict("Email is already registered".to_string())
}

/// A helper function to map a `tokio_postgres::Row` to a `User`.
fn row_to_user(row: &Row) -> Result<User> {
    let column = |name: &str| AppError::Internal(format!("users.{} missing or mistyped", name));

    Ok(User {
        id: row.try_get("id").map_err(|_| column("id"))?,
        email: row.try_get("email").map_err(|_| column("email"))?,
        hashed_password: row
            .try_get("hashed_password")
            .map_err(|_| column("hashed_password"))?,
        created_at: row.try_get("created_at").map_err(|_| column("created_at"))?,
        updated_at: row.try_get("updated_at").map_err(|_| column("updated_at"))?,
    })
}

fn map_unique_violation(e: tokio_postgres::Error) -> AppError {
    if e.code() == Some(&SqlState::UNIQUE_VIOLATION) {
        email_taken()
    } else {
        AppError::Database(e)
    }
}

/// PostgreSQL implementation of [`UserRepository`].
pub struct PgUserRepository {
    pool: Pool,
}

impl PgUserRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, email: &str, hashed_password: &str) -> Result<User> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                r#"
                INSERT INTO users (id, email, hashed_password, created_at, updated_at)
                VALUES ($1, $2, $3, NOW(), NOW())
                RETURNING id, email, hashed_password, created_at, updated_at
                "#,
                &[&Uuid::new_v4(), &email, &hashed_password],
            )
            .await
            .map_err(map_unique_violation)?;
        row_to_user(&row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                r#"
                SELECT id, email, hashed_password, created_at, updated_at
                FROM users
                WHERE email = $1
                "#,
                &[&email],
            )
            .await?;
        row.map(|r| row_to_user(&r)).transpose()
    }

    async fn update_credentials(
        &self,
        user_id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<User> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                r#"
                UPDATE users
                SET
                    email = $1,
                    hashed_password = $2,
                    updated_at = NOW()
                WHERE id = $3
                RETURNING id, email, hashed_password, created_at, updated_at
                "#,
                &[&email, &hashed_password, &user_id],
            )
            .await
            .map_err(map_unique_violation)?
            .ok_or(AppError::NotFound)?;
        row_to_user(&row)
    }
}

/// In-memory implementation of [`UserRepository`] for tests and database-less runs.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, email: &str, hashed_password: &str) -> Result<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == email) {
            return Err(email_taken());
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn update_credentials(
        &self,
        user_id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == email && u.id != user_id) {
            return Err(email_taken());
        }

        let user = users.get_mut(&user_id).ok_or(AppError::NotFound)?;
        user.email = email.to_string();
        user.hashed_password = hashed_password.to_string();
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}
