use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, instrument, warn};

use super::models::{NewUser, UserModel};
use crate::shared::AppError;

pub const DUPLICATE_EMAIL_MESSAGE: &str = "Email already registered";

// Postgres SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// Trait for user repository operations
#[async_trait]
pub trait UserRepository {
    /// Stores a new user; a taken email yields `AppError::Conflict`
    async fn create_user(&self, user: &NewUser) -> Result<UserModel, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError>;
}

struct UserTable {
    by_email: HashMap<String, UserModel>,
    next_id: i64,
}

/// In-memory implementation of UserRepository for development and testing
pub struct InMemoryUserRepository {
    users: Mutex<UserTable>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(UserTable {
                by_email: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Returns the current number of users in the repository
    pub fn user_count(&self) -> usize {
        self.users.lock().map(|t| t.by_email.len()).unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, UserTable>, AppError> {
        self.users
            .lock()
            .map_err(|_| AppError::Internal("users table lock poisoned".to_string()))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create_user(&self, user: &NewUser) -> Result<UserModel, AppError> {
        debug!("Creating user in memory");

        let mut table = self.lock()?;
        if table.by_email.contains_key(&user.email) {
            warn!("Email already registered in memory");
            return Err(AppError::Conflict(DUPLICATE_EMAIL_MESSAGE.to_string()));
        }

        let id = table.next_id;
        table.next_id += 1;
        let model = user.clone().into_model(id, Utc::now());
        table.by_email.insert(model.email.clone(), model.clone());

        debug!(user_id = id, "User created successfully in memory");
        Ok(model)
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError> {
        let table = self.lock()?;
        let user = table.by_email.get(email).cloned();

        debug!(found = user.is_some(), "Looked up user in memory");
        Ok(user)
    }
}

/// PostgreSQL implementation of user repository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION)
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create_user(&self, user: &NewUser) -> Result<UserModel, AppError> {
        debug!("Creating user in database");

        let model = sqlx::query_as::<_, UserModel>(
            "INSERT INTO users (email, name, hashed_password, created_at) VALUES ($1, $2, $3, $4) \
             RETURNING id, email, name, hashed_password, created_at",
        )
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.hashed_password)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                warn!("Email already registered in database");
                return AppError::Conflict(DUPLICATE_EMAIL_MESSAGE.to_string());
            }
            warn!(error = %e, "Failed to create user in database");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(user_id = model.id, "User created successfully in database");
        Ok(model)
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError> {
        let user = sqlx::query_as::<_, UserModel>(
            "SELECT id, email, name, hashed_password, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to fetch user from database");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(found = user.is_some(), "Looked up user in database");
        Ok(user)
    }
}
