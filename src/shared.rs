use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::error;

use crate::auth::repository::{InMemoryUserRepository, PostgresUserRepository, UserRepository};
use crate::auth::token::TokenConfig;
use crate::config::AppConfig;
use crate::journal::JournalEntry;
use crate::mood::MoodEntry;
use crate::owned::{InMemoryOwnedRepository, OwnedRepository, PostgresOwnedRepository};
use crate::therapy::TherapySession;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub token_config: TokenConfig,
    pub user_repository: Arc<dyn UserRepository + Send + Sync>,
    pub journal_repository: Arc<dyn OwnedRepository<JournalEntry>>,
    pub mood_repository: Arc<dyn OwnedRepository<MoodEntry>>,
    pub therapy_repository: Arc<dyn OwnedRepository<TherapySession>>,
    /// Hash checked on logins for unknown emails, filled on first use
    pub placeholder_hash: Arc<OnceCell<String>>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        user_repository: Arc<dyn UserRepository + Send + Sync>,
        journal_repository: Arc<dyn OwnedRepository<JournalEntry>>,
        mood_repository: Arc<dyn OwnedRepository<MoodEntry>>,
        therapy_repository: Arc<dyn OwnedRepository<TherapySession>>,
    ) -> Self {
        let token_config = TokenConfig::from_app_config(&config);
        Self {
            config: Arc::new(config),
            token_config,
            user_repository,
            journal_repository,
            mood_repository,
            therapy_repository,
            placeholder_hash: Arc::new(OnceCell::new()),
        }
    }

    /// State backed entirely by in-memory repositories
    pub fn in_memory(config: AppConfig) -> Self {
        Self::new(
            config,
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryOwnedRepository::<JournalEntry>::new()),
            Arc::new(InMemoryOwnedRepository::<MoodEntry>::new()),
            Arc::new(InMemoryOwnedRepository::<TherapySession>::new()),
        )
    }

    /// State backed by a PostgreSQL pool
    pub fn postgres(config: AppConfig, pool: sqlx::PgPool) -> Self {
        Self::new(
            config,
            Arc::new(PostgresUserRepository::new(pool.clone())),
            Arc::new(PostgresOwnedRepository::<JournalEntry>::new(pool.clone())),
            Arc::new(PostgresOwnedRepository::<MoodEntry>::new(pool.clone())),
            Arc::new(PostgresOwnedRepository::<TherapySession>::new(pool)),
        )
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::TokenError(_) => (
                StatusCode::UNAUTHORIZED,
                "Could not validate credentials".to_string(),
            ),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::DatabaseError(msg) => {
                error!(error = %msg, "Storage operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => {
                error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message
        }));

        if status == StatusCode::UNAUTHORIZED {
            return (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response();
        }

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}
