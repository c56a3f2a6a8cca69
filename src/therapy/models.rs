use chrono::{DateTime, Utc};
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{FromRow, Postgres};
use std::sync::Arc;

use super::types::{TherapySessionCreate, TherapySessionRead};
use crate::owned::{OwnedEntity, OwnedRepository};
use crate::shared::AppState;

/// Database model for therapy_sessions table
#[derive(Debug, Clone, FromRow)]
pub struct TherapySession {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub scheduled_at: DateTime<Utc>,
}

impl OwnedEntity for TherapySession {
    type Draft = TherapySessionCreate;
    type Response = TherapySessionRead;

    const LABEL: &'static str = "Session";
    const PATH: &'static str = "/sessions";
    const TABLE: &'static str = "therapy_sessions";
    const COLUMNS: &'static str = "id, user_id, title, scheduled_at";
    // Sessions have no creation timestamp; they list by schedule
    const ORDER_COLUMN: &'static str = "scheduled_at";

    fn id(&self) -> i64 {
        self.id
    }

    fn owner_id(&self) -> i64 {
        self.user_id
    }

    fn sort_key(&self) -> DateTime<Utc> {
        self.scheduled_at
    }

    fn from_draft(
        id: i64,
        owner_id: i64,
        draft: TherapySessionCreate,
        _now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id: owner_id,
            title: draft.title,
            scheduled_at: draft.scheduled_at,
        }
    }

    fn insert_query(
        owner_id: i64,
        draft: TherapySessionCreate,
        _now: DateTime<Utc>,
    ) -> QueryAs<'static, Postgres, Self, PgArguments> {
        sqlx::query_as(
            "INSERT INTO therapy_sessions (user_id, title, scheduled_at) \
             VALUES ($1, $2, $3) \
             RETURNING id, user_id, title, scheduled_at",
        )
        .bind(owner_id)
        .bind(draft.title)
        .bind(draft.scheduled_at)
    }

    fn repository(state: &AppState) -> &Arc<dyn OwnedRepository<Self>> {
        &state.therapy_repository
    }
}
