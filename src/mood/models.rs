use chrono::{DateTime, Utc};
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{FromRow, Postgres};
use std::sync::Arc;

use super::types::{MoodCreate, MoodRead};
use crate::owned::{OwnedEntity, OwnedRepository};
use crate::shared::AppState;

/// Database model for mood_entries table
#[derive(Debug, Clone, FromRow)]
pub struct MoodEntry {
    pub id: i64,
    pub user_id: i64,
    pub mood_score: i32, // 1-10 by convention, not enforced
    pub created_at: DateTime<Utc>,
}

impl OwnedEntity for MoodEntry {
    type Draft = MoodCreate;
    type Response = MoodRead;

    const LABEL: &'static str = "Mood entry";
    const PATH: &'static str = "/mood";
    const TABLE: &'static str = "mood_entries";
    const COLUMNS: &'static str = "id, user_id, mood_score, created_at";
    const ORDER_COLUMN: &'static str = "created_at";

    fn id(&self) -> i64 {
        self.id
    }

    fn owner_id(&self) -> i64 {
        self.user_id
    }

    fn sort_key(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(id: i64, owner_id: i64, draft: MoodCreate, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: owner_id,
            mood_score: draft.mood_score,
            created_at: now,
        }
    }

    fn insert_query(
        owner_id: i64,
        draft: MoodCreate,
        now: DateTime<Utc>,
    ) -> QueryAs<'static, Postgres, Self, PgArguments> {
        sqlx::query_as(
            "INSERT INTO mood_entries (user_id, mood_score, created_at) \
             VALUES ($1, $2, $3) \
             RETURNING id, user_id, mood_score, created_at",
        )
        .bind(owner_id)
        .bind(draft.mood_score)
        .bind(now)
    }

    fn repository(state: &AppState) -> &Arc<dyn OwnedRepository<Self>> {
        &state.mood_repository
    }
}
