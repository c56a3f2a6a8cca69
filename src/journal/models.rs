use chrono::{DateTime, Utc};
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{FromRow, Postgres};
use std::sync::Arc;

use super::types::{JournalCreate, JournalRead};
use crate::owned::{OwnedEntity, OwnedRepository};
use crate::shared::AppState;

/// Database model for journal_entries table
#[derive(Debug, Clone, FromRow)]
pub struct JournalEntry {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl OwnedEntity for JournalEntry {
    type Draft = JournalCreate;
    type Response = JournalRead;

    const LABEL: &'static str = "Entry";
    const PATH: &'static str = "/journal";
    const TABLE: &'static str = "journal_entries";
    const COLUMNS: &'static str = "id, user_id, title, content, created_at";
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

    fn from_draft(id: i64, owner_id: i64, draft: JournalCreate, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: owner_id,
            title: draft.title,
            content: draft.content,
            created_at: now,
        }
    }

    fn insert_query(
        owner_id: i64,
        draft: JournalCreate,
        now: DateTime<Utc>,
    ) -> QueryAs<'static, Postgres, Self, PgArguments> {
        sqlx::query_as(
            "INSERT INTO journal_entries (user_id, title, content, created_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, user_id, title, content, created_at",
        )
        .bind(owner_id)
        .bind(draft.title)
        .bind(draft.content)
        .bind(now)
    }

    fn repository(state: &AppState) -> &Arc<dyn OwnedRepository<Self>> {
        &state.journal_repository
    }
}
