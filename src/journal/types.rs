use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::JournalEntry;

/// Request body for POST /journal
#[derive(Debug, Clone, Deserialize)]
pub struct JournalCreate {
    pub title: String,
    pub content: String,
}

/// Journal entry as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JournalRead {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<JournalEntry> for JournalRead {
    fn from(entry: JournalEntry) -> Self {
        Self {
            id: entry.id,
            user_id: entry.user_id,
            title: entry.title,
            content: entry.content,
            created_at: entry.created_at,
        }
    }
}
