use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::MoodEntry;

/// Request body for POST /mood
#[derive(Debug, Clone, Deserialize)]
pub struct MoodCreate {
    pub mood_score: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoodRead {
    pub id: i64,
    pub user_id: i64,
    pub mood_score: i32,
    pub created_at: DateTime<Utc>,
}

impl From<MoodEntry> for MoodRead {
    fn from(entry: MoodEntry) -> Self {
        Self {
            id: entry.id,
            user_id: entry.user_id,
            mood_score: entry.mood_score,
            created_at: entry.created_at,
        }
    }
}
