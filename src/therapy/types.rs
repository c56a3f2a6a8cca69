use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

use super::models::TherapySession;

/// Request body for POST /sessions
#[derive(Debug, Clone, Deserialize)]
pub struct TherapySessionCreate {
    pub title: String,
    #[serde(deserialize_with = "deserialize_scheduled_at")]
    pub scheduled_at: DateTime<Utc>,
}

// Forms without an offset, as sent by `datetime-local` inputs
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// RFC 3339 timestamps keep their offset; timestamps without one are read as UTC
fn deserialize_scheduled_at<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let raw = raw.trim();

    if let Ok(with_offset) = raw.parse::<DateTime<FixedOffset>>() {
        return Ok(with_offset.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| de::Error::custom(format!("{raw:?} is not a valid timestamp")))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TherapySessionRead {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub scheduled_at: DateTime<Utc>,
}

impl From<TherapySession> for TherapySessionRead {
    fn from(session: TherapySession) -> Self {
        Self {
            id: session.id,
            user_id: session.user_id,
            title: session.title,
            scheduled_at: session.scheduled_at,
        }
    }
}
