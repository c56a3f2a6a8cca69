use axum::Json;
use serde::{Deserialize, Serialize};

/// A suggested self-care activity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Activity {
    pub id: u32,
    pub title: String,
    pub category: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ActivitiesResponse {
    pub activities: Vec<Activity>,
}

const SUGGESTED: [(u32, &str, &str); 5] = [
    (1, "Deep Breathing", "Mindfulness"),
    (2, "Light Stretching", "Physical"),
    (3, "Gratitude Journal", "Reflection"),
    (4, "Short Walk", "Physical"),
    (5, "Guided Meditation", "Mindfulness"),
];

pub fn suggested_activities() -> Vec<Activity> {
    SUGGESTED
        .iter()
        .map(|(id, title, category)| Activity {
            id: *id,
            title: title.to_string(),
            category: category.to_string(),
        })
        .collect()
}

/// GET /activities
pub async fn list_activities() -> Json<ActivitiesResponse> {
    Json(ActivitiesResponse {
        activities: suggested_activities(),
    })
}
