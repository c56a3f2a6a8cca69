// Public API - what other modules can use
pub use models::MoodEntry;
pub use types::{MoodCreate, MoodRead};

// Internal modules
mod models;
mod types;
