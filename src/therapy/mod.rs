// Public API - what other modules can use
pub use models::TherapySession;
pub use types::{TherapySessionCreate, TherapySessionRead};

// Internal modules
mod models;
mod types;
