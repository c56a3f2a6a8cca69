// Public API - what other modules can use
pub use models::JournalEntry;
pub use types::{JournalCreate, JournalRead};

// Internal modules
mod models;
mod types;
