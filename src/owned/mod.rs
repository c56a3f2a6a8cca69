// Public API - what other modules can use
pub use entity::OwnedEntity;
pub use handlers::{create_owned, delete_owned, list_owned, owned_routes, DeleteResponse};
pub use repository::{InMemoryOwnedRepository, OwnedRepository, PostgresOwnedRepository};

// Internal modules
mod entity;
mod handlers;
mod repository;
