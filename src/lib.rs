// Library crate for the CareConnect backend
// This file exposes the public API for the binary and integration tests

pub mod activities;
pub mod app;
pub mod auth;
pub mod config;
pub mod journal;
pub mod mood;
pub mod owned;
pub mod shared;
pub mod therapy;

// Re-export commonly used types for easier access in tests
pub use app::build_router;
pub use config::{AppConfig, ConfigError};
pub use shared::{AppError, AppState};
