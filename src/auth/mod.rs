// Public API - what other modules can use
pub use handlers::{login, me, signup};
pub use middleware::{require_user, CurrentUser};
pub use service::AuthService;
pub use types::{Email, LoginForm, SignupRequest, TokenClaims, TokenResponse, UserRead};

// Internal modules
mod handlers;
mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;
mod types;
