use axum::Router;

use careconnect::{
    build_router,
    config::{AppConfig, IN_MEMORY_DATABASE_URL},
    AppState,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

/// The full application router over an in-memory store
pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

pub struct TestAppBuilder {
    config: AppConfig,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig {
                secret_key: "integration-secret".to_string(),
                database_url: IN_MEMORY_DATABASE_URL.to_string(),
                password_hash_cost: 4,
                ..AppConfig::default()
            },
        }
    }

    #[allow(dead_code)]
    pub fn with_token_lifetime_minutes(mut self, minutes: i64) -> Self {
        self.config.access_token_expire_minutes = minutes;
        self
    }

    pub fn build(self) -> TestApp {
        let state = AppState::in_memory(self.config);
        let router = build_router(state.clone());
        TestApp { state, router }
    }
}
