use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::activities::list_activities;
use crate::auth::{self, require_user};
use crate::config::AppConfig;
use crate::journal::JournalEntry;
use crate::mood::MoodEntry;
use crate::owned::owned_routes;
use crate::shared::AppState;
use crate::therapy::TherapySession;

pub const API_PREFIX: &str = "/api";

/// Service status, served at `/` and `/api/health`
pub async fn service_status() -> Json<Value> {
    Json(json!({ "service": "careconnect", "status": "ok" }))
}

/// Cross-origin policy from the configured allow-list.
///
/// A `*` entry mirrors the request origin, since tower-http refuses a literal wildcard with credentials.
pub fn cors_layer(config: &AppConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_credentials(true);

    if config.cors_origins.iter().any(|origin| origin == "*") {
        return layer
            .allow_origin(AllowOrigin::mirror_request())
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request());
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Skipping CORS origin that is not a valid header value");
                None
            }
        })
        .collect();

    layer
        .allow_origin(origins)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

fn api_routes(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/auth/me", get(auth::me))
        .merge(owned_routes::<JournalEntry>())
        .merge(owned_routes::<MoodEntry>())
        .merge(owned_routes::<TherapySession>())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_user));

    Router::new()
        .route("/health", get(service_status))
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/activities", get(list_activities))
        .route("/activities/", get(list_activities))
        .merge(protected)
}

/// Assembles the full application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(service_status))
        .nest(API_PREFIX, api_routes(&state))
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::{NewUser, UserModel};
    use crate::auth::repository::{InMemoryUserRepository, UserRepository};
    use crate::owned::{OwnedEntity, OwnedRepository};
    use crate::shared::test_utils::{test_config, AppStateBuilder};
    use crate::shared::AppError;
    use async_trait::async_trait;
    use std::sync::Arc;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use rstest::rstest;
    use tower::ServiceExt; // for `oneshot`

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    #[rstest]
    #[case("/")]
    #[case("/api/health")]
    #[tokio::test]
    async fn test_status_routes(#[case] uri: &str) {
        let app = build_router(AppStateBuilder::new().build());

        let (status, body) = get_json(app, uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[rstest]
    #[case("/api/activities")]
    #[case("/api/activities/")]
    #[tokio::test]
    async fn test_activities_are_public(#[case] uri: &str) {
        let app = build_router(AppStateBuilder::new().build());

        let (status, body) = get_json(app, uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["activities"].as_array().unwrap().len(), 5);
    }

    #[rstest]
    #[case("/api/auth/me")]
    #[case("/api/journal")]
    #[case("/api/mood")]
    #[case("/api/sessions")]
    #[tokio::test]
    async fn test_protected_routes_require_token(#[case] uri: &str) {
        let app = build_router(AppStateBuilder::new().build());

        let (status, _) = get_json(app, uri).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let app = build_router(AppStateBuilder::new().build());

        let (status, _) = get_json(app, "/api/nothing-here").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    /// Store whose every call fails the way a dropped database connection does
    struct FailingStore;

    fn storage_down() -> AppError {
        AppError::DatabaseError("connection refused".to_string())
    }

    #[async_trait]
    impl UserRepository for FailingStore {
        async fn create_user(&self, _user: &NewUser) -> Result<UserModel, AppError> {
            Err(storage_down())
        }

        async fn find_by_email(&self, _email: &str) -> Result<Option<UserModel>, AppError> {
            Err(storage_down())
        }
    }

    #[async_trait]
    impl<E: OwnedEntity> OwnedRepository<E> for FailingStore {
        async fn list_for_owner(&self, _owner_id: i64) -> Result<Vec<E>, AppError> {
            Err(storage_down())
        }

        async fn create_for_owner(&self, _owner_id: i64, _draft: E::Draft) -> Result<E, AppError> {
            Err(storage_down())
        }

        async fn delete_for_owner(&self, _owner_id: i64, _id: i64) -> Result<(), AppError> {
            Err(storage_down())
        }
    }

    #[tokio::test]
    async fn test_owned_storage_failure_is_generic_500() {
        let users = Arc::new(InMemoryUserRepository::new());
        users
            .create_user(&NewUser {
                email: "a@x.com".to_string(),
                name: "A".to_string(),
                hashed_password: "hash".to_string(),
            })
            .await
            .unwrap();
        let state = AppStateBuilder::new()
            .with_user_repository(users)
            .with_journal_repository(Arc::new(FailingStore))
            .with_mood_repository(Arc::new(FailingStore))
            .with_therapy_repository(Arc::new(FailingStore))
            .build();
        let token = state.token_config.create_token("a@x.com").unwrap();

        for uri in ["/api/journal", "/api/mood", "/api/sessions"] {
            let request = Request::builder()
                .method("GET")
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap();
            let response = build_router(state.clone()).oneshot(request).await.unwrap();

            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
            let body = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let json: Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(json["error"], "Database error", "{uri}");
        }
    }

    #[tokio::test]
    async fn test_user_storage_failure_is_generic_500() {
        let state = AppStateBuilder::new()
            .with_user_repository(Arc::new(FailingStore))
            .build();
        let request = Request::builder()
            .method("POST")
            .uri("/api/auth/signup")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"email": "a@x.com", "name": "A", "password": "pw"}"#,
            ))
            .unwrap();

        let response = build_router(state).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(!String::from_utf8_lossy(&body).contains("connection refused"));
    }

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/journal")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_wildcard_cors_mirrors_origin() {
        let app = build_router(AppStateBuilder::new().build());

        let response = app.oneshot(preflight("https://app.example")).await.unwrap();

        let headers = response.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://app.example"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
    }

    #[tokio::test]
    async fn test_allow_list_cors_rejects_unlisted_origin() {
        let config = AppConfig {
            cors_origins: vec!["http://localhost:3000".to_string()],
            ..test_config()
        };
        let state = AppStateBuilder::new().with_config(config).build();

        let allowed = build_router(state.clone())
            .oneshot(preflight("http://localhost:3000"))
            .await
            .unwrap();
        assert_eq!(
            allowed
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "http://localhost:3000"
        );

        let denied = build_router(state)
            .oneshot(preflight("https://evil.example"))
            .await
            .unwrap();
        assert!(denied
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
