use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

use super::setup::TestApp;

// ============================================================================
// Action Helpers
// ============================================================================

/// Status and parsed JSON body of a response (`Value::Null` for an empty body)
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    /// Sends a request through the full router
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse { status, body }
    }

    fn request(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match token {
            Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {token}")),
            None => builder,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(Self::request(Method::GET, uri, token).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(
            Self::request(Method::POST, uri, token)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(Self::request(Method::DELETE, uri, token).body(Body::empty()).unwrap())
            .await
    }

    // ============================================================================
    // Convenience Action Methods
    // ============================================================================

    pub async fn signup(&self, email: &str, password: &str) -> TestResponse {
        self.post_json(
            "/api/auth/signup",
            None,
            json!({ "email": email, "name": "Test User", "password": password }),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.send(
            Request::builder()
                .method(Method::POST)
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(format!("username={email}&password={password}")))
                .unwrap(),
        )
        .await
    }

    /// Registers and logs in, returning the access token
    pub async fn register_and_login(&self, email: &str, password: &str) -> String {
        let signup = self.signup(email, password).await;
        assert_eq!(signup.status, StatusCode::OK, "signup failed: {}", signup.body);

        let login = self.login(email, password).await;
        assert_eq!(login.status, StatusCode::OK, "login failed: {}", login.body);

        login.body["access_token"].as_str().unwrap().to_string()
    }

    pub async fn create_journal(&self, token: &str, title: &str, content: &str) -> TestResponse {
        self.post_json(
            "/api/journal",
            Some(token),
            json!({ "title": title, "content": content }),
        )
        .await
    }
}
