use axum::{extract::State, Extension, Form, Json};
use tracing::{info, instrument};

use super::{
    middleware::CurrentUser,
    service::AuthService,
    types::{LoginForm, SignupRequest, TokenResponse, UserRead},
};
use crate::shared::{AppError, AppState};

/// HTTP handler for registering a new account
///
/// POST /auth/signup
/// Returns the created user without its password hash
#[instrument(name = "signup", skip(state, request))]
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<UserRead>, AppError> {
    let user = AuthService::from_state(&state).register(request).await?;

    info!(user_id = user.id, "Signup successful");

    Ok(Json(UserRead::from(user)))
}

/// HTTP handler for password login
///
/// POST /auth/login (form encoded, `username` carries the email)
/// Returns a bearer access token
#[instrument(name = "login", skip(state, form), fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, AppError> {
    let token = AuthService::from_state(&state)
        .authenticate(&form.username, &form.password)
        .await?;

    Ok(Json(token))
}

/// GET /auth/me
#[instrument(name = "me", skip(user), fields(user_id = user.id))]
pub async fn me(Extension(user): Extension<CurrentUser>) -> Json<UserRead> {
    Json(UserRead::from(user.0))
}
