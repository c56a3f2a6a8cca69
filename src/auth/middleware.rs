use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::ops::Deref;
use tracing::{debug, instrument, warn};

use super::{models::UserModel, service::AuthService};
use crate::shared::{AppError, AppState};

/// The authenticated caller, inserted into request extensions by `require_user`
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserModel);

impl Deref for CurrentUser {
    type Target = UserModel;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Pulls the token out of an `Authorization: Bearer <token>` value. The scheme is case-insensitive.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Bearer authentication middleware - resolves the token to a user and adds `CurrentUser` to the request.
/// Usage: .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_user))
#[instrument(skip(state, req, next), fields(uri = %req.uri()))]
pub async fn require_user(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| {
            warn!("Missing Authorization header in request");
            AppError::Unauthorized("Not authenticated".to_string())
        })?;

    let token = bearer_token(auth_header).ok_or_else(|| {
        warn!("Invalid Authorization header format (expected Bearer token)");
        AppError::Unauthorized("Not authenticated".to_string())
    })?;

    let user = match AuthService::from_state(&state).verify_token(token).await {
        Ok(user) => user,
        Err(e) => {
            warn!("Bearer authentication failed: {}", e);
            return Err(e);
        }
    };

    debug!(user_id = user.id, "Authentication successful, adding user to request");

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}
