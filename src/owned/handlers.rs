use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::entity::OwnedEntity;
use crate::auth::CurrentUser;
use crate::shared::{AppError, AppState};

/// Body returned by a successful delete
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct DeleteResponse {
    pub ok: bool,
}

/// GET {PATH} - rows owned by the caller, newest first
#[instrument(name = "list_owned", skip(state, user), fields(entity = E::LABEL, user_id = user.id))]
pub async fn list_owned<E: OwnedEntity>(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<E::Response>>, AppError> {
    let rows = E::repository(&state).list_for_owner(user.id).await?;

    info!(count = rows.len(), "Listed owned rows");

    Ok(Json(rows.into_iter().map(E::Response::from).collect()))
}

/// POST {PATH} - creates a row owned by the caller
#[instrument(name = "create_owned", skip(state, user, draft), fields(entity = E::LABEL, user_id = user.id))]
pub async fn create_owned<E: OwnedEntity>(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(draft): Json<E::Draft>,
) -> Result<Json<E::Response>, AppError> {
    let row = E::repository(&state)
        .create_for_owner(user.id, draft)
        .await?;

    info!(id = row.id(), "Created owned row");

    Ok(Json(E::Response::from(row)))
}

/// DELETE {PATH}/:id - removes a row if the caller owns it
#[instrument(name = "delete_owned", skip(state, user), fields(entity = E::LABEL, user_id = user.id))]
pub async fn delete_owned<E: OwnedEntity>(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, AppError> {
    E::repository(&state).delete_for_owner(user.id, id).await?;

    info!(id, "Deleted owned row");

    Ok(Json(DeleteResponse { ok: true }))
}

/// List/create/delete routes for one entity type. Authentication is layered on by the caller.
///
/// The collection is served both with and without a trailing slash.
pub fn owned_routes<E: OwnedEntity>() -> Router<AppState> {
    Router::new()
        .route(E::PATH, get(list_owned::<E>).post(create_owned::<E>))
        .route(
            &format!("{}/", E::PATH),
            get(list_owned::<E>).post(create_owned::<E>),
        )
        .route(&format!("{}/:id", E::PATH), delete(delete_owned::<E>))
}
