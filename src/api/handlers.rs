use axum::Json;
use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use std::sync::Arc;

use super::error::ApiError;
use super::protocol::{CreateUserRequest, CreateUserResponse, UpdateUserRequest};
use super::validation::Validated;
use crate::storage::store::UserStore;
use crate::storage::types::{User, UserId, Users};

pub async fn handle_now() -> String {
    chrono::Utc::now().to_rfc3339()
}

pub async fn handle_list_users<S: UserStore>(
    Extension(store): Extension<Arc<S>>,
) -> Result<Json<Users>, ApiError> {
    let users = store.list().await?;
    tracing::debug!("Listing {} users", users.len());
    Ok(Json(users))
}

pub async fn handle_create_user<S: UserStore>(
    Extension(store): Extension<Arc<S>>,
    Validated(req): Validated<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreateUserResponse>), ApiError> {
    let user = User::new(req.display_name, req.email);
    let user_id = store.add(user).await?;

    tracing::info!("Created user {}", user_id);
    Ok((StatusCode::CREATED, Json(CreateUserResponse { user_id })))
}

pub async fn handle_get_user<S: UserStore>(
    Extension(store): Extension<Arc<S>>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let user = store.get(&UserId(id)).await?;
    Ok(Json(user))
}

pub async fn handle_update_user<S: UserStore>(
    Extension(store): Extension<Arc<S>>,
    Path(id): Path<String>,
    Validated(req): Validated<UpdateUserRequest>,
) -> Result<StatusCode, ApiError> {
    let id = UserId(id);
    store.update(&id, req.into()).await?;

    tracing::info!("Updated user {}", id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn handle_delete_user<S: UserStore>(
    Extension(store): Extension<Arc<S>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = UserId(id);
    store.delete(&id).await?;

    tracing::info!("Deleted user {}", id);
    Ok(StatusCode::NO_CONTENT)
}
