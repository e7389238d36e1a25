use axum::extract::{Path, State};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::store::{User, UserInput, UserSummary};

pub const USER_NOT_FOUND: &str = "Usuario no encontrado";

/// POST /users - Create a user with a generated id
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<UserInput>,
) -> ApiResult<User> {
    let user = state.users.create(input)?;
    Ok(ApiResponse::created(user))
}

/// GET /users/:id - Only id and name are returned
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<UserSummary> {
    let user = state
        .users
        .get(&id)?
        .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))?;
    Ok(ApiResponse::success(user.into()))
}

/// POST /users/:id - Overwrite name, age and email
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<UserInput>,
) -> ApiResult<User> {
    let user = state
        .users
        .update(&id, input)?
        .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))?;
    Ok(ApiResponse::success(user))
}

/// DELETE /users/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    if !state.users.delete(&id)? {
        return Err(ApiError::not_found(USER_NOT_FOUND));
    }
    Ok(ApiResponse::no_content())
}
