use axum::extract::{Path, State};
use serde_json::{Map, Value};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::store::Product;

pub const PRODUCT_NOT_FOUND: &str = "Producto no encontrado";

/// POST /products - Store the body verbatim under a fresh id
pub async fn create(
    State(state): State<AppState>,
    ApiJson(fields): ApiJson<Map<String, Value>>,
) -> ApiResult<Product> {
    let product = state.products.create(fields)?;
    Ok(ApiResponse::created(product))
}

/// GET /products - Every product in creation order
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Product>> {
    Ok(ApiResponse::success(state.products.list()?))
}

/// GET /products/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Product> {
    let product = state
        .products
        .get(&id)?
        .ok_or_else(|| ApiError::not_found(PRODUCT_NOT_FOUND))?;
    Ok(ApiResponse::success(product))
}

/// PUT /products/:id - Replace the record, keeping its id
pub async fn replace(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(fields): ApiJson<Map<String, Value>>,
) -> ApiResult<Product> {
    let product = state
        .products
        .replace(&id, fields)?
        .ok_or_else(|| ApiError::not_found(PRODUCT_NOT_FOUND))?;
    Ok(ApiResponse::success(product))
}

/// DELETE /products/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    if !state.products.delete(&id)? {
        return Err(ApiError::not_found(PRODUCT_NOT_FOUND));
    }
    Ok(ApiResponse::no_content())
}
