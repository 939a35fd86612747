//! Product CRUD handlers.
//!
//! Thin pass-throughs to the products repository:
//!
//! - `GET    /api/products`      - List all products
//! - `GET    /api/products/{id}` - Fetch one product
//! - `POST   /api/products`      - Create a product
//! - `PUT    /api/products/{id}` - Replace a product
//! - `DELETE /api/products/{id}` - Delete a product
//!
//! Write handlers deserialize the body manually so malformed JSON maps to
//! 400 rather than axum's default 422.

use crate::errors::ApiError;
use crate::models::{CreateProductRequest, Product, UpdateProductRequest};
use crate::repositories::ProductsRepository;
use crate::routes::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::instrument;

/// Handler for GET /api/products
///
/// Returns 200 with the full product list.
#[instrument(skip_all, name = "pa.products.list")]
pub async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = ProductsRepository::list(&state.pool).await?;
    Ok(Json(products))
}

/// Handler for GET /api/products/{id}
///
/// Returns 200 with the product, or 404 if no such row exists.
#[instrument(skip_all, name = "pa.products.get", fields(product_id = id))]
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Product>, ApiError> {
    let product = ProductsRepository::get(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    Ok(Json(product))
}

/// Handler for POST /api/products
///
/// Returns 201 with the stored product (including its assigned id), or 400
/// for a malformed or invalid body.
#[instrument(skip_all, name = "pa.products.create")]
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    body: axum::body::Bytes,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let request: CreateProductRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(target: "pa.handlers.products", error = %e, "Invalid request body");
        ApiError::BadRequest("Invalid request body".to_string())
    })?;

    request
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let product = ProductsRepository::create(&state.pool, &request).await?;

    tracing::info!(
        target: "pa.handlers.products",
        product_id = product.id,
        "Product created"
    );

    Ok((StatusCode::CREATED, Json(product)))
}

/// Handler for PUT /api/products/{id}
///
/// The body carries a full product representation; its id must match the
/// path id. Returns 204 on success, 400 on mismatch or invalid body, 404 if
/// the row does not exist.
#[instrument(skip_all, name = "pa.products.update", fields(product_id = id))]
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    body: axum::body::Bytes,
) -> Result<StatusCode, ApiError> {
    let request: UpdateProductRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(target: "pa.handlers.products", error = %e, "Invalid request body");
        ApiError::BadRequest("Invalid request body".to_string())
    })?;

    if request.id != id {
        return Err(ApiError::BadRequest(
            "Product id in body does not match path".to_string(),
        ));
    }

    request
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let updated = ProductsRepository::update(&state.pool, id, &request).await?;
    if !updated {
        return Err(ApiError::NotFound("Product not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for DELETE /api/products/{id}
///
/// Returns 204 on success, 404 if the row does not exist.
#[instrument(skip_all, name = "pa.products.delete", fields(product_id = id))]
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let deleted = ProductsRepository::delete(&state.pool, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Product not found".to_string()));
    }

    tracing::info!(
        target: "pa.handlers.products",
        product_id = id,
        "Product deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}
