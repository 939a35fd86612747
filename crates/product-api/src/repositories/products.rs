//! Products repository for database operations.
//!
//! All queries use parameterized statements. Timestamps are assigned here so
//! the whole row comes from one clock.

use crate::errors::ApiError;
use crate::models::{CreateProductRequest, Product, UpdateProductRequest};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::instrument;

/// Repository for product catalog operations.
pub struct ProductsRepository;

impl ProductsRepository {
    /// List all products, oldest first.
    #[instrument(skip_all, name = "pa.repo.products.list")]
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Product>, ApiError> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price, stock, created_at, updated_at
            FROM products
            ORDER BY id
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(products)
    }

    /// Fetch one product by id. Returns `None` if no row exists.
    #[instrument(skip_all, name = "pa.repo.products.get", fields(product_id = id))]
    pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<Product>, ApiError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price, stock, created_at, updated_at
            FROM products
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(product)
    }

    /// Insert a product and return the stored row with its assigned id.
    #[instrument(skip_all, name = "pa.repo.products.create")]
    pub async fn create(
        pool: &SqlitePool,
        request: &CreateProductRequest,
    ) -> Result<Product, ApiError> {
        let now = Utc::now();

        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, description, price, stock, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, name, description, price, stock, created_at, updated_at
            "#,
        )
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.price)
        .bind(request.stock)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(product)
    }

    /// Replace a product. Returns `false` if no row with this id exists.
    #[instrument(skip_all, name = "pa.repo.products.update", fields(product_id = id))]
    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        request: &UpdateProductRequest,
    ) -> Result<bool, ApiError> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?, description = ?, price = ?, stock = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.price)
        .bind(request.stock)
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a product. Returns `false` if no row with this id exists.
    #[instrument(skip_all, name = "pa.repo.products.delete", fields(product_id = id))]
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
