//! Product API models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum product name length.
pub const MAX_PRODUCT_NAME_LENGTH: usize = 200;

/// A product as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    /// Database-assigned identifier.
    pub id: i64,

    /// Product display name.
    pub name: String,

    /// Optional free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Unit price.
    pub price: f64,

    /// Units in stock.
    pub stock: i64,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Request to create a product.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateProductRequest {
    /// Product display name.
    pub name: String,

    /// Optional free-text description.
    pub description: Option<String>,

    /// Unit price.
    pub price: f64,

    /// Units in stock (defaults to 0).
    #[serde(default)]
    pub stock: i64,
}

impl CreateProductRequest {
    /// Validate the request.
    ///
    /// # Errors
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_product_fields(&self.name, self.price, self.stock)
    }
}

/// Request to replace a product. The id must match the path id (the body is
/// a full product representation).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateProductRequest {
    /// Identifier of the product being replaced.
    pub id: i64,

    /// Product display name.
    pub name: String,

    /// Optional free-text description.
    pub description: Option<String>,

    /// Unit price.
    pub price: f64,

    /// Units in stock (defaults to 0).
    #[serde(default)]
    pub stock: i64,
}

impl UpdateProductRequest {
    /// Validate the request.
    ///
    /// # Errors
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_product_fields(&self.name, self.price, self.stock)
    }
}

fn validate_product_fields(name: &str, price: f64, stock: i64) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Product name must not be empty");
    }

    if name.len() > MAX_PRODUCT_NAME_LENGTH {
        return Err("Product name must be at most 200 characters");
    }

    if !price.is_finite() || price < 0.0 {
        return Err("Price must be a non-negative number");
    }

    if stock < 0 {
        return Err("Stock must not be negative");
    }

    Ok(())
}

/// Health check response.
///
/// Returned by the `/health` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service health status ("healthy" or "unhealthy").
    pub status: String,

    /// Database connectivity status.
    pub database: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn create_request() -> CreateProductRequest {
        CreateProductRequest {
            name: "Mechanical keyboard".to_string(),
            description: Some("Tenkeyless, brown switches".to_string()),
            price: 89.99,
            stock: 25,
        }
    }

    #[test]
    fn test_product_serialization_omits_missing_description() {
        let product = Product {
            id: 7,
            name: "Widget".to_string(),
            description: None,
            price: 1.5,
            stock: 3,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&product).expect("serialization should succeed");
        assert!(json.contains("\"id\":7"));
        assert!(json.contains("\"name\":\"Widget\""));
        assert!(!json.contains("description"));
    }

    #[test]
    fn test_create_request_deserialization() {
        let json = r#"{"name":"Widget","price":1.5}"#;
        let request: CreateProductRequest =
            serde_json::from_str(json).expect("deserialization should succeed");

        assert_eq!(request.name, "Widget");
        assert_eq!(request.price, 1.5);
        assert_eq!(request.stock, 0);
        assert_eq!(request.description, None);
    }

    #[test]
    fn test_create_request_rejects_unknown_fields() {
        let json = r#"{"name":"Widget","price":1.5,"extra":"field"}"#;
        let result: Result<CreateProductRequest, _> = serde_json::from_str(json);

        assert!(result.is_err(), "Should reject unknown fields");
    }

    #[test]
    fn test_create_request_validation_success() {
        assert!(create_request().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_empty_name() {
        let mut request = create_request();
        request.name = "   ".to_string();

        assert_eq!(
            request.validate().unwrap_err(),
            "Product name must not be empty"
        );
    }

    #[test]
    fn test_validation_rejects_long_name() {
        let mut request = create_request();
        request.name = "a".repeat(MAX_PRODUCT_NAME_LENGTH + 1);

        assert_eq!(
            request.validate().unwrap_err(),
            "Product name must be at most 200 characters"
        );
    }

    #[test]
    fn test_validation_rejects_negative_price() {
        let mut request = create_request();
        request.price = -0.01;

        assert_eq!(
            request.validate().unwrap_err(),
            "Price must be a non-negative number"
        );
    }

    #[test]
    fn test_validation_rejects_non_finite_price() {
        let mut request = create_request();
        request.price = f64::NAN;
        assert!(request.validate().is_err());

        request.price = f64::INFINITY;
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_negative_stock() {
        let mut request = create_request();
        request.stock = -1;

        assert_eq!(
            request.validate().unwrap_err(),
            "Stock must not be negative"
        );
    }

    #[test]
    fn test_update_request_deserialization() {
        let json = r#"{"id":7,"name":"Widget","price":2.0,"stock":4}"#;
        let request: UpdateProductRequest =
            serde_json::from_str(json).expect("deserialization should succeed");

        assert_eq!(request.id, 7);
        assert_eq!(request.stock, 4);
    }

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            database: "healthy".to_string(),
        };

        let json = serde_json::to_string(&response).expect("serialization should succeed");
        assert!(json.contains("\"status\":\"healthy\""));
        assert!(json.contains("\"database\":\"healthy\""));
    }
}
