//! Product CRUD integration tests.
//!
//! Exercises the full HTTP surface against a real SQLite database using the
//! `TestServer` harness.

use pa_test_utils::TestServer;
use serde_json::json;
use sqlx::SqlitePool;

#[sqlx::test(migrations = "../../migrations")]
async fn test_create_then_get_roundtrip(pool: SqlitePool) -> Result<(), anyhow::Error> {
    let server = TestServer::spawn(pool).await?;
    let client = reqwest::Client::new();

    let created: serde_json::Value = client
        .post(format!("{}/api/products", server.url()))
        .json(&json!({
            "name": "Mechanical keyboard",
            "description": "Tenkeyless, brown switches",
            "price": 89.99,
            "stock": 25
        }))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let id = created["id"].as_i64().expect("created product has an id");
    assert_eq!(created["name"], "Mechanical keyboard");
    assert_eq!(created["price"], 89.99);
    assert_eq!(created["stock"], 25);

    let fetched: serde_json::Value = client
        .get(format!("{}/api/products/{}", server.url(), id))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    assert_eq!(fetched["id"], created["id"]);
    assert_eq!(fetched["name"], created["name"]);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_create_returns_201(pool: SqlitePool) -> Result<(), anyhow::Error> {
    let server = TestServer::spawn(pool).await?;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/products", server.url()))
        .json(&json!({"name": "Widget", "price": 1.5}))
        .send()
        .await?;

    assert_eq!(response.status(), 201);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_get_missing_returns_404(pool: SqlitePool) -> Result<(), anyhow::Error> {
    let server = TestServer::spawn(pool).await?;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/products/999999", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), 404);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_list_returns_all_products(pool: SqlitePool) -> Result<(), anyhow::Error> {
    let server = TestServer::spawn(pool).await?;
    let client = reqwest::Client::new();

    for name in ["First", "Second", "Third"] {
        client
            .post(format!("{}/api/products", server.url()))
            .json(&json!({"name": name, "price": 1.0}))
            .send()
            .await?
            .error_for_status()?;
    }

    let products: Vec<serde_json::Value> = client
        .get(format!("{}/api/products", server.url()))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    assert_eq!(products.len(), 3);
    let names: Vec<&str> = products
        .iter()
        .filter_map(|p| p["name"].as_str())
        .collect();
    assert_eq!(names, vec!["First", "Second", "Third"]);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_create_malformed_body_returns_400(pool: SqlitePool) -> Result<(), anyhow::Error> {
    let server = TestServer::spawn(pool).await?;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/products", server.url()))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;

    assert_eq!(response.status(), 400);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_create_invalid_price_returns_400(pool: SqlitePool) -> Result<(), anyhow::Error> {
    let server = TestServer::spawn(pool).await?;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/products", server.url()))
        .json(&json!({"name": "Widget", "price": -1.0}))
        .send()
        .await?;

    assert_eq!(response.status(), 400);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_update_mismatched_id_returns_400(pool: SqlitePool) -> Result<(), anyhow::Error> {
    let server = TestServer::spawn(pool).await?;
    let client = reqwest::Client::new();

    let created: serde_json::Value = client
        .post(format!("{}/api/products", server.url()))
        .json(&json!({"name": "Widget", "price": 1.5}))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    let id = created["id"].as_i64().expect("id");

    let response = client
        .put(format!("{}/api/products/{}", server.url(), id))
        .json(&json!({"id": id + 1, "name": "Widget", "price": 1.5, "stock": 0}))
        .send()
        .await?;

    assert_eq!(response.status(), 400);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_update_success_returns_204_and_persists(
    pool: SqlitePool,
) -> Result<(), anyhow::Error> {
    let server = TestServer::spawn(pool).await?;
    let client = reqwest::Client::new();

    let created: serde_json::Value = client
        .post(format!("{}/api/products", server.url()))
        .json(&json!({"name": "Widget", "price": 1.5}))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    let id = created["id"].as_i64().expect("id");

    let response = client
        .put(format!("{}/api/products/{}", server.url(), id))
        .json(&json!({"id": id, "name": "Widget v2", "price": 2.5, "stock": 7}))
        .send()
        .await?;

    assert_eq!(response.status(), 204);

    let fetched: serde_json::Value = client
        .get(format!("{}/api/products/{}", server.url(), id))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    assert_eq!(fetched["name"], "Widget v2");
    assert_eq!(fetched["price"], 2.5);
    assert_eq!(fetched["stock"], 7);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_update_missing_returns_404(pool: SqlitePool) -> Result<(), anyhow::Error> {
    let server = TestServer::spawn(pool).await?;
    let client = reqwest::Client::new();

    let response = client
        .put(format!("{}/api/products/424242", server.url()))
        .json(&json!({"id": 424242, "name": "Ghost", "price": 1.0, "stock": 0}))
        .send()
        .await?;

    assert_eq!(response.status(), 404);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_delete_then_get_returns_404(pool: SqlitePool) -> Result<(), anyhow::Error> {
    let server = TestServer::spawn(pool).await?;
    let client = reqwest::Client::new();

    let created: serde_json::Value = client
        .post(format!("{}/api/products", server.url()))
        .json(&json!({"name": "Ephemeral", "price": 0.5}))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    let id = created["id"].as_i64().expect("id");

    let response = client
        .delete(format!("{}/api/products/{}", server.url(), id))
        .send()
        .await?;
    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("{}/api/products/{}", server.url(), id))
        .send()
        .await?;
    assert_eq!(response.status(), 404);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_delete_missing_returns_404(pool: SqlitePool) -> Result<(), anyhow::Error> {
    let server = TestServer::spawn(pool).await?;
    let client = reqwest::Client::new();

    let response = client
        .delete(format!("{}/api/products/31337", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), 404);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_unknown_route_returns_404(pool: SqlitePool) -> Result<(), anyhow::Error> {
    let server = TestServer::spawn(pool).await?;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/nonexistent", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), 404);

    Ok(())
}
