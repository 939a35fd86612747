//! # Product API Test Utilities
//!
//! Shared test utilities for the Product API service.
//!
//! This crate provides:
//! - Server test harness (`TestServer` for E2E tests)
//! - Re-exports of the metric emitter test doubles
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pa_test_utils::TestServer;
//!
//! #[sqlx::test(migrations = "../../migrations")]
//! async fn test_example(pool: SqlitePool) -> Result<(), anyhow::Error> {
//!     let server = TestServer::spawn(pool).await?;
//!     let client = reqwest::Client::new();
//!
//!     let response = client
//!         .get(format!("{}/health", server.url()))
//!         .send()
//!         .await?;
//!
//!     assert_eq!(response.status(), 200);
//!     Ok(())
//! }
//! ```

pub mod server_harness;

// Re-export commonly used items
pub use product_api::observability::testing::{Emission, FailingSink, RecordingSink};
pub use server_harness::*;
