//! HTTP request handlers.

mod health;
mod metrics;
mod products;

pub use health::health_check;
pub use metrics::metrics_handler;
pub use products::{create_product, delete_product, get_product, list_products, update_product};
