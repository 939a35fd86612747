//! Database repositories.

mod products;

pub use products::ProductsRepository;
