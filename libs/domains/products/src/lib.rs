//! Products Domain
//!
//! Catalog products and their many-to-many association with categories.
//! The association is owned by the product side: category links are
//! written only through product create/update, inside one transaction.
//!
//! Search combines an optional category-membership filter with an
//! optional case-insensitive name substring filter; a product matching
//! through several categories appears once.

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{ProductError, ProductResult};
pub use models::{CreateProduct, Product, ProductFilter, ProductResponse, UpdateProduct};
pub use postgres::PgProductRepository;
pub use repository::{InMemoryProductRepository, ProductRepository};
pub use service::ProductService;
