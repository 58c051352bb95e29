//! Inventory service
//!
//! HTTP API over a catalog of products: list, filter, sort, paginate,
//! search, create, update and soft-delete.

pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;
pub mod validation;

pub use routes::create_router;
pub use service::ProductService;
pub use state::AppState;
