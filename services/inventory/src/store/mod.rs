//! Product persistence
//!
//! [`ProductStore`] is the seam between the catalog service and the backing
//! store. Every read path filters on `is_active`; soft-deleted rows stay in
//! storage and are only reachable through [`ProductStore::find_any`].

use async_trait::async_trait;
use thiserror::Error;

use common::error::DatabaseError;

use crate::{
    models::{NewProduct, Product},
    query::{ListFilter, Page, PageWindow, SortKey},
};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryProductStore;
pub use postgres::PgProductStore;

/// Errors raised by store backends
#[derive(Error, Debug)]
pub enum StoreError {
    /// The row changed between read and write
    #[error("Concurrent modification of product {0}")]
    Conflict(i32),

    /// Underlying database failure
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// Store could not be used at all
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Type alias for Result with StoreError
pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Active products matching `filter`, ordered by `sort`, windowed
    async fn list(
        &self,
        filter: &ListFilter,
        sort: SortKey,
        window: PageWindow,
    ) -> StoreResult<Page<Product>>;

    /// Active products whose name or description contains `text`
    /// (case-sensitive), in id order
    async fn search(&self, text: &str, window: PageWindow) -> StoreResult<Page<Product>>;

    /// The product with `id` if it is active
    async fn find_active(&self, id: i32) -> StoreResult<Option<Product>>;

    /// The product with `id` regardless of its active flag
    async fn find_any(&self, id: i32) -> StoreResult<Option<Product>>;

    async fn exists_active(&self, id: i32) -> StoreResult<bool>;

    /// Persist a new product; the store assigns the id
    async fn insert(&self, product: NewProduct) -> StoreResult<Product>;

    /// Write back a previously read product.
    ///
    /// Fails with [`StoreError::Conflict`] when the stored version no longer
    /// matches `product.version`. On success the returned product carries
    /// the new version.
    async fn save(&self, product: &Product) -> StoreResult<Product>;

    async fn health_check(&self) -> StoreResult<bool>;
}
