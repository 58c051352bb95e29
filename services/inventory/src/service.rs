//! Product catalog operations
//!
//! Each operation validates its input, issues one query or single-row
//! mutation against the [`ProductStore`], and shapes the result. The
//! service keeps no state of its own between requests.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::{
    error::{ApiError, ApiResult},
    models::{
        ListProductsQuery, NewProduct, Product, ProductLookup, ProductPage, ProductPayload,
        SearchProductsQuery,
    },
    query::{ListFilter, Page, PageWindow, SortKey},
    store::{ProductStore, StoreError},
    validation::validate_product,
};

/// Stock level below which lookups carry a low-stock advisory
pub const LOW_STOCK_THRESHOLD: i32 = 5;

/// Default upper bound for `pageSize`
pub const DEFAULT_MAX_PAGE_SIZE: i64 = 100;

#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn ProductStore>,
    max_page_size: i64,
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductStore>, max_page_size: i64) -> Self {
        Self {
            store,
            max_page_size: max_page_size.max(1),
        }
    }

    pub fn store(&self) -> &Arc<dyn ProductStore> {
        &self.store
    }

    fn window(&self, page: Option<i64>, page_size: Option<i64>) -> PageWindow {
        PageWindow::new(page, page_size, self.max_page_size)
    }

    fn to_product_page(window: PageWindow, page: Page<Product>) -> ProductPage {
        ProductPage {
            total_pages: window.total_pages(page.total_items),
            total_items: page.total_items,
            items: page.items,
        }
    }

    /// List active products with optional category filter, sorting and paging
    pub async fn list_products(&self, query: &ListProductsQuery) -> ApiResult<ProductPage> {
        let filter = ListFilter::new(query.category.as_deref());
        let sort = SortKey::parse(query.sort_by.as_deref());
        let window = self.window(query.page, query.page_size);

        let page = self.store.list(&filter, sort, window).await?;
        Ok(Self::to_product_page(window, page))
    }

    /// Fetch one active product
    pub async fn get_product(&self, id: i32) -> ApiResult<ProductLookup> {
        let product = self
            .store
            .find_active(id)
            .await?
            .ok_or(ApiError::NotFound)?;

        Ok(ProductLookup {
            low_stock: product.stock_quantity < LOW_STOCK_THRESHOLD,
            product,
        })
    }

    /// Create a product; server-owned fields are never taken from the payload
    pub async fn create_product(&self, payload: &ProductPayload) -> ApiResult<Product> {
        let fields = validate_product(payload, false).map_err(ApiError::Validation)?;

        let created = self
            .store
            .insert(NewProduct {
                fields,
                created_at: Utc::now(),
            })
            .await?;

        info!("Created product {} ({})", created.id, created.name);
        Ok(created)
    }

    /// Overwrite the editable fields of an active product
    pub async fn update_product(&self, id: i32, payload: &ProductPayload) -> ApiResult<()> {
        let fields = validate_product(payload, true).map_err(ApiError::Validation)?;

        if payload.id != Some(id) {
            return Err(ApiError::BadRequest(format!(
                "Product id in path ({}) does not match id in body",
                id
            )));
        }

        let mut product = self
            .store
            .find_active(id)
            .await?
            .ok_or(ApiError::NotFound)?;
        product.apply(fields, Utc::now());

        match self.store.save(&product).await {
            Ok(_) => {
                info!("Updated product {}", id);
                Ok(())
            }
            Err(e @ StoreError::Conflict(_)) => {
                if self.store.exists_active(id).await? {
                    return Err(e.into());
                }
                warn!("Product {} disappeared during update", id);
                Err(ApiError::NotFound)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Soft-delete an active product
    pub async fn delete_product(&self, id: i32) -> ApiResult<()> {
        let mut product = self
            .store
            .find_active(id)
            .await?
            .ok_or(ApiError::NotFound)?;
        product.deactivate(Utc::now());

        self.store.save(&product).await?;

        info!("Deactivated product {}", id);
        Ok(())
    }

    /// Substring search over name and description of active products
    pub async fn search_products(&self, query: &SearchProductsQuery) -> ApiResult<ProductPage> {
        let window = self.window(query.page, query.page_size);

        let page = self.store.search(&query.query, window).await?;
        Ok(Self::to_product_page(window, page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryProductStore, StoreResult};
    use async_trait::async_trait;
    use rust_decimal::Decimal;

    fn payload(name: &str, cents: i64, stock: i32, category: &str) -> ProductPayload {
        ProductPayload {
            id: None,
            name: Some(name.to_string()),
            description: Some(format!("{} description", name)),
            price: Some(Decimal::new(cents, 2)),
            stock_quantity: Some(stock),
            category: Some(category.to_string()),
        }
    }

    async fn seeded() -> ProductService {
        let service = ProductService::new(Arc::new(InMemoryProductStore::new()), 100);
        for p in [
            payload("Test Laptop", 99999, 10, "Electronics"),
            payload("Test Phone", 59999, 15, "Electronics"),
            payload("Test Chair", 19999, 4, "Furniture"),
        ] {
            service.create_product(&p).await.unwrap();
        }
        service
    }

    /// Store whose writes always lose the optimistic concurrency race
    struct RacingStore {
        inner: InMemoryProductStore,
        deactivate_on_save: bool,
    }

    #[async_trait]
    impl ProductStore for RacingStore {
        async fn list(
            &self,
            filter: &ListFilter,
            sort: SortKey,
            window: PageWindow,
        ) -> StoreResult<Page<Product>> {
            self.inner.list(filter, sort, window).await
        }

        async fn search(&self, text: &str, window: PageWindow) -> StoreResult<Page<Product>> {
            self.inner.search(text, window).await
        }

        async fn find_active(&self, id: i32) -> StoreResult<Option<Product>> {
            self.inner.find_active(id).await
        }

        async fn find_any(&self, id: i32) -> StoreResult<Option<Product>> {
            self.inner.find_any(id).await
        }

        async fn exists_active(&self, id: i32) -> StoreResult<bool> {
            self.inner.exists_active(id).await
        }

        async fn insert(&self, product: NewProduct) -> StoreResult<Product> {
            self.inner.insert(product).await
        }

        async fn save(&self, product: &Product) -> StoreResult<Product> {
            if self.deactivate_on_save {
                let mut current = product.clone();
                current.deactivate(Utc::now());
                self.inner.save(&current).await?;
            }
            Err(StoreError::Conflict(product.id))
        }

        async fn health_check(&self) -> StoreResult<bool> {
            Ok(true)
        }
    }

    async fn racing(deactivate_on_save: bool) -> ProductService {
        let inner = InMemoryProductStore::new();
        inner
            .insert(NewProduct {
                fields: validate_product(&payload("Lamp", 1000, 3, "Lighting"), false).unwrap(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        ProductService::new(
            Arc::new(RacingStore {
                inner,
                deactivate_on_save,
            }),
            100,
        )
    }

    #[tokio::test]
    async fn test_list_returns_all_active_products() {
        let service = seeded().await;
        let page = service
            .list_products(&ListProductsQuery::default())
            .await
            .unwrap();

        assert_eq!(page.items.len(), 3);
        assert_eq!(page.total_items, 3);
        assert_eq!(page.total_pages, 1);
    }

    #[tokio::test]
    async fn test_list_total_pages_use_clamped_page_size() {
        let service = seeded().await;
        let page = service
            .list_products(&ListProductsQuery {
                page_size: Some(0),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total_pages, 3);
    }

    #[tokio::test]
    async fn test_get_flags_low_stock() {
        let service = seeded().await;

        let chair = service.get_product(3).await.unwrap();
        assert!(chair.low_stock);

        let laptop = service.get_product(1).await.unwrap();
        assert!(!laptop.low_stock);
        assert_eq!(laptop.product.name, "Test Laptop");
    }

    #[tokio::test]
    async fn test_stock_at_threshold_is_not_low() {
        let service = seeded().await;
        let desk = service
            .create_product(&payload("Test Desk", 24999, LOW_STOCK_THRESHOLD, "Furniture"))
            .await
            .unwrap();

        let lookup = service.get_product(desk.id).await.unwrap();
        assert_eq!(lookup.product.stock_quantity, 5);
        assert!(!lookup.low_stock);
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_not_found() {
        let service = seeded().await;
        assert!(matches!(
            service.get_product(-1).await,
            Err(ApiError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_payload() {
        let service = seeded().await;
        let mut invalid = payload("", 100, 1, "Misc");
        invalid.price = None;

        match service.create_product(&invalid).await {
            Err(ApiError::Validation(errors)) => {
                assert!(errors.get("name").is_some());
                assert!(errors.get("price").is_some());
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_id_mismatch_is_bad_request() {
        let service = seeded().await;
        let mut body = payload("Renamed", 100, 1, "Misc");
        body.id = Some(2);

        assert!(matches!(
            service.update_product(1, &body).await,
            Err(ApiError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_update_changes_editable_fields_only() {
        let service = seeded().await;
        let before = service.get_product(2).await.unwrap().product;

        let mut body = payload("Updated Phone", 64999, 2, "Mobile");
        body.id = Some(2);
        body.description = None;
        service.update_product(2, &body).await.unwrap();

        let after = service.get_product(2).await.unwrap().product;
        assert_eq!(after.id, 2);
        assert_eq!(after.name, "Updated Phone");
        assert_eq!(after.description, None);
        assert_eq!(after.price, Decimal::new(64999, 2));
        assert_eq!(after.stock_quantity, 2);
        assert_eq!(after.category, "Mobile");
        assert_eq!(after.created_at, before.created_at);
        assert!(after.is_active);
        assert!(after.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_delete_then_mutations_are_not_found() {
        let service = seeded().await;
        service.delete_product(1).await.unwrap();

        assert!(matches!(service.get_product(1).await, Err(ApiError::NotFound)));
        assert!(matches!(service.delete_product(1).await, Err(ApiError::NotFound)));

        let mut body = payload("Ghost", 100, 1, "Misc");
        body.id = Some(1);
        assert!(matches!(
            service.update_product(1, &body).await,
            Err(ApiError::NotFound)
        ));

        let raw = service.store().find_any(1).await.unwrap().unwrap();
        assert!(!raw.is_active);
    }

    #[tokio::test]
    async fn test_update_conflict_on_vanished_product_is_not_found() {
        let service = racing(true).await;
        let mut body = payload("Lamp", 1500, 3, "Lighting");
        body.id = Some(1);

        assert!(matches!(
            service.update_product(1, &body).await,
            Err(ApiError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_update_conflict_on_live_product_propagates() {
        let service = racing(false).await;
        let mut body = payload("Lamp", 1500, 3, "Lighting");
        body.id = Some(1);

        assert!(matches!(
            service.update_product(1, &body).await,
            Err(ApiError::Store(StoreError::Conflict(1)))
        ));
    }

    #[tokio::test]
    async fn test_search_matches_name_or_description() {
        let service = seeded().await;
        let page = service
            .search_products(&SearchProductsQuery {
                query: "Laptop".to_string(),
                page: None,
                page_size: None,
            })
            .await
            .unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "Test Laptop");
        assert_eq!(page.total_pages, 1);
    }
}
