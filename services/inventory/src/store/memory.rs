//! In-process product store backed by a mutex-guarded map

use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;

use super::{ProductStore, StoreError, StoreResult};
use crate::{
    models::{NewProduct, Product},
    query::{ListFilter, Page, PageWindow, SortKey},
};

#[derive(Debug, Default)]
struct Inner {
    last_id: i32,
    rows: BTreeMap<i32, Product>,
}

/// Product store that lives in memory; ids start at 1
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    inner: Mutex<Inner>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("product store lock poisoned".to_string()))
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn list(
        &self,
        filter: &ListFilter,
        sort: SortKey,
        window: PageWindow,
    ) -> StoreResult<Page<Product>> {
        let inner = self.lock()?;
        let mut matching: Vec<&Product> = inner.rows.values().filter(|p| filter.matches(p)).collect();
        matching.sort_by(|a, b| sort.compare(a, b));

        Ok(Page {
            total_items: matching.len() as i64,
            items: window.slice(matching.into_iter().cloned()),
        })
    }

    async fn search(&self, text: &str, window: PageWindow) -> StoreResult<Page<Product>> {
        let inner = self.lock()?;
        let matching: Vec<&Product> = inner
            .rows
            .values()
            .filter(|p| {
                p.is_active
                    && (p.name.contains(text)
                        || p.description.as_deref().is_some_and(|d| d.contains(text)))
            })
            .collect();

        Ok(Page {
            total_items: matching.len() as i64,
            items: window.slice(matching.into_iter().cloned()),
        })
    }

    async fn find_active(&self, id: i32) -> StoreResult<Option<Product>> {
        let inner = self.lock()?;
        Ok(inner.rows.get(&id).filter(|p| p.is_active).cloned())
    }

    async fn find_any(&self, id: i32) -> StoreResult<Option<Product>> {
        let inner = self.lock()?;
        Ok(inner.rows.get(&id).cloned())
    }

    async fn exists_active(&self, id: i32) -> StoreResult<bool> {
        let inner = self.lock()?;
        Ok(inner.rows.get(&id).is_some_and(|p| p.is_active))
    }

    async fn insert(&self, product: NewProduct) -> StoreResult<Product> {
        let mut inner = self.lock()?;
        inner.last_id = inner
            .last_id
            .checked_add(1)
            .ok_or_else(|| StoreError::Unavailable("product id space exhausted".to_string()))?;

        let fields = product.fields;
        let created = Product {
            id: inner.last_id,
            name: fields.name,
            description: fields.description,
            price: fields.price,
            stock_quantity: fields.stock_quantity,
            category: fields.category,
            is_active: true,
            created_at: product.created_at,
            updated_at: None,
            version: 0,
        };
        inner.rows.insert(created.id, created.clone());

        Ok(created)
    }

    async fn save(&self, product: &Product) -> StoreResult<Product> {
        let mut inner = self.lock()?;
        let stored = inner
            .rows
            .get_mut(&product.id)
            .filter(|stored| stored.version == product.version)
            .ok_or(StoreError::Conflict(product.id))?;

        // id and created_at are owned by the store
        stored.name = product.name.clone();
        stored.description = product.description.clone();
        stored.price = product.price;
        stored.stock_quantity = product.stock_quantity;
        stored.category = product.category.clone();
        stored.is_active = product.is_active;
        stored.updated_at = product.updated_at;
        stored.version += 1;

        Ok(stored.clone())
    }

    async fn health_check(&self) -> StoreResult<bool> {
        Ok(self.lock().is_ok())
    }
}
