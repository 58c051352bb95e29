//! Application state shared across handlers

use crate::service::ProductService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub product_service: ProductService,
}

impl AppState {
    pub fn new(product_service: ProductService) -> Self {
        Self { product_service }
    }
}
