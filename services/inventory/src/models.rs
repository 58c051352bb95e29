//! API models for request and response payloads

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product record as stored and returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub category: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Optimistic concurrency token, bumped by the store on every write
    #[serde(skip)]
    pub version: i32,
}

impl Product {
    /// Overwrite the client-editable fields and stamp the update time
    pub fn apply(&mut self, fields: ProductFields, now: DateTime<Utc>) {
        self.name = fields.name;
        self.description = fields.description;
        self.price = fields.price;
        self.stock_quantity = fields.stock_quantity;
        self.category = fields.category;
        self.updated_at = Some(now);
    }

    /// Mark the product as logically deleted
    pub fn deactivate(&mut self, now: DateTime<Utc>) {
        self.is_active = false;
        self.updated_at = Some(now);
    }
}

/// A product about to be inserted; the store assigns the id
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub fields: ProductFields,
    pub created_at: DateTime<Utc>,
}

/// Validated, client-editable product fields
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub category: String,
}

/// Request body for create and update
///
/// Every field is optional at the wire level so that missing values are
/// reported as validation errors instead of deserialization failures.
/// Server-owned fields (`isActive`, `createdAt`, `updatedAt`) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub id: Option<i32>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock_quantity: Option<i32>,
    pub category: Option<String>,
}

/// Query parameters for product listing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsQuery {
    /// Exact category filter
    pub category: Option<String>,
    /// `price_asc`, `price_desc`, anything else sorts by name
    pub sort_by: Option<String>,
    /// Page number (1-based)
    pub page: Option<i64>,
    /// Number of items per page
    pub page_size: Option<i64>,
}

/// Query parameters for product search
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchProductsQuery {
    /// Substring matched against name and description
    pub query: String,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// One page of products plus the totals reported in response headers
#[derive(Debug, Clone)]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub total_items: i64,
    pub total_pages: i64,
}

/// Result of a single-product lookup
#[derive(Debug, Clone)]
pub struct ProductLookup {
    pub product: Product,
    pub low_stock: bool,
}
