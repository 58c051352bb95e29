//! PostgreSQL product store

use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::debug;

use common::{database, error::DatabaseError};

use super::{ProductStore, StoreError, StoreResult};
use crate::{
    models::{NewProduct, Product},
    query::{ListFilter, Page, PageWindow, SortKey},
};

const PRODUCT_COLUMNS: &str = "id, name, description, price, stock_quantity, category, \
                               is_active, created_at, updated_at, version";

const LIST_PREDICATE: &str = "is_active AND ($1::text IS NULL OR category = $1)";

const SEARCH_PREDICATE: &str = "is_active AND (strpos(name, $1) > 0 \
                                OR strpos(COALESCE(description, ''), $1) > 0)";

/// Product store for database operations
#[derive(Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    /// Create a new product store
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn query_error(e: sqlx::Error) -> StoreError {
    StoreError::Database(DatabaseError::Query(e))
}

fn product_from_row(row: &PgRow) -> Result<Product, sqlx::Error> {
    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        price: row.try_get("price")?,
        stock_quantity: row.try_get("stock_quantity")?,
        category: row.try_get("category")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        version: row.try_get("version")?,
    })
}

fn products_from_rows(rows: &[PgRow]) -> StoreResult<Vec<Product>> {
    rows.iter()
        .map(product_from_row)
        .collect::<Result<_, _>>()
        .map_err(query_error)
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn list(
        &self,
        filter: &ListFilter,
        sort: SortKey,
        window: PageWindow,
    ) -> StoreResult<Page<Product>> {
        let total_items: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM products WHERE {LIST_PREDICATE}"))
                .bind(filter.category.as_deref())
                .fetch_one(&self.pool)
                .await
                .map_err(query_error)?;

        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE {LIST_PREDICATE} \
             ORDER BY {} LIMIT $2 OFFSET $3",
            sort.order_by()
        );
        let rows = sqlx::query(&sql)
            .bind(filter.category.as_deref())
            .bind(window.limit())
            .bind(window.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(query_error)?;

        debug!(?filter, ?sort, total_items, "Listed products");

        Ok(Page {
            items: products_from_rows(&rows)?,
            total_items,
        })
    }

    async fn search(&self, text: &str, window: PageWindow) -> StoreResult<Page<Product>> {
        let total_items: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM products WHERE {SEARCH_PREDICATE}"))
                .bind(text)
                .fetch_one(&self.pool)
                .await
                .map_err(query_error)?;

        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE {SEARCH_PREDICATE} \
             ORDER BY id LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query(&sql)
            .bind(text)
            .bind(window.limit())
            .bind(window.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(query_error)?;

        Ok(Page {
            items: products_from_rows(&rows)?,
            total_items,
        })
    }

    async fn find_active(&self, id: i32) -> StoreResult<Option<Product>> {
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1 AND is_active"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(query_error)?;

        row.as_ref()
            .map(product_from_row)
            .transpose()
            .map_err(query_error)
    }

    async fn find_any(&self, id: i32) -> StoreResult<Option<Product>> {
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(query_error)?;

        row.as_ref()
            .map(product_from_row)
            .transpose()
            .map_err(query_error)
    }

    async fn exists_active(&self, id: i32) -> StoreResult<bool> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM products WHERE id = $1 AND is_active)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(query_error)
    }

    async fn insert(&self, product: NewProduct) -> StoreResult<Product> {
        let fields = product.fields;
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO products (name, description, price, stock_quantity, category, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, TRUE, $6)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.price)
        .bind(fields.stock_quantity)
        .bind(&fields.category)
        .bind(product.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(query_error)?;

        product_from_row(&row).map_err(query_error)
    }

    async fn save(&self, product: &Product) -> StoreResult<Product> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE products
            SET name = $1, description = $2, price = $3, stock_quantity = $4, category = $5,
                is_active = $6, updated_at = $7, version = version + 1
            WHERE id = $8 AND version = $9
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.stock_quantity)
        .bind(&product.category)
        .bind(product.is_active)
        .bind(product.updated_at)
        .bind(product.id)
        .bind(product.version)
        .fetch_optional(&self.pool)
        .await
        .map_err(query_error)?;

        match row {
            Some(row) => product_from_row(&row).map_err(query_error),
            None => Err(StoreError::Conflict(product.id)),
        }
    }

    async fn health_check(&self) -> StoreResult<bool> {
        Ok(database::health_check(&self.pool).await?)
    }
}
