//! Inventory service routes

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use serde_json::{Value, json};

use crate::{
    error::{ApiError, ApiResult},
    models::{ListProductsQuery, ProductPage, ProductPayload, SearchProductsQuery},
    state::AppState,
    validation::{ValidationErrors, parse_payload},
};

pub const TOTAL_COUNT_HEADER: HeaderName = HeaderName::from_static("x-total-count");
pub const TOTAL_PAGES_HEADER: HeaderName = HeaderName::from_static("x-total-pages");
pub const LOW_STOCK_HEADER: HeaderName = HeaderName::from_static("x-low-stock-alert");

/// Create the router for the inventory service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/products", get(get_products).post(create_product))
        .route("/products/search", get(search_products))
        .route(
            "/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(state)
}

fn pagination_headers(page: &ProductPage) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(TOTAL_COUNT_HEADER, HeaderValue::from(page.total_items));
    headers.insert(TOTAL_PAGES_HEADER, HeaderValue::from(page.total_pages));
    headers
}

/// Unparsable JSON is reported under `$`; ill-typed fields under their own name
fn parse_body(body: Result<Json<Value>, JsonRejection>) -> ApiResult<ProductPayload> {
    let Json(body) = body.map_err(|rejection| {
        ApiError::Validation(ValidationErrors::single("$", rejection.body_text()))
    })?;

    parse_payload(&body).map_err(ApiError::Validation)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let store_ok = match state.product_service.store().health_check().await {
        Ok(ok) => ok,
        Err(e) => {
            tracing::error!("Store health check failed: {}", e);
            false
        }
    };

    let status = if store_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if store_ok { "ok" } else { "degraded" },
            "service": "inventory-service"
        })),
    )
}

/// List products with category filter, sorting and pagination
pub async fn get_products(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> ApiResult<impl IntoResponse> {
    let page = state.product_service.list_products(&query).await?;

    Ok((pagination_headers(&page), Json(page.items)))
}

/// Get a product by ID
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    let lookup = state.product_service.get_product(id).await?;

    let mut headers = HeaderMap::new();
    if lookup.low_stock {
        headers.insert(LOW_STOCK_HEADER, HeaderValue::from_static("true"));
    }

    Ok((headers, Json(lookup.product)))
}

/// Create a new product
pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let payload = parse_body(payload)?;
    let product = state.product_service.create_product(&payload).await?;

    let location = HeaderValue::from_str(&format!("/products/{}", product.id)).map_err(|e| {
        tracing::error!("Failed to build location header: {}", e);
        ApiError::InternalServerError
    })?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(product),
    ))
}

/// Replace the editable fields of a product
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let payload = parse_body(payload)?;
    state.product_service.update_product(id, &payload).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Soft-delete a product
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    state.product_service.delete_product(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Search products by name or description
pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<SearchProductsQuery>,
) -> ApiResult<impl IntoResponse> {
    let page = state.product_service.search_products(&query).await?;

    Ok((pagination_headers(&page), Json(page.items)))
}
