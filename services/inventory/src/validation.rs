//! Input validation utilities

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::models::{ProductFields, ProductPayload};

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;
pub const MAX_CATEGORY_LEN: usize = 50;
pub const MAX_PRICE_SCALE: u32 = 2;

/// Largest accepted price; 15 significant digits survive the float wire format
pub const MAX_PRICE: Decimal = Decimal::from_parts(2_764_472_319, 232_830, 0, false, 2);

/// Field-level validation messages, keyed by the JSON field name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Error set with a single message
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    fn record(&mut self, field: &str, result: Result<(), String>) {
        if let Err(message) = result {
            self.add(field, message);
        }
    }
}

/// Validate product name
pub fn validate_name(name: Option<&str>) -> Result<(), String> {
    let name = name.map(str::trim).unwrap_or_default();

    if name.is_empty() {
        return Err("The Name field is required.".to_string());
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(format!(
            "Name must be at most {} characters long",
            MAX_NAME_LEN
        ));
    }

    Ok(())
}

/// Validate product description
pub fn validate_description(description: Option<&str>) -> Result<(), String> {
    match description {
        Some(text) if text.chars().count() > MAX_DESCRIPTION_LEN => Err(format!(
            "Description must be at most {} characters long",
            MAX_DESCRIPTION_LEN
        )),
        _ => Ok(()),
    }
}

/// Validate product price
pub fn validate_price(price: Option<Decimal>) -> Result<(), String> {
    match price {
        None => Err("The Price field is required.".to_string()),
        Some(price) if price < Decimal::ZERO => {
            Err("Price must not be negative".to_string())
        }
        Some(price) if price > MAX_PRICE => Err(format!("Price must be at most {}", MAX_PRICE)),
        Some(price) if price.normalize().scale() > MAX_PRICE_SCALE => Err(format!(
            "Price must have at most {} decimal places",
            MAX_PRICE_SCALE
        )),
        Some(_) => Ok(()),
    }
}

/// Validate stock quantity
pub fn validate_stock_quantity(quantity: Option<i32>) -> Result<(), String> {
    match quantity {
        None => Err("The StockQuantity field is required.".to_string()),
        Some(quantity) if quantity < 0 => Err("StockQuantity must not be negative".to_string()),
        Some(_) => Ok(()),
    }
}

/// Validate product category
pub fn validate_category(category: Option<&str>) -> Result<(), String> {
    let category = category.map(str::trim).unwrap_or_default();

    if category.is_empty() {
        return Err("The Category field is required.".to_string());
    }

    if category.chars().count() > MAX_CATEGORY_LEN {
        return Err(format!(
            "Category must be at most {} characters long",
            MAX_CATEGORY_LEN
        ));
    }

    Ok(())
}

fn take_field<T: DeserializeOwned>(
    body: &serde_json::Map<String, Value>,
    field: &str,
    label: &str,
    errors: &mut ValidationErrors,
) -> Option<T> {
    match body.get(field) {
        None | Some(Value::Null) => None,
        Some(raw) => match serde_json::from_value(raw.clone()) {
            Ok(value) => Some(value),
            Err(_) => {
                errors.add(field, format!("The value {} is not valid for {}.", raw, label));
                None
            }
        },
    }
}

/// Convert a raw JSON body into a payload, reporting ill-typed fields by name
pub fn parse_payload(body: &Value) -> Result<ProductPayload, ValidationErrors> {
    let Some(body) = body.as_object() else {
        return Err(ValidationErrors::single(
            "$",
            "The request body must be a JSON object.",
        ));
    };

    let mut errors = ValidationErrors::new();
    let payload = ProductPayload {
        id: take_field(body, "id", "Id", &mut errors),
        name: take_field(body, "name", "Name", &mut errors),
        description: take_field(body, "description", "Description", &mut errors),
        price: take_field(body, "price", "Price", &mut errors),
        stock_quantity: take_field(body, "stockQuantity", "StockQuantity", &mut errors),
        category: take_field(body, "category", "Category", &mut errors),
    };

    if errors.is_empty() {
        Ok(payload)
    } else {
        Err(errors)
    }
}

/// Validate a create or update body and extract the editable fields
pub fn validate_product(
    payload: &ProductPayload,
    require_id: bool,
) -> Result<ProductFields, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if require_id && payload.id.is_none() {
        errors.add("id", "The Id field is required.");
    }
    errors.record("name", validate_name(payload.name.as_deref()));
    errors.record(
        "description",
        validate_description(payload.description.as_deref()),
    );
    errors.record("price", validate_price(payload.price));
    errors.record(
        "stockQuantity",
        validate_stock_quantity(payload.stock_quantity),
    );
    errors.record("category", validate_category(payload.category.as_deref()));

    match (
        errors.is_empty(),
        &payload.name,
        payload.price,
        payload.stock_quantity,
        &payload.category,
    ) {
        (true, Some(name), Some(price), Some(stock_quantity), Some(category)) => {
            Ok(ProductFields {
                name: name.clone(),
                description: payload.description.clone(),
                price,
                stock_quantity,
                category: category.clone(),
            })
        }
        _ => Err(errors),
    }
}
