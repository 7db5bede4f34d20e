use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use super::validation::{optional_text, required, required_text, slug_for};
use crate::error::{AppError, Result};

/// Review embedded in its product's `reviews` column.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub name: String,
    pub rating: f64,
    pub comment: String,
    pub user: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// `rating` and `num_reviews` are aggregates over `reviews` owned by the
// review workflow; nothing in this crate writes them.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub image: String,
    pub brand: String,
    pub quantity: i32,
    #[serde(rename = "category")]
    pub category_id: i32,
    pub description: String,
    pub reviews: Json<Vec<Review>>,
    pub rating: f64,
    pub num_reviews: i32,
    pub price: Decimal,
    pub count_in_stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: Option<String>,
    pub image: Option<String>,
    pub brand: Option<String>,
    pub quantity: Option<i32>,
    pub category: Option<i32>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub count_in_stock: Option<i32>,
}

/// A validated product ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    name: String,
    slug: String,
    pub image: String,
    pub brand: String,
    pub quantity: i32,
    pub category_id: i32,
    pub description: String,
    pub price: Decimal,
    pub count_in_stock: i32,
}

impl NewProduct {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }
}

impl TryFrom<ProductRequest> for NewProduct {
    type Error = AppError;

    fn try_from(req: ProductRequest) -> Result<Self> {
        let name = required_text("name", req.name)?;
        let slug = slug_for(&name)?;

        Ok(Self {
            slug,
            name,
            image: required_text("image", req.image)?,
            brand: required_text("brand", req.brand)?,
            quantity: non_negative("quantity", required("quantity", req.quantity)?)?,
            category_id: required("category", req.category)?,
            description: required_text("description", req.description)?,
            price: price(req.price.unwrap_or_default())?,
            count_in_stock: non_negative("countInStock", req.count_in_stock.unwrap_or(0))?,
        })
    }
}

/// Columns an update actually rewrites.
///
/// `slug` is only set when `name` differs from the stored one.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProductChanges {
    name: Option<String>,
    slug: Option<String>,
    pub image: Option<String>,
    pub brand: Option<String>,
    pub quantity: Option<i32>,
    pub category_id: Option<i32>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub count_in_stock: Option<i32>,
}

impl ProductChanges {
    pub fn between(current: &Product, req: ProductRequest) -> Result<Self> {
        let name = optional_text("name", req.name)?.filter(|name| *name != current.name);
        let slug = name.as_deref().map(slug_for).transpose()?;

        Ok(Self {
            name,
            slug,
            image: optional_text("image", req.image)?,
            brand: optional_text("brand", req.brand)?,
            quantity: req
                .quantity
                .map(|q| non_negative("quantity", q))
                .transpose()?,
            category_id: req.category,
            description: optional_text("description", req.description)?,
            price: req.price.map(price).transpose()?,
            count_in_stock: req
                .count_in_stock
                .map(|c| non_negative("countInStock", c))
                .transpose()?,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn non_negative(field: &str, value: i32) -> Result<i32> {
    if value < 0 {
        return Err(AppError::BadRequest(format!("{} cannot be negative", field)));
    }
    Ok(value)
}

fn price(value: Decimal) -> Result<Decimal> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(AppError::BadRequest("price cannot be negative".to_string()));
    }
    Ok(value)
}
