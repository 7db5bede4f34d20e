use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{required_text, slug_for};
use crate::error::{AppError, Result};

pub const CATEGORY_NAME_MAX_LEN: usize = 32;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
}

/// A validated category ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    name: String,
    slug: String,
}

impl NewCategory {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }
}

impl TryFrom<CreateCategoryRequest> for NewCategory {
    type Error = AppError;

    fn try_from(req: CreateCategoryRequest) -> Result<Self> {
        let name = category_name(req.name)?;
        let slug = slug_for(&name)?;

        Ok(Self { name, slug })
    }
}

/// Columns an update actually rewrites.
///
/// `slug` is only set when `name` differs from the stored one.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CategoryChanges {
    name: Option<String>,
    slug: Option<String>,
}

impl CategoryChanges {
    pub fn between(current: &Category, req: UpdateCategoryRequest) -> Result<Self> {
        let Some(name) = req.name else {
            return Ok(Self::default());
        };

        let name = category_name(Some(name))?;
        if name == current.name {
            return Ok(Self::default());
        }

        let slug = slug_for(&name)?;

        Ok(Self {
            name: Some(name),
            slug: Some(slug),
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
    }
}

fn category_name(name: Option<String>) -> Result<String> {
    let name = required_text("name", name)?;

    if name.chars().count() > CATEGORY_NAME_MAX_LEN {
        return Err(AppError::BadRequest(format!(
            "name must be at most {} characters",
            CATEGORY_NAME_MAX_LEN
        )));
    }

    Ok(name)
}
