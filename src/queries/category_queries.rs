use sqlx::PgPool;

use crate::{
    error::Result,
    models::{Category, CategoryChanges, NewCategory},
};

/// Find category by ID
pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Category>> {
    let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(category)
}

/// Find category by slug
pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Category>> {
    let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE slug = $1")
        .bind(slug)
        .fetch_optional(pool)
        .await?;

    Ok(category)
}

/// Get all categories
pub async fn get_all(pool: &PgPool) -> Result<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name ASC")
        .fetch_all(pool)
        .await?;

    Ok(categories)
}

/// Create a new category
pub async fn create_category(pool: &PgPool, category: &NewCategory) -> Result<Category> {
    let category = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (name, slug)
         VALUES ($1, $2)
         RETURNING *",
    )
    .bind(category.name())
    .bind(category.slug())
    .fetch_one(pool)
    .await?;

    Ok(category)
}

/// Apply a rename; the slug travels with the name
pub async fn update_category(
    pool: &PgPool,
    id: i32,
    changes: &CategoryChanges,
) -> Result<Option<Category>> {
    let (Some(name), Some(slug)) = (changes.name(), changes.slug()) else {
        return find_by_id(pool, id).await;
    };

    let category = sqlx::query_as::<_, Category>(
        "UPDATE categories SET name = $1, slug = $2, updated_at = NOW()
         WHERE id = $3
         RETURNING *",
    )
    .bind(name)
    .bind(slug)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(category)
}
