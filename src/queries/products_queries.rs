use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::Result,
    models::{NewProduct, Product, ProductChanges},
};

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(product)
}

pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE slug = $1")
        .bind(slug)
        .fetch_optional(pool)
        .await?;

    Ok(product)
}

pub async fn get_all(pool: &PgPool) -> Result<Vec<Product>> {
    let products =
        sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY created_at DESC, id DESC")
            .fetch_all(pool)
            .await?;

    Ok(products)
}

pub async fn create_product(pool: &PgPool, product: &NewProduct) -> Result<Product> {
    let product = sqlx::query_as::<_, Product>(
        "INSERT INTO products
            (name, slug, image, brand, quantity, category_id, description, price, count_in_stock)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING *",
    )
    .bind(product.name())
    .bind(product.slug())
    .bind(&product.image)
    .bind(&product.brand)
    .bind(product.quantity)
    .bind(product.category_id)
    .bind(&product.description)
    .bind(product.price)
    .bind(product.count_in_stock)
    .fetch_one(pool)
    .await?;

    Ok(product)
}

/// Update only the columns present in `changes`; `rating`, `num_reviews` and
/// `reviews` are never written here.
pub async fn update_product(
    pool: &PgPool,
    id: i32,
    changes: &ProductChanges,
) -> Result<Option<Product>> {
    if changes.is_empty() {
        return find_by_id(pool, id).await;
    }

    let mut query_builder = QueryBuilder::<Postgres>::new("UPDATE products SET updated_at = NOW()");

    if let Some(name) = changes.name() {
        query_builder.push(", name = ");
        query_builder.push_bind(name);
    }

    if let Some(slug) = changes.slug() {
        query_builder.push(", slug = ");
        query_builder.push_bind(slug);
    }

    if let Some(ref image) = changes.image {
        query_builder.push(", image = ");
        query_builder.push_bind(image);
    }

    if let Some(ref brand) = changes.brand {
        query_builder.push(", brand = ");
        query_builder.push_bind(brand);
    }

    if let Some(quantity) = changes.quantity {
        query_builder.push(", quantity = ");
        query_builder.push_bind(quantity);
    }

    if let Some(category_id) = changes.category_id {
        query_builder.push(", category_id = ");
        query_builder.push_bind(category_id);
    }

    if let Some(ref description) = changes.description {
        query_builder.push(", description = ");
        query_builder.push_bind(description);
    }

    if let Some(price) = changes.price {
        query_builder.push(", price = ");
        query_builder.push_bind(price);
    }

    if let Some(count_in_stock) = changes.count_in_stock {
        query_builder.push(", count_in_stock = ");
        query_builder.push_bind(count_in_stock);
    }

    query_builder.push(" WHERE id = ");
    query_builder.push_bind(id);
    query_builder.push(" RETURNING *");

    let product = query_builder
        .build_query_as::<Product>()
        .fetch_optional(pool)
        .await?;

    Ok(product)
}
