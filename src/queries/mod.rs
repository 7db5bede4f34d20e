pub mod category_queries;
pub mod products_queries;
