use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const PRODUCTS_TABLE: &str = "products";
pub const PRODUCT_COLUMNS: &[&str] = &["id", "name", "description", "color"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub color: String,
}

/// One row of a paged listing: the product plus the filtered total.
#[derive(Debug, Clone, FromRow)]
pub struct ProductListRow {
    #[sqlx(flatten)]
    pub product: Product,
    pub total_count: i64,
}
