pub mod delete;
pub mod dto;
pub mod list;
pub mod lookup;
pub mod save;

pub use delete::delete_product;
pub use list::get_products;
pub use lookup::{get_product, get_products_by_ids, get_products_by_partial_name};
pub use save::save_product;
