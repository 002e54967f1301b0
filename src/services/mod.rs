pub mod product_service;

pub use product_service::{CatalogService, ProductService, ServiceError, PRODUCT_RECORDS_LIMIT};
