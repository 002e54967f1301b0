pub mod manager;
pub mod memory;
pub mod models;
pub mod query_builder;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::InMemoryProductRepository;
pub use models::Product;
pub use repository::{PgProductRepository, ProductRepository};
