pub mod items;

pub use items::ItemsResponse;
