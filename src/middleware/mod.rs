pub mod auth;
pub mod authorization;
pub mod context;
pub mod request_log;
pub mod response;

pub use auth::{authenticate, TokenSource, CORRELATION_ID_HEADER};
pub use authorization::require_admin;
pub use context::context_initiator;
pub use request_log::request_log;
pub use response::{ApiResponse, ApiResult};
