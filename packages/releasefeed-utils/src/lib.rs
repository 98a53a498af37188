pub mod http;
pub mod retry;

// Re-export main utilities
pub use http::{get, http_get, https_get, BoxError, ResponseData};
pub use retry::RetryPolicy;
