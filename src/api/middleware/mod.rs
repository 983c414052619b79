//! API middleware components

pub mod auth;
pub mod headers;
pub mod logging;

pub use auth::RequireApiKey;
pub use headers::response_headers_middleware;
pub use logging::logging_middleware;
