//! HTTP API: router, middleware, endpoints and the serving loop.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::build_router;
pub use types::{ApiContext, UserContext};
