//! External collaborators behind trait boundaries.
//!
//! Each service is a synchronous trait with a reqwest-backed production
//! implementation and a mock for tests. Handlers call the blocking
//! clients through `tokio::task::spawn_blocking`; none of this touches
//! the pure scoring core.

pub mod extraction;
pub mod identity;
pub mod mailer;
pub mod reasoning;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Cannot connect to service at {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Service returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Failed to parse service response: {0}")]
    ResponseParsing(String),

    #[error("Request rejected: {0}")]
    Rejected(String),
}

impl ServiceError {
    /// Classify a reqwest failure into connection/timeout/other.
    pub(crate) fn from_reqwest(err: reqwest::Error, base_url: &str, timeout_secs: u64) -> Self {
        if err.is_connect() {
            ServiceError::Connection(base_url.to_string())
        } else if err.is_timeout() {
            ServiceError::Timeout(timeout_secs)
        } else {
            ServiceError::Http {
                status: err.status().map(|s| s.as_u16()).unwrap_or(0),
                body: err.to_string(),
            }
        }
    }
}
