//! Error types for the page client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while fetching a page
///
/// All of these are transient from the prober's point of view: the page is
/// simply not ready yet.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed at the transport level
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Server answered with a non-success status code
    #[error("HTTP error (status {status}) from {url}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// URL that was requested
        url: String,
    },
}

impl ClientError {
    /// Create a status error from status code and URL
    pub fn http_status(status: u16, url: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            url: url.into(),
        }
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::HttpStatus { status, .. } if *status >= 500)
    }
}
