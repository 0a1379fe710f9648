//! Stack HTTP client
//!
//! Fetches pages from a deployed application so the deployer can check
//! whether it has finished initialising.
//!
//! # Example
//!
//! ```no_run
//! use stack_client::{PageClient, PageFetcher};
//!
//! #[tokio::main]
//! async fn main() -> stack_client::Result<()> {
//!     let client = PageClient::new();
//!     let body = client.fetch("http://localhost/wp-admin/install.php").await?;
//!     println!("{} bytes", body.len());
//!     Ok(())
//! }
//! ```

pub mod error;

pub use error::{ClientError, Result};

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Something that can GET a URL and return its body as text
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches `url` and returns the full response body
    ///
    /// Transport failures and non-success statuses are both errors.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// reqwest-backed [`PageFetcher`]
#[derive(Debug, Clone)]
pub struct PageClient {
    client: Client,
}

impl PageClient {
    /// Create a client with [`DEFAULT_REQUEST_TIMEOUT`]
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a client whose requests give up after `timeout`
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }

    /// Create a client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for PageClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageFetcher for PageClient {
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ClientError::http_status(status.as_u16(), url));
        }

        Ok(response.text().await?)
    }
}
