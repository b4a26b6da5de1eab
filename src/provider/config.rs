// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Explorer endpoint configuration

use std::time::Duration;

use url::Url;

use crate::config::constants::explorer::BASESCAN_API_URL;

/// Configuration for [`ExplorerClient`](super::ExplorerClient)
///
/// # Example
///
/// ```rust
/// use commonscan::provider::ExplorerConfig;
/// use std::time::Duration;
///
/// let config = ExplorerConfig::basescan("my-key")
///     .unwrap()
///     .with_http_timeout(Duration::from_secs(15));
/// assert_eq!(config.base_url.as_str(), "https://api.basescan.org/api");
/// ```
#[derive(Clone)]
pub struct ExplorerConfig {
    /// API endpoint, e.g. `https://api.basescan.org/api`
    pub base_url: Url,
    /// API key sent as the `apikey` query parameter
    pub api_key: String,
    /// Timeout applied by the HTTP client itself (None for no client timeout)
    ///
    /// The engine-level per-call timeout is imposed by
    /// [`TimeoutLayer`](crate::transport::TimeoutLayer).
    pub http_timeout: Option<Duration>,
}

impl ExplorerConfig {
    /// Create a configuration for an arbitrary Etherscan-family endpoint
    #[must_use]
    pub fn new(base_url: Url, api_key: impl Into<String>) -> Self {
        Self {
            base_url,
            api_key: api_key.into(),
            http_timeout: None,
        }
    }

    /// Configuration preset for BaseScan
    pub fn basescan(api_key: impl Into<String>) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(BASESCAN_API_URL)?, api_key))
    }

    /// Set the HTTP client timeout
    #[must_use]
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = Some(timeout);
        self
    }
}

// Keep the API key out of logs
impl std::fmt::Debug for ExplorerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExplorerConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}
