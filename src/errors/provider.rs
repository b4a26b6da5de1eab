// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for chain data provider operations.
//!
//! Every failure to obtain data from the provider (non-success status,
//! transport failure, timeout, undecodable body) is a [`ProviderError`].
//! The engine never aborts a session on these: the affected registration is
//! analyzed as empty and the error is reported back to the caller.

use std::time::Duration;

/// Errors that can occur while talking to the chain data provider.
///
/// # Examples
///
/// ```rust
/// use commonscan::ProviderError;
///
/// let error = ProviderError::status("tokentx", "NOTOK");
/// assert_eq!(error.to_string(), "Provider returned non-success status for tokentx: NOTOK");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider answered, but reported a non-success status.
    ///
    /// Explorer APIs report rate limiting, invalid API keys and empty result
    /// sets this way; `message` carries the provider's own text.
    #[error("Provider returned non-success status for {operation}: {message}")]
    Status {
        /// The operation that was attempted (e.g. "tokentx 100-200")
        operation: String,
        /// The provider's message
        message: String,
    },

    /// The request never produced a usable response.
    #[error("Transport failure during {operation}")]
    Transport {
        /// The operation that was attempted
        operation: String,
        /// The underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The request did not complete within the configured timeout.
    #[error("{operation} timed out after {after:?}")]
    Timeout {
        /// The operation that was attempted
        operation: String,
        /// The timeout that elapsed
        after: Duration,
    },

    /// The provider answered with a body that could not be interpreted.
    #[error("Malformed response for {operation}: {details}")]
    MalformedResponse {
        /// The operation that was attempted
        operation: String,
        /// What was wrong with the body
        details: String,
    },
}

impl ProviderError {
    /// Create a `Status` error carrying the provider's message.
    pub fn status(operation: impl Into<String>, message: impl Into<String>) -> Self {
        ProviderError::Status {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a `Transport` error from any error type.
    pub fn transport(
        operation: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ProviderError::Transport {
            operation: operation.into(),
            source: Box::new(source),
        }
    }

    /// Create a `Timeout` error.
    pub fn timeout(operation: impl Into<String>, after: Duration) -> Self {
        ProviderError::Timeout {
            operation: operation.into(),
            after,
        }
    }

    /// Create a `MalformedResponse` error.
    pub fn malformed(operation: impl Into<String>, details: impl Into<String>) -> Self {
        ProviderError::MalformedResponse {
            operation: operation.into(),
            details: details.into(),
        }
    }

    /// Returns true when the provider itself answered with a failure status.
    pub fn is_status(&self) -> bool {
        matches!(self, ProviderError::Status { .. })
    }
}
