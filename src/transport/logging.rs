// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tower-based logging layer for chain data providers.
//!
//! This module implements a logging layer that uses `tracing` to record
//! provider call timing, status and failures for debugging and observability.

use std::time::Instant;

use alloy_primitives::BlockNumber;
use async_trait::async_trait;
use tower::Layer;
use tracing::{debug, trace, warn, Instrument};

use crate::errors::ProviderError;
use crate::provider::{ChainDataProvider, ExplorerEnvelope, RawTransfer, TokenInfo};
use crate::tracing::spans;
use crate::types::address::NormalizedAddress;

/// A Tower layer that adds logging/tracing to provider calls.
///
/// Each call runs inside a `commonscan.provider_call` span and logs its
/// duration. Transport failures and non-success statuses are logged at WARN.
///
/// # Example
///
/// ```rust
/// use commonscan::transport::LoggingLayer;
///
/// let layer = LoggingLayer::new().with_response_logging();
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingLayer {
    /// Whether to log response payloads (can be verbose)
    log_responses: bool,
}

impl LoggingLayer {
    /// Creates a new logging layer with default settings.
    ///
    /// By default, only timing and errors are logged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables logging of response payloads at TRACE level.
    pub fn with_response_logging(mut self) -> Self {
        self.log_responses = true;
        self
    }
}

impl<P> Layer<P> for LoggingLayer {
    type Service = LoggedProvider<P>;

    fn layer(&self, inner: P) -> Self::Service {
        LoggedProvider {
            inner,
            log_responses: self.log_responses,
        }
    }
}

/// A provider that logs every call it forwards.
#[derive(Clone, Debug)]
pub struct LoggedProvider<P> {
    inner: P,
    log_responses: bool,
}

impl<P> LoggedProvider<P> {
    pub fn inner(&self) -> &P {
        &self.inner
    }

    fn record<T: std::fmt::Debug>(
        &self,
        method: &str,
        started: Instant,
        result: &Result<T, ProviderError>,
        status: Option<(&str, &str)>,
    ) {
        let duration_ms = started.elapsed().as_millis() as u64;

        match (result, status) {
            (Err(e), _) => warn!(error = %e, duration_ms, "Provider error: {method}"),
            (Ok(_), Some((status, message))) => {
                warn!(status, message, duration_ms, "Provider non-success status: {method}")
            }
            (Ok(response), None) => {
                if self.log_responses {
                    trace!(response = ?response, duration_ms, "Provider response: {method}");
                } else {
                    debug!(duration_ms, "Provider response: {method}");
                }
            }
        }
    }
}

/// Status and message of a failed envelope, if the call returned one
fn failed_status<T>(result: &Result<ExplorerEnvelope<T>, ProviderError>) -> Option<(&str, &str)> {
    match result {
        Ok(envelope) if !envelope.is_ok() => {
            Some((envelope.status.as_str(), envelope.message.as_str()))
        }
        _ => None,
    }
}

#[async_trait]
impl<P: ChainDataProvider> ChainDataProvider for LoggedProvider<P> {
    async fn get_token_transfers(
        &self,
        contract: &NormalizedAddress,
        start_block: BlockNumber,
        end_block: BlockNumber,
    ) -> Result<ExplorerEnvelope<Vec<RawTransfer>>, ProviderError> {
        let started = Instant::now();
        let result = self
            .inner
            .get_token_transfers(contract, start_block, end_block)
            .instrument(spans::provider_call("tokentx", contract))
            .await;
        self.record("tokentx", started, &result, failed_status(&result));
        result
    }

    async fn get_code(&self, address: &NormalizedAddress) -> Result<String, ProviderError> {
        let started = Instant::now();
        let result = self
            .inner
            .get_code(address)
            .instrument(spans::provider_call("eth_getCode", address))
            .await;
        self.record("eth_getCode", started, &result, None);
        result
    }

    async fn get_token_symbol(
        &self,
        contract: &NormalizedAddress,
    ) -> Result<ExplorerEnvelope<Option<TokenInfo>>, ProviderError> {
        let started = Instant::now();
        let result = self
            .inner
            .get_token_symbol(contract)
            .instrument(spans::provider_call("tokeninfo", contract))
            .await;
        self.record("tokeninfo", started, &result, failed_status(&result));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_layer_default() {
        let layer = LoggingLayer::new();
        assert!(!layer.log_responses);
    }

    #[test]
    fn test_logging_layer_with_response_logging() {
        let layer = LoggingLayer::new().with_response_logging();
        assert!(layer.log_responses);
    }

    #[test]
    fn test_failed_status_only_for_non_success() {
        let ok: Result<ExplorerEnvelope<Vec<u8>>, ProviderError> = Ok(ExplorerEnvelope::ok(vec![]));
        assert_eq!(failed_status(&ok), None);

        let failed: Result<ExplorerEnvelope<Vec<u8>>, ProviderError> =
            Ok(ExplorerEnvelope::failed("0", "NOTOK"));
        assert_eq!(failed_status(&failed), Some(("0", "NOTOK")));

        let err: Result<ExplorerEnvelope<Vec<u8>>, ProviderError> =
            Err(ProviderError::malformed("tokentx", "bad"));
        assert_eq!(failed_status(&err), None);
    }
}
