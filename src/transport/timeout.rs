// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Per-call timeout layer for chain data providers.
//!
//! Every provider call is bounded; expiry is reported as
//! [`ProviderError::Timeout`] and handled like any other provider failure.

use std::time::Duration;

use alloy_primitives::BlockNumber;
use async_trait::async_trait;
use tower::Layer;
use tracing::warn;

use crate::errors::ProviderError;
use crate::provider::{ChainDataProvider, ExplorerEnvelope, RawTransfer, TokenInfo};
use crate::types::address::NormalizedAddress;

/// A Tower layer that bounds the duration of each provider call.
///
/// # Example
///
/// ```rust
/// use commonscan::transport::TimeoutLayer;
/// use std::time::Duration;
///
/// let layer = TimeoutLayer::new(Duration::from_secs(30));
/// assert_eq!(layer.timeout(), Duration::from_secs(30));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct TimeoutLayer {
    timeout: Duration,
}

impl TimeoutLayer {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl<P> Layer<P> for TimeoutLayer {
    type Service = TimeoutProvider<P>;

    fn layer(&self, inner: P) -> Self::Service {
        TimeoutProvider {
            inner,
            timeout: self.timeout,
        }
    }
}

/// A provider whose calls fail with [`ProviderError::Timeout`] once the limit elapses.
#[derive(Clone, Debug)]
pub struct TimeoutProvider<P> {
    inner: P,
    timeout: Duration,
}

impl<P> TimeoutProvider<P> {
    pub fn inner(&self) -> &P {
        &self.inner
    }

    async fn bounded<T, F>(&self, operation: &str, call: F) -> Result<T, ProviderError>
    where
        F: std::future::Future<Output = Result<T, ProviderError>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(operation, timeout_ms = self.timeout.as_millis() as u64, "Provider call timed out");
                Err(ProviderError::timeout(operation, self.timeout))
            }
        }
    }
}

#[async_trait]
impl<P: ChainDataProvider> ChainDataProvider for TimeoutProvider<P> {
    async fn get_token_transfers(
        &self,
        contract: &NormalizedAddress,
        start_block: BlockNumber,
        end_block: BlockNumber,
    ) -> Result<ExplorerEnvelope<Vec<RawTransfer>>, ProviderError> {
        let operation = format!("tokentx {start_block}-{end_block}");
        self.bounded(
            &operation,
            self.inner.get_token_transfers(contract, start_block, end_block),
        )
        .await
    }

    async fn get_code(&self, address: &NormalizedAddress) -> Result<String, ProviderError> {
        self.bounded("eth_getCode", self.inner.get_code(address)).await
    }

    async fn get_token_symbol(
        &self,
        contract: &NormalizedAddress,
    ) -> Result<ExplorerEnvelope<Option<TokenInfo>>, ProviderError> {
        self.bounded("tokeninfo", self.inner.get_token_symbol(contract))
            .await
    }
}
