// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tower-based rate limiting layer for chain data providers.
//!
//! This module implements a token bucket rate limiter as a Tower `Layer`
//! that wraps any [`ChainDataProvider`].

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use alloy_primitives::BlockNumber;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tower::Layer;
use tracing::trace;

use crate::errors::ProviderError;
use crate::provider::{ChainDataProvider, ExplorerEnvelope, RawTransfer, TokenInfo};
use crate::types::address::NormalizedAddress;

/// A Tower layer that applies rate limiting to provider calls.
///
/// This layer uses a token bucket algorithm to limit the rate of requests.
/// Tokens are replenished at a fixed rate, and each call consumes one token.
/// If no tokens are available, the call waits until a token becomes available.
///
/// Clones share one bucket, so every provider wrapped by the same layer
/// draws from the same budget.
///
/// # Example
///
/// ```rust
/// use commonscan::transport::RateLimitLayer;
/// use std::time::Duration;
///
/// // Free explorer tier: 5 requests per second
/// let layer = RateLimitLayer::per_second(5);
///
/// // At least 250ms between requests, no bursts
/// let layer = RateLimitLayer::with_min_delay(Duration::from_millis(250));
/// ```
#[derive(Clone, Debug)]
pub struct RateLimitLayer {
    state: Arc<Mutex<RateLimitState>>,
}

impl RateLimitLayer {
    /// Creates a new rate limit layer allowing `requests` calls per `period`.
    pub fn new(requests: u32, period: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(RateLimitState::new(requests, period))),
        }
    }

    /// Creates a rate limit layer from requests per second.
    pub fn per_second(requests: u32) -> Self {
        Self::new(requests, Duration::from_secs(1))
    }

    /// Creates a rate limit layer with a minimum delay between requests.
    pub fn with_min_delay(delay: Duration) -> Self {
        Self::new(1, delay)
    }
}

impl<P> Layer<P> for RateLimitLayer {
    type Service = RateLimitedProvider<P>;

    fn layer(&self, inner: P) -> Self::Service {
        RateLimitedProvider {
            inner,
            state: self.state.clone(),
        }
    }
}

/// Internal state for the token bucket rate limiter.
#[derive(Debug)]
struct RateLimitState {
    /// Maximum number of tokens (requests) available
    capacity: u32,
    /// Current number of available tokens
    tokens: f64,
    /// Token replenishment rate (tokens per nanosecond)
    refill_rate: f64,
    /// Last time tokens were refilled
    last_refill: Instant,
}

impl RateLimitState {
    fn new(requests: u32, period: Duration) -> Self {
        let requests = requests.max(1);
        let period_nanos = period.as_nanos().max(1) as f64;
        Self {
            capacity: requests,
            tokens: requests as f64,
            refill_rate: requests as f64 / period_nanos,
            last_refill: Instant::now(),
        }
    }

    /// Try to acquire a token, returning the wait time if not available.
    fn try_acquire(&mut self) -> Option<Duration> {
        self.refill();

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            None
        } else {
            let needed = 1.0 - self.tokens;
            let wait_nanos = needed / self.refill_rate;
            Some(Duration::from_nanos(wait_nanos as u64))
        }
    }

    /// Refill tokens based on elapsed time.
    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill);
        let new_tokens = elapsed.as_nanos() as f64 * self.refill_rate;

        self.tokens = (self.tokens + new_tokens).min(self.capacity as f64);
        self.last_refill = now;
    }
}

/// A provider whose calls are throttled by a shared token bucket.
#[derive(Clone, Debug)]
pub struct RateLimitedProvider<P> {
    inner: P,
    state: Arc<Mutex<RateLimitState>>,
}

impl<P> RateLimitedProvider<P> {
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Waits until a token is available, then consumes it.
    async fn acquire(&self) {
        loop {
            let wait_time = {
                let mut state = self.state.lock().await;
                state.try_acquire()
            };

            match wait_time {
                None => break,
                Some(duration) => {
                    trace!(wait_ms = duration.as_millis() as u64, "Rate limited, waiting");
                    tokio::time::sleep(duration).await;
                }
            }
        }
    }
}

#[async_trait]
impl<P: ChainDataProvider> ChainDataProvider for RateLimitedProvider<P> {
    async fn get_token_transfers(
        &self,
        contract: &NormalizedAddress,
        start_block: BlockNumber,
        end_block: BlockNumber,
    ) -> Result<ExplorerEnvelope<Vec<RawTransfer>>, ProviderError> {
        self.acquire().await;
        self.inner
            .get_token_transfers(contract, start_block, end_block)
            .await
    }

    async fn get_code(&self, address: &NormalizedAddress) -> Result<String, ProviderError> {
        self.acquire().await;
        self.inner.get_code(address).await
    }

    async fn get_token_symbol(
        &self,
        contract: &NormalizedAddress,
    ) -> Result<ExplorerEnvelope<Option<TokenInfo>>, ProviderError> {
        self.acquire().await;
        self.inner.get_token_symbol(contract).await
    }
}
