// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Configuration for commonscan operations
//!
//! This module provides a flexible configuration system for controlling
//! block-time calibration, provider behavior (rate limiting, timeouts, request
//! span) and session limits (registrations, page size).
//!
//! # Example: Using defaults
//!
//! ```rust
//! use commonscan::CommonscanConfig;
//!
//! // Base calibration, free explorer tier rate limit, 3 addresses per page
//! let config = CommonscanConfig::default();
//! ```
//!
//! # Example: Custom configuration
//!
//! ```rust
//! use commonscan::CommonscanConfigBuilder;
//! use std::time::Duration;
//!
//! let config = CommonscanConfigBuilder::with_defaults()
//!     .max_block_range(2_000)
//!     .rpc_timeout(Duration::from_secs(10))
//!     .page_size(5)
//!     .build();
//! ```

use std::collections::HashMap;
use std::time::Duration;

use alloy_chains::NamedChain;
use chrono::{DateTime, Utc};

use crate::analysis::IntersectionPolicy;
use crate::blocks::LinearBlockClock;
use crate::config_types::{MaxBlockRange, PageSize};
use crate::types::tokens::TokenDecimals;

pub mod constants;

use constants::{limits, timing};

/// Calibration of the linear block clock: block 0 instant and average interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockClockConfig {
    /// Instant of block 0
    pub genesis: DateTime<Utc>,
    /// Average time between blocks
    pub block_interval: Duration,
}

impl BlockClockConfig {
    /// Base mainnet calibration: genesis 2023-06-15T00:35:47Z, 2 second blocks
    pub fn base() -> Self {
        Self {
            genesis: DateTime::from_timestamp(timing::BASE_GENESIS_TIMESTAMP, 0)
                .unwrap_or_default(),
            block_interval: Duration::from_secs(timing::BASE_BLOCK_INTERVAL_SECS),
        }
    }

    /// Builds the clock described by this calibration
    pub fn clock(&self) -> LinearBlockClock {
        LinearBlockClock::new(self.genesis, self.block_interval)
    }
}

/// Configuration for commonscan operations
///
/// Use [`CommonscanConfigBuilder`] for a fluent API to construct instances.
#[derive(Debug, Clone)]
pub struct CommonscanConfig {
    /// Chain being analyzed
    /// Default: Base
    pub chain: NamedChain,

    /// Block clock used when the chain has no override
    /// Default: Base calibration
    pub block_clock: BlockClockConfig,

    /// Maximum number of blocks covered by a single transfer request
    /// Default: 10 000
    pub max_block_range: MaxBlockRange,

    /// Provider request budget (requests per second)
    /// Default: Some(5), the free explorer tier
    pub rate_limit_per_second: Option<u32>,

    /// Timeout for each provider request
    /// Default: 30 seconds
    pub rpc_timeout: Duration,

    /// Decimals used to scale raw transfer values
    /// Default: 18
    pub token_decimals: TokenDecimals,

    /// Addresses per result page
    /// Default: 3
    pub page_size: PageSize,

    /// Maximum registrations per session
    /// Default: 4
    pub max_registrations: usize,

    /// Concurrent address classifications per registration
    /// Default: 4
    pub classify_concurrency: usize,

    /// Idle time after which a session may be evicted
    /// Default: 24 hours
    pub session_ttl: Duration,

    /// How failed registrations take part in the intersection
    /// Default: Strict
    pub intersection_policy: IntersectionPolicy,

    /// Chain-specific overrides
    pub chain_overrides: HashMap<NamedChain, ChainConfig>,
}

/// Chain-specific configuration overrides
#[derive(Debug, Clone, Default)]
pub struct ChainConfig {
    /// Override block clock calibration for this chain
    pub block_clock: Option<BlockClockConfig>,

    /// Override max block range for this chain
    pub max_block_range: Option<MaxBlockRange>,

    /// Override RPC timeout for this chain
    pub rpc_timeout: Option<Duration>,
}

impl Default for CommonscanConfig {
    fn default() -> Self {
        Self::with_common_defaults()
    }
}

impl CommonscanConfig {
    /// Create config with defaults for Base and the free explorer tier
    pub fn with_common_defaults() -> Self {
        let mut config = Self::minimal();
        config.rate_limit_per_second = Some(limits::FREE_TIER_REQUESTS_PER_SECOND);

        config.set_chain_override(
            NamedChain::Base,
            ChainConfig {
                block_clock: Some(BlockClockConfig::base()),
                ..Default::default()
            },
        );

        config
    }

    /// Create minimal config with no rate limiting
    ///
    /// Suitable for tests and paid explorer tiers.
    pub fn minimal() -> Self {
        Self {
            chain: NamedChain::Base,
            block_clock: BlockClockConfig::base(),
            max_block_range: MaxBlockRange::DEFAULT,
            rate_limit_per_second: None,
            rpc_timeout: Duration::from_secs(30),
            token_decimals: TokenDecimals::STANDARD,
            page_size: PageSize::DEFAULT,
            max_registrations: limits::MAX_REGISTRATIONS,
            classify_concurrency: limits::CLASSIFY_CONCURRENCY,
            session_ttl: Duration::from_secs(24 * 60 * 60),
            intersection_policy: IntersectionPolicy::Strict,
            chain_overrides: HashMap::new(),
        }
    }

    /// Effective block clock calibration for the configured chain
    pub fn get_block_clock(&self) -> BlockClockConfig {
        self.chain_overrides
            .get(&self.chain)
            .and_then(|c| c.block_clock)
            .unwrap_or(self.block_clock)
    }

    /// Effective max block range for the configured chain
    pub fn get_max_block_range(&self) -> MaxBlockRange {
        self.chain_overrides
            .get(&self.chain)
            .and_then(|c| c.max_block_range)
            .unwrap_or(self.max_block_range)
    }

    /// Effective RPC timeout for the configured chain
    pub fn get_rpc_timeout(&self) -> Duration {
        self.chain_overrides
            .get(&self.chain)
            .and_then(|c| c.rpc_timeout)
            .unwrap_or(self.rpc_timeout)
    }

    /// Set chain-specific override
    pub fn set_chain_override(&mut self, chain: NamedChain, config: ChainConfig) {
        self.chain_overrides.insert(chain, config);
    }
}

/// Builder for [`CommonscanConfig`]
///
/// # Example
///
/// ```rust
/// use commonscan::{CommonscanConfigBuilder, IntersectionPolicy};
/// use alloy_chains::NamedChain;
///
/// let config = CommonscanConfigBuilder::new()
///     .chain(NamedChain::Base)
///     .max_registrations(2)
///     .intersection_policy(IntersectionPolicy::ExcludeFailed)
///     .build();
/// assert_eq!(config.max_registrations, 2);
/// ```
pub struct CommonscanConfigBuilder {
    config: CommonscanConfig,
}

impl Default for CommonscanConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CommonscanConfigBuilder {
    /// Create a new builder with minimal defaults
    pub fn new() -> Self {
        Self {
            config: CommonscanConfig::minimal(),
        }
    }

    /// Start with common defaults
    pub fn with_defaults() -> Self {
        Self {
            config: CommonscanConfig::with_common_defaults(),
        }
    }

    pub fn chain(mut self, chain: NamedChain) -> Self {
        self.config.chain = chain;
        self
    }

    /// Set the global block clock calibration
    pub fn block_clock(mut self, genesis: DateTime<Utc>, block_interval: Duration) -> Self {
        self.config.block_clock = BlockClockConfig {
            genesis,
            block_interval,
        };
        self
    }

    /// Set the block clock calibration for a specific chain
    pub fn chain_block_clock(
        mut self,
        chain: NamedChain,
        genesis: DateTime<Utc>,
        block_interval: Duration,
    ) -> Self {
        let mut chain_config = self.config.chain_overrides.remove(&chain).unwrap_or_default();
        chain_config.block_clock = Some(BlockClockConfig {
            genesis,
            block_interval,
        });
        self.config.set_chain_override(chain, chain_config);
        self
    }

    pub fn max_block_range(mut self, max: u64) -> Self {
        self.config.max_block_range = MaxBlockRange::new(max);
        self
    }

    pub fn rate_limit_per_second(mut self, requests: u32) -> Self {
        self.config.rate_limit_per_second = Some(requests);
        self
    }

    /// Disable client-side rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit_per_second = None;
        self
    }

    pub fn rpc_timeout(mut self, timeout: Duration) -> Self {
        self.config.rpc_timeout = timeout;
        self
    }

    pub fn token_decimals(mut self, decimals: u8) -> Self {
        self.config.token_decimals = TokenDecimals::new(decimals);
        self
    }

    /// Set addresses per page
    ///
    /// Zero is ignored (the previous page size is kept), since a page must hold
    /// at least one address.
    pub fn page_size(mut self, size: usize) -> Self {
        if let Ok(size) = PageSize::new(size) {
            self.config.page_size = size;
        }
        self
    }

    pub fn max_registrations(mut self, max: usize) -> Self {
        self.config.max_registrations = max;
        self
    }

    /// Set concurrent classifications per registration (at least 1)
    pub fn classify_concurrency(mut self, concurrency: usize) -> Self {
        self.config.classify_concurrency = concurrency.max(1);
        self
    }

    pub fn session_ttl(mut self, ttl: Duration) -> Self {
        self.config.session_ttl = ttl;
        self
    }

    pub fn intersection_policy(mut self, policy: IntersectionPolicy) -> Self {
        self.config.intersection_policy = policy;
        self
    }

    /// Add chain-specific configuration
    pub fn chain_config(mut self, chain: NamedChain, config: ChainConfig) -> Self {
        self.config.set_chain_override(chain, config);
        self
    }

    /// Build the final configuration
    pub fn build(self) -> CommonscanConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_config() {
        let config = CommonscanConfig::default();

        assert_eq!(config.chain, NamedChain::Base);
        assert_eq!(config.rate_limit_per_second, Some(5));
        assert_eq!(config.max_registrations, 4);
        assert_eq!(config.page_size.get(), 3);
        assert_eq!(config.token_decimals, TokenDecimals::STANDARD);
        assert_eq!(config.intersection_policy, IntersectionPolicy::Strict);
        assert_eq!(config.get_block_clock(), BlockClockConfig::base());
    }

    #[test]
    fn test_minimal_config() {
        let config = CommonscanConfig::minimal();

        assert_eq!(config.rate_limit_per_second, None);
        assert_eq!(config.get_max_block_range(), MaxBlockRange::DEFAULT);
        assert_eq!(config.get_rpc_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_base_calibration() {
        let clock = BlockClockConfig::base();
        assert_eq!(
            clock.genesis,
            Utc.with_ymd_and_hms(2023, 6, 15, 0, 35, 47).unwrap()
        );
        assert_eq!(clock.block_interval, Duration::from_secs(2));
    }

    #[test]
    fn test_chain_override_precedence() {
        let genesis = Utc.with_ymd_and_hms(2021, 11, 11, 0, 0, 0).unwrap();
        let config = CommonscanConfigBuilder::new()
            .chain(NamedChain::Optimism)
            .max_block_range(5_000)
            .chain_block_clock(NamedChain::Optimism, genesis, Duration::from_secs(2))
            .chain_config(
                NamedChain::Base,
                ChainConfig {
                    max_block_range: Some(MaxBlockRange::new(100)),
                    ..Default::default()
                },
            )
            .build();

        assert_eq!(config.get_block_clock().genesis, genesis);
        // Base override does not leak into Optimism
        assert_eq!(config.get_max_block_range(), MaxBlockRange::new(5_000));
    }

    #[test]
    fn test_chain_without_override_uses_global_clock() {
        let config = CommonscanConfigBuilder::new()
            .chain(NamedChain::Arbitrum)
            .build();
        assert_eq!(config.get_block_clock(), config.block_clock);
    }

    #[test]
    fn test_builder_ignores_zero_page_size() {
        let config = CommonscanConfigBuilder::new().page_size(0).build();
        assert_eq!(config.page_size, PageSize::DEFAULT);

        let config = CommonscanConfigBuilder::new().page_size(10).build();
        assert_eq!(config.page_size.get(), 10);
    }

    #[test]
    fn test_builder_clamps_concurrency() {
        let config = CommonscanConfigBuilder::new().classify_concurrency(0).build();
        assert_eq!(config.classify_concurrency, 1);
    }
}
