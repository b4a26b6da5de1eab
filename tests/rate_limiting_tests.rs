// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for rate limiting and the provider middleware stack
//!
//! These tests validate that rate limiting configuration is applied through
//! the public API and that the layers compose over any provider.

mod helpers;

use std::sync::Arc;
use std::time::{Duration, Instant};

use alloy_chains::NamedChain;
use commonscan::provider::ChainDataProvider;
use commonscan::transport::{LoggingLayer, RateLimitLayer, TimeoutLayer};
use commonscan::{ChainConfig, CommonscanConfig, CommonscanConfigBuilder, NormalizedAddress};
use helpers::{address, transfer, MockChainProvider};
use tower::ServiceBuilder;

/// Test that default configuration stays within the free explorer tier
#[test]
fn test_default_config_has_free_tier_limit() {
    let config = CommonscanConfig::default();
    assert_eq!(config.rate_limit_per_second, Some(5), "free tier allows 5 calls per second");
}

/// Test that minimal configuration (for paid tiers) has no rate limit
#[test]
fn test_minimal_config_no_limits() {
    let config = CommonscanConfig::minimal();
    assert_eq!(config.rate_limit_per_second, None);
}

/// Test that the builder can remove and set the rate limit
#[test]
fn test_builder_rate_limit() {
    let config = CommonscanConfigBuilder::with_defaults().no_rate_limit().build();
    assert_eq!(config.rate_limit_per_second, None);

    let config = CommonscanConfigBuilder::new().rate_limit_per_second(2).build();
    assert_eq!(config.rate_limit_per_second, Some(2));
}

/// Test that chain overrides only apply to their chain
#[test]
fn test_chain_override_timeout() {
    let config = CommonscanConfigBuilder::new()
        .rpc_timeout(Duration::from_secs(30))
        .chain_config(
            NamedChain::Arbitrum,
            ChainConfig {
                rpc_timeout: Some(Duration::from_secs(5)),
                ..Default::default()
            },
        )
        .build();
    assert_eq!(config.get_rpc_timeout(), Duration::from_secs(30));

    let config = CommonscanConfigBuilder::new()
        .chain(NamedChain::Arbitrum)
        .rpc_timeout(Duration::from_secs(30))
        .chain_config(
            NamedChain::Arbitrum,
            ChainConfig {
                rpc_timeout: Some(Duration::from_secs(5)),
                ..Default::default()
            },
        )
        .build();
    assert_eq!(config.get_rpc_timeout(), Duration::from_secs(5));
}

/// Test that the full stack passes calls and replies through unchanged
#[tokio::test]
async fn test_layer_stack_passes_through() {
    let token = address(1);
    let mock = Arc::new(MockChainProvider::new().with_transfers(&token, vec![transfer("0xA", "0xB", 3)]));

    let provider = ServiceBuilder::new()
        .layer(LoggingLayer::new())
        .layer(RateLimitLayer::per_second(100))
        .layer(TimeoutLayer::new(Duration::from_secs(5)))
        .service(mock.clone());

    let envelope = provider
        .get_token_transfers(&NormalizedAddress::new(&token), 0, 10)
        .await
        .unwrap();
    assert!(envelope.is_ok());
    assert_eq!(envelope.result.len(), 1);

    let code = provider.get_code(&NormalizedAddress::new("0xA")).await.unwrap();
    assert_eq!(code, "0x");
    assert_eq!(mock.transfer_calls(), 1);
    assert_eq!(mock.code_calls(), 1);
}

/// Test that the stack enforces the configured rate
#[tokio::test]
async fn test_layer_stack_enforces_rate() {
    let mock = Arc::new(MockChainProvider::new());
    let provider = ServiceBuilder::new()
        .layer(RateLimitLayer::per_second(2))
        .layer(TimeoutLayer::new(Duration::from_secs(5)))
        .service(mock.clone());
    let address = NormalizedAddress::new("0xA");

    let start = Instant::now();
    for _ in 0..4 {
        provider.get_code(&address).await.unwrap();
    }

    // Two calls ride the initial burst, the other two wait ~500 ms each
    assert!(start.elapsed() >= Duration::from_millis(900));
    assert_eq!(mock.code_calls(), 4);
}
