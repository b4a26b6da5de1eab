// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for commonscan integration tests
//!
//! Provides a scripted [`ChainDataProvider`] so sessions can be exercised
//! without a block explorer.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use alloy_primitives::BlockNumber;
use async_trait::async_trait;
use chrono::{TimeDelta, TimeZone, Utc};
use commonscan::analysis::{AnalysisSession, ContractAnalyzer};
use commonscan::errors::ProviderError;
use commonscan::provider::{ChainDataProvider, ExplorerEnvelope, RawTransfer, TokenInfo};
use commonscan::{CommonscanConfig, CommonscanConfigBuilder, NormalizedAddress};

/// Scripted provider for session tests
///
/// Every transfer query for a contract answers with all of its canned
/// transfers, whatever block range was asked for, so tests also cover the
/// fetcher's re-filtering.
///
/// # Example
///
/// ```rust,ignore
/// let provider = MockChainProvider::new()
///     .with_transfers(TOKEN_A, vec![transfer(WALLET_1, TOKEN_A, 10)])
///     .with_contract(TOKEN_A)
///     .with_symbol(TOKEN_A, "AAA");
/// ```
#[derive(Default)]
pub struct MockChainProvider {
    transfers: HashMap<String, Vec<RawTransfer>>,
    transfer_status_failures: HashMap<String, String>,
    transfer_transport_failures: HashSet<String>,
    contracts: HashSet<String>,
    code_failures: HashSet<String>,
    symbols: HashMap<String, String>,
    transfer_calls: AtomicUsize,
    code_calls: AtomicUsize,
    symbol_calls: AtomicUsize,
    code_lookups: Mutex<Vec<String>>,
}

fn key(address: &str) -> String {
    address.trim().to_ascii_lowercase()
}

impl MockChainProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transfers(mut self, contract: &str, transfers: Vec<RawTransfer>) -> Self {
        self.transfers.entry(key(contract)).or_default().extend(transfers);
        self
    }

    /// Transfer queries for `contract` answer with status "0" and `message`
    pub fn with_transfer_status_failure(mut self, contract: &str, message: &str) -> Self {
        self.transfer_status_failures
            .insert(key(contract), message.to_string());
        self
    }

    /// Transfer queries for `contract` fail before any reply
    pub fn with_transfer_transport_failure(mut self, contract: &str) -> Self {
        self.transfer_transport_failures.insert(key(contract));
        self
    }

    /// `address` has deployed code
    pub fn with_contract(mut self, address: &str) -> Self {
        self.contracts.insert(key(address));
        self
    }

    /// Code lookups for `address` fail
    pub fn with_code_failure(mut self, address: &str) -> Self {
        self.code_failures.insert(key(address));
        self
    }

    pub fn with_symbol(mut self, contract: &str, symbol: &str) -> Self {
        self.symbols.insert(key(contract), symbol.to_string());
        self
    }

    pub fn transfer_calls(&self) -> usize {
        self.transfer_calls.load(Ordering::SeqCst)
    }

    pub fn code_calls(&self) -> usize {
        self.code_calls.load(Ordering::SeqCst)
    }

    pub fn symbol_calls(&self) -> usize {
        self.symbol_calls.load(Ordering::SeqCst)
    }

    /// Number of code lookups made for `address`
    pub fn code_lookups_for(&self, address: &str) -> usize {
        let address = key(address);
        self.code_lookups
            .lock()
            .unwrap()
            .iter()
            .filter(|a| **a == address)
            .count()
    }
}

#[async_trait]
impl ChainDataProvider for MockChainProvider {
    async fn get_token_transfers(
        &self,
        contract: &NormalizedAddress,
        _start_block: BlockNumber,
        _end_block: BlockNumber,
    ) -> Result<ExplorerEnvelope<Vec<RawTransfer>>, ProviderError> {
        self.transfer_calls.fetch_add(1, Ordering::SeqCst);

        if self.transfer_transport_failures.contains(contract.as_str()) {
            return Err(ProviderError::malformed("tokentx", "connection reset"));
        }
        if let Some(message) = self.transfer_status_failures.get(contract.as_str()) {
            return Ok(ExplorerEnvelope::failed("0", message.clone()));
        }
        Ok(ExplorerEnvelope::ok(
            self.transfers
                .get(contract.as_str())
                .cloned()
                .unwrap_or_default(),
        ))
    }

    async fn get_code(&self, address: &NormalizedAddress) -> Result<String, ProviderError> {
        self.code_calls.fetch_add(1, Ordering::SeqCst);
        self.code_lookups
            .lock()
            .unwrap()
            .push(address.as_str().to_string());

        if self.code_failures.contains(address.as_str()) {
            return Err(ProviderError::status("eth_getCode", "Max rate limit reached"));
        }
        if self.contracts.contains(address.as_str()) {
            Ok("0x6080604052".to_string())
        } else {
            Ok("0x".to_string())
        }
    }

    async fn get_token_symbol(
        &self,
        contract: &NormalizedAddress,
    ) -> Result<ExplorerEnvelope<Option<TokenInfo>>, ProviderError> {
        self.symbol_calls.fetch_add(1, Ordering::SeqCst);
        match self.symbols.get(contract.as_str()) {
            Some(symbol) => Ok(ExplorerEnvelope::ok(Some(TokenInfo {
                token_symbol: symbol.clone(),
            }))),
            None => Ok(ExplorerEnvelope::failed("0", "NOTOK")),
        }
    }
}

/// 20-byte hex address whose last byte is `n`
pub fn address(n: u8) -> String {
    format!("0x{:040x}", n)
}

/// Unix timestamp of Base block `block` (2 s blocks from 2023-06-15 00:35:47 UTC)
pub fn block_timestamp(block: u64) -> i64 {
    1_686_789_347 + 2 * block as i64
}

/// `YYYY-MM-DD HH:MM:SS` instant at which Base produced `block`
pub fn at_block(block: u64) -> String {
    let genesis = Utc.with_ymd_and_hms(2023, 6, 15, 0, 35, 47).unwrap();
    (genesis + TimeDelta::seconds(2 * block as i64))
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// One-token transfer at `block`
pub fn transfer(from: &str, to: &str, block: u64) -> RawTransfer {
    RawTransfer {
        from: from.to_string(),
        to: to.to_string(),
        block_number: block.to_string(),
        time_stamp: block_timestamp(block).to_string(),
        value: "1000000000000000000".to_string(),
    }
}

/// Base defaults without rate limiting
pub fn test_config() -> CommonscanConfig {
    CommonscanConfig::minimal()
}

pub fn config_with(f: impl FnOnce(CommonscanConfigBuilder) -> CommonscanConfigBuilder) -> CommonscanConfig {
    f(CommonscanConfigBuilder::new()).build()
}

pub fn session(provider: Arc<MockChainProvider>, config: CommonscanConfig) -> AnalysisSession<MockChainProvider> {
    AnalysisSession::new(Arc::new(ContractAnalyzer::new(provider, config)))
}

/// Registers `contract` with a window covering blocks `start..=end`
pub async fn register_with_window(
    session: &mut AnalysisSession<MockChainProvider>,
    contract: &str,
    start: u64,
    end: u64,
) -> usize {
    let index = session.register(contract).await.unwrap();
    session.set_window_start(index, &at_block(start)).unwrap();
    session.set_window_end(index, &at_block(end)).unwrap();
    index
}
