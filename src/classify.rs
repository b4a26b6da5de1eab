// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Wallet versus contract classification
//!
//! An address is a contract iff the provider reports non-empty bytecode for it.
//! Lookups are memoized for the lifetime of the classifier (one analysis run),
//! and a batch of candidates is classified with bounded concurrency so the
//! provider's rate limit is respected.
//!
//! Only successful lookups are memoized: a transient failure is retried the
//! next time the address comes up.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use futures::stream::{self, StreamExt};
use tracing::{debug, warn, Instrument};

use crate::config::constants::{explorer::EMPTY_CODE, limits::CLASSIFY_CONCURRENCY};
use crate::errors::ProviderError;
use crate::provider::ChainDataProvider;
use crate::tracing::spans;
use crate::types::address::NormalizedAddress;
use crate::types::wallets::WalletSet;

/// Returns true when `code` is the "no code" sentinel
pub fn is_empty_code(code: &str) -> bool {
    let code = code.trim();
    code.is_empty() || code.eq_ignore_ascii_case(EMPTY_CODE)
}

/// Outcome of classifying a batch of counterparties
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Addresses confirmed to have no deployed code
    pub wallets: WalletSet,
    /// Number of addresses with deployed code
    pub contracts: usize,
    /// Addresses whose lookup failed; never counted as wallets
    pub unclassified: Vec<NormalizedAddress>,
}

/// Classifies addresses as wallets or contracts through a [`ChainDataProvider`]
pub struct AddressClassifier<P: ?Sized> {
    provider: Arc<P>,
    memo: Mutex<HashMap<NormalizedAddress, bool>>,
    concurrency: usize,
    lookups: AtomicUsize,
}

impl<P: ChainDataProvider + ?Sized> AddressClassifier<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            provider,
            memo: Mutex::new(HashMap::new()),
            concurrency: CLASSIFY_CONCURRENCY,
            lookups: AtomicUsize::new(0),
        }
    }

    /// Set the maximum number of concurrent lookups (at least 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Returns whether `address` has deployed bytecode
    ///
    /// Answers from the memo when the address was classified before.
    pub async fn is_contract(&self, address: &NormalizedAddress) -> Result<bool, ProviderError> {
        if let Some(known) = self.remembered(address) {
            return Ok(known);
        }

        self.lookups.fetch_add(1, Ordering::Relaxed);
        let code = self.provider.get_code(address).await?;
        let is_contract = !is_empty_code(&code);

        if let Ok(mut memo) = self.memo.lock() {
            memo.insert(address.clone(), is_contract);
        }
        Ok(is_contract)
    }

    /// Classifies every candidate and keeps the wallets
    ///
    /// `contract` only labels the tracing span. Failed lookups are logged and
    /// reported in [`Classification::unclassified`].
    pub async fn classify_all(
        &self,
        contract: &NormalizedAddress,
        candidates: impl IntoIterator<Item = NormalizedAddress>,
    ) -> Classification {
        let candidates: Vec<_> = candidates.into_iter().collect();
        let span = spans::classify_addresses(contract, candidates.len());

        async move {
            let results: Vec<_> = stream::iter(candidates)
                .map(|address| async move {
                    let result = self.is_contract(&address).await;
                    (address, result)
                })
                .buffer_unordered(self.concurrency)
                .collect()
                .await;

            let mut classification = Classification::default();
            for (address, result) in results {
                match result {
                    Ok(false) => {
                        classification.wallets.insert(address);
                    }
                    Ok(true) => classification.contracts += 1,
                    Err(error) => {
                        warn!(address = %address, error = %error, "Classification failed, not counting address as a wallet");
                        classification.unclassified.push(address);
                    }
                }
            }
            classification.unclassified.sort();

            debug!(
                wallets = classification.wallets.len(),
                contracts = classification.contracts,
                unclassified = classification.unclassified.len(),
                "Classified counterparties"
            );
            classification
        }
        .instrument(span)
        .await
    }

    /// Number of provider lookups issued so far (memo hits excluded)
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }

    /// Number of memoized classifications
    pub fn cached(&self) -> usize {
        self.memo.lock().map(|memo| memo.len()).unwrap_or_default()
    }

    fn remembered(&self, address: &NormalizedAddress) -> Option<bool> {
        self.memo.lock().ok()?.get(address).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{ExplorerEnvelope, RawTransfer, TokenInfo};
    use alloy_primitives::BlockNumber;
    use async_trait::async_trait;
    use std::collections::HashSet;

    struct CodeProvider {
        contracts: HashSet<&'static str>,
        failing: HashSet<&'static str>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ChainDataProvider for CodeProvider {
        async fn get_token_transfers(
            &self,
            _contract: &NormalizedAddress,
            _start_block: BlockNumber,
            _end_block: BlockNumber,
        ) -> Result<ExplorerEnvelope<Vec<RawTransfer>>, ProviderError> {
            Ok(ExplorerEnvelope::ok(Vec::new()))
        }

        async fn get_code(&self, address: &NormalizedAddress) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.contains(address.as_str()) {
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
            _contract: &NormalizedAddress,
        ) -> Result<ExplorerEnvelope<Option<TokenInfo>>, ProviderError> {
            Ok(ExplorerEnvelope::ok(None))
        }
    }

    fn provider(contracts: &[&'static str], failing: &[&'static str]) -> Arc<CodeProvider> {
        Arc::new(CodeProvider {
            contracts: contracts.iter().copied().collect(),
            failing: failing.iter().copied().collect(),
            calls: AtomicUsize::new(0),
        })
    }

    #[test]
    fn test_empty_code_sentinel() {
        assert!(is_empty_code("0x"));
        assert!(is_empty_code(" 0X "));
        assert!(is_empty_code(""));
        assert!(!is_empty_code("0x00"));
        assert!(!is_empty_code("0x6080"));
    }

    #[tokio::test]
    async fn test_is_contract() {
        let classifier = AddressClassifier::new(provider(&["0xc0"], &[]));

        assert!(classifier.is_contract(&NormalizedAddress::new("0xC0")).await.unwrap());
        assert!(!classifier.is_contract(&NormalizedAddress::new("0xw1")).await.unwrap());
    }

    #[tokio::test]
    async fn test_repeated_lookups_are_memoized() {
        let provider = provider(&["0xc0"], &[]);
        let classifier = AddressClassifier::new(provider.clone());
        let address = NormalizedAddress::new("0xc0");

        for _ in 0..3 {
            classifier.is_contract(&address).await.unwrap();
        }

        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert_eq!(classifier.lookups(), 1);
        assert_eq!(classifier.cached(), 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_memoized() {
        let provider = provider(&[], &["0xbad"]);
        let classifier = AddressClassifier::new(provider.clone());
        let address = NormalizedAddress::new("0xbad");

        assert!(classifier.is_contract(&address).await.is_err());
        assert!(classifier.is_contract(&address).await.is_err());

        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
        assert_eq!(classifier.cached(), 0);
    }

    #[tokio::test]
    async fn test_classify_all_keeps_only_wallets() {
        let classifier =
            AddressClassifier::new(provider(&["0xc0"], &["0xbad"])).with_concurrency(2);

        let classification = classifier
            .classify_all(
                &NormalizedAddress::new("0xtoken"),
                ["0xw1", "0xc0", "0xbad", "0xw2"].map(NormalizedAddress::from),
            )
            .await;

        let wallets: Vec<_> = classification.wallets.iter().map(|a| a.as_str()).collect();
        assert_eq!(wallets, vec!["0xw1", "0xw2"]);
        assert_eq!(classification.contracts, 1);
        assert_eq!(classification.unclassified, vec![NormalizedAddress::new("0xbad")]);
    }
}
