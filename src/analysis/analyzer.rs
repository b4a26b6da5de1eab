// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Per-registration analysis: fetch transfers, classify counterparties
//!
//! [`ContractAnalyzer`] owns the provider-facing components for a chain and
//! is shared by every session. It never fails: anything that prevents a
//! registration from producing data becomes a degraded
//! [`RegistrationAnalysis`] with a reason.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{info, warn, Instrument};

use crate::analysis::registration::{ContractRegistration, RegistrationAnalysis, RegistrationStatus};
use crate::classify::AddressClassifier;
use crate::config::CommonscanConfig;
use crate::events::TransactionFetcher;
use crate::provider::ChainDataProvider;
use crate::tracing::spans;
use crate::types::address::{abbreviate, NormalizedAddress};

/// Reason recorded for a registration analyzed without both window bounds
pub const WINDOW_NOT_SET: &str = "window not set";

/// Fetches and classifies the data of single registrations
pub struct ContractAnalyzer<P: ?Sized> {
    provider: Arc<P>,
    fetcher: TransactionFetcher<P>,
    config: CommonscanConfig,
}

impl<P: ChainDataProvider + ?Sized> ContractAnalyzer<P> {
    /// Create an analyzer for the configured chain
    ///
    /// The block clock, request span and token decimals come from `config`.
    pub fn new(provider: Arc<P>, config: CommonscanConfig) -> Self {
        let clock = Arc::new(config.get_block_clock().clock());
        let fetcher = TransactionFetcher::new(provider.clone(), clock)
            .with_max_block_range(config.get_max_block_range())
            .with_decimals(config.token_decimals);

        Self {
            provider,
            fetcher,
            config,
        }
    }

    pub fn config(&self) -> &CommonscanConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &TransactionFetcher<P> {
        &self.fetcher
    }

    /// Classifier for one analysis run
    ///
    /// Memoized classifications live as long as the returned value.
    pub fn classifier(&self) -> AddressClassifier<P> {
        AddressClassifier::new(self.provider.clone()).with_concurrency(self.config.classify_concurrency)
    }

    /// Display name for a contract: its token symbol when the provider knows it
    ///
    /// Falls back to `0x1234...abcd` when the provider reports a failure status
    /// or no symbol, and to `Error-Token-<first 8 chars>` when the provider
    /// could not be reached.
    pub async fn display_name(&self, contract: &NormalizedAddress) -> String {
        match self.provider.get_token_symbol(contract).await {
            Ok(envelope) if envelope.is_ok() => match envelope.result {
                Some(info) if !info.token_symbol.trim().is_empty() => info.token_symbol,
                _ => abbreviate(contract.as_str()),
            },
            Ok(envelope) => {
                warn!(contract = %contract, message = %envelope.message, "Token symbol unavailable, using abbreviated address");
                abbreviate(contract.as_str())
            }
            Err(error) => {
                warn!(contract = %contract, error = %error, "Token symbol lookup failed");
                let prefix: String = contract.as_str().chars().take(8).collect();
                format!("Error-Token-{prefix}")
            }
        }
    }

    /// Analyzes one registration
    ///
    /// Fetches its transfers, collects the distinct senders and receivers and
    /// keeps those classified as wallets. `classifier` carries memoized lookups
    /// across the registrations of one run.
    pub async fn analyze(
        &self,
        index: usize,
        registration: &ContractRegistration,
        classifier: &AddressClassifier<P>,
    ) -> RegistrationAnalysis {
        let contract = registration.address();
        self.analyze_inner(registration, classifier)
            .instrument(spans::analyze_registration(index, contract))
            .await
    }

    async fn analyze_inner(
        &self,
        registration: &ContractRegistration,
        classifier: &AddressClassifier<P>,
    ) -> RegistrationAnalysis {
        let contract = registration.address();

        let Some(window) = registration.window() else {
            warn!(contract = %contract, "Registration has no complete window, skipping");
            return RegistrationAnalysis::degraded(WINDOW_NOT_SET);
        };

        let outcome = match self.fetcher.fetch_window(contract, &window).await {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!(contract = %contract, error = %error, "Window cannot be analyzed");
                return RegistrationAnalysis::degraded(error.to_string());
            }
        };

        if let Some(error) = outcome.error {
            return RegistrationAnalysis {
                range: Some(outcome.range),
                ..RegistrationAnalysis::degraded(error.to_string())
            };
        }

        let counterparties: BTreeSet<NormalizedAddress> = outcome
            .transactions
            .iter()
            .flat_map(|tx| [tx.from_address.clone(), tx.to_address.clone()])
            .collect();

        let classification = classifier.classify_all(contract, counterparties).await;

        info!(
            contract = %contract,
            transactions = outcome.transactions.len(),
            wallets = classification.wallets.len(),
            contracts = classification.contracts,
            unclassified = classification.unclassified.len(),
            "Registration analyzed"
        );

        RegistrationAnalysis {
            range: Some(outcome.range),
            transactions: outcome.transactions,
            unique_wallets: classification.wallets,
            unclassified: classification.unclassified.len(),
            status: RegistrationStatus::Analyzed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::TimeWindow;
    use crate::errors::ProviderError;
    use crate::provider::{ExplorerEnvelope, RawTransfer, TokenInfo};
    use alloy_primitives::BlockNumber;
    use async_trait::async_trait;

    enum SymbolReply {
        Symbol(&'static str),
        Status,
        Unreachable,
    }

    struct SymbolProvider(SymbolReply);

    #[async_trait]
    impl ChainDataProvider for SymbolProvider {
        async fn get_token_transfers(
            &self,
            _contract: &NormalizedAddress,
            _start_block: BlockNumber,
            _end_block: BlockNumber,
        ) -> Result<ExplorerEnvelope<Vec<RawTransfer>>, ProviderError> {
            Ok(ExplorerEnvelope::ok(vec![
                RawTransfer {
                    from: "0xW1".to_string(),
                    to: "0xC0".to_string(),
                    block_number: "5".to_string(),
                    time_stamp: "1686789357".to_string(),
                    value: "1".to_string(),
                },
                RawTransfer {
                    from: "0xc0".to_string(),
                    to: "0xw2".to_string(),
                    block_number: "6".to_string(),
                    time_stamp: "1686789359".to_string(),
                    value: "1".to_string(),
                },
            ]))
        }

        async fn get_code(&self, address: &NormalizedAddress) -> Result<String, ProviderError> {
            if address.as_str() == "0xc0" {
                Ok("0x60806040".to_string())
            } else {
                Ok("0x".to_string())
            }
        }

        async fn get_token_symbol(
            &self,
            _contract: &NormalizedAddress,
        ) -> Result<ExplorerEnvelope<Option<TokenInfo>>, ProviderError> {
            match self.0 {
                SymbolReply::Symbol(symbol) => Ok(ExplorerEnvelope::ok(Some(TokenInfo {
                    token_symbol: symbol.to_string(),
                }))),
                SymbolReply::Status => Ok(ExplorerEnvelope::failed("0", "NOTOK")),
                SymbolReply::Unreachable => Err(ProviderError::malformed("tokeninfo", "html body")),
            }
        }
    }

    fn analyzer(reply: SymbolReply) -> ContractAnalyzer<SymbolProvider> {
        ContractAnalyzer::new(Arc::new(SymbolProvider(reply)), CommonscanConfig::minimal())
    }

    const CONTRACT: &str = "0x4ed4e862860bed51a9570b96d89af5e1b0efefed";

    #[tokio::test]
    async fn test_display_name_variants() {
        let contract = NormalizedAddress::new(CONTRACT);

        assert_eq!(analyzer(SymbolReply::Symbol("DEGEN")).display_name(&contract).await, "DEGEN");
        assert_eq!(analyzer(SymbolReply::Status).display_name(&contract).await, "0x4ed4...efed");
        assert_eq!(
            analyzer(SymbolReply::Unreachable).display_name(&contract).await,
            "Error-Token-0x4ed4e8"
        );
    }

    #[tokio::test]
    async fn test_analyze_keeps_only_wallets() {
        let analyzer = analyzer(SymbolReply::Symbol("DEGEN"));
        let mut registration = ContractRegistration::new(NormalizedAddress::new(CONTRACT), "DEGEN");
        let window = TimeWindow::parse("2023-06-15 00:35:47", "2023-06-15 00:36:47").unwrap();
        registration.set_window_start(window.start()).unwrap();
        registration.set_window_end(window.end()).unwrap();

        let analysis = analyzer.analyze(0, &registration, &analyzer.classifier()).await;

        assert_eq!(analysis.status, RegistrationStatus::Analyzed);
        assert_eq!(analysis.transactions.len(), 2);
        let wallets: Vec<_> = analysis.unique_wallets.iter().map(|a| a.as_str()).collect();
        assert_eq!(wallets, vec!["0xw1", "0xw2"]);
    }

    #[tokio::test]
    async fn test_analyze_without_window_is_degraded() {
        let analyzer = analyzer(SymbolReply::Symbol("DEGEN"));
        let registration = ContractRegistration::new(NormalizedAddress::new(CONTRACT), "DEGEN");

        let analysis = analyzer.analyze(0, &registration, &analyzer.classifier()).await;

        assert_eq!(
            analysis.status,
            RegistrationStatus::Degraded {
                reason: WINDOW_NOT_SET.to_string()
            }
        );
    }
}
