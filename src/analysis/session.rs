// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Analysis sessions: registrations, windows, analysis runs and result pages
//!
//! An [`AnalysisSession`] holds the state of one operator. It exposes the
//! operations a host layer needs:
//!
//! - [`register`](AnalysisSession::register) a contract (at most
//!   `max_registrations`)
//! - [`set_window_start`](AnalysisSession::set_window_start) /
//!   [`set_window_end`](AnalysisSession::set_window_end) for a registration
//! - [`remove`](AnalysisSession::remove) a registration
//! - [`analyze`](AnalysisSession::analyze) every registration and compute the
//!   common wallets
//! - [`page`](AnalysisSession::page) and the navigation helpers
//!
//! Any change to the registrations discards the previous result pages.

use std::str::FromStr;
use std::sync::Arc;

use alloy_primitives::Address;
use tracing::{info, Instrument};

use crate::analysis::analyzer::ContractAnalyzer;
use crate::analysis::progress::{AnalysisEvent, AnalysisObserver, CancellationFlag};
use crate::analysis::registration::{ContractRegistration, RegistrationStatus};
use crate::analysis::resolver::{CommonAddressResolver, CommonAddresses};
use crate::blocks::TimeWindow;
use crate::errors::{CommonscanError, PaginationError, SessionError};
use crate::pagination::ResultPaginator;
use crate::provider::ChainDataProvider;
use crate::tracing::spans;
use crate::types::address::NormalizedAddress;

/// State of one operator's analysis
pub struct AnalysisSession<P: ?Sized> {
    analyzer: Arc<ContractAnalyzer<P>>,
    registrations: Vec<ContractRegistration>,
    results: Option<CommonAddresses>,
    pages: ResultPaginator<NormalizedAddress>,
}

impl<P: ChainDataProvider + ?Sized> AnalysisSession<P> {
    pub fn new(analyzer: Arc<ContractAnalyzer<P>>) -> Self {
        Self {
            analyzer,
            registrations: Vec::new(),
            results: None,
            pages: ResultPaginator::default(),
        }
    }

    pub fn registrations(&self) -> &[ContractRegistration] {
        &self.registrations
    }

    pub fn registration(&self, index: usize) -> Result<&ContractRegistration, SessionError> {
        self.registrations
            .get(index)
            .ok_or_else(|| SessionError::registration_not_found(index, self.registrations.len()))
    }

    /// Returns true when another registration can be added
    pub fn can_register(&self) -> bool {
        self.registrations.len() < self.max_registrations()
    }

    pub fn max_registrations(&self) -> usize {
        self.analyzer.config().max_registrations
    }

    /// Registers a contract and resolves its display name
    ///
    /// Returns the index of the new registration.
    ///
    /// # Errors
    ///
    /// - [`SessionError::RegistrationLimitExceeded`] when the session is full;
    ///   the registrations are left unchanged and no provider call is made
    /// - [`SessionError::InvalidAddress`] when `input` is not a 20-byte hex address
    pub async fn register(&mut self, input: &str) -> Result<usize, SessionError> {
        if !self.can_register() {
            return Err(SessionError::registration_limit_exceeded(self.max_registrations()));
        }

        let address = Address::from_str(input.trim())
            .map(|address| NormalizedAddress::new(address.to_string()))
            .map_err(|_| SessionError::invalid_address(input))?;

        let display_name = self
            .analyzer
            .display_name(&address)
            .instrument(spans::register_contract(&address))
            .await;

        info!(contract = %address, display_name, "Contract registered");
        self.registrations
            .push(ContractRegistration::new(address, display_name));
        self.invalidate_results();
        Ok(self.registrations.len() - 1)
    }

    /// Sets the window start of registration `index` from `YYYY-MM-DD HH:MM:SS`
    ///
    /// # Errors
    ///
    /// [`TimeError`](crate::errors::TimeError) for malformed input, an
    /// inverted window or a window entirely before the chain start;
    /// [`SessionError::RegistrationNotFound`] for a bad index.
    pub fn set_window_start(&mut self, index: usize, input: &str) -> Result<(), CommonscanError> {
        let start = TimeWindow::parse_instant(input)?;
        let clock = self.analyzer.fetcher().clock();

        if let Some(end) = self.registration(index)?.window_end() {
            TimeWindow::new(start, end)?.to_block_range(clock)?;
        }

        let registration = self.registration_mut(index)?;
        registration.set_window_start(start)?;
        self.invalidate_results();
        Ok(())
    }

    /// Sets the window end of registration `index` from `YYYY-MM-DD HH:MM:SS`
    ///
    /// See [`set_window_start`](Self::set_window_start) for errors.
    pub fn set_window_end(&mut self, index: usize, input: &str) -> Result<(), CommonscanError> {
        let end = TimeWindow::parse_instant(input)?;
        let clock = self.analyzer.fetcher().clock();

        // A window that cannot match any block is rejected before it is stored
        if let Some(start) = self.registration(index)?.window_start() {
            TimeWindow::new(start, end)?.to_block_range(clock)?;
        }

        let registration = self.registration_mut(index)?;
        registration.set_window_end(end)?;
        self.invalidate_results();
        Ok(())
    }

    /// Removes registration `index`, shifting later registrations down
    pub fn remove(&mut self, index: usize) -> Result<ContractRegistration, SessionError> {
        if index >= self.registrations.len() {
            return Err(SessionError::registration_not_found(index, self.registrations.len()));
        }
        let removed = self.registrations.remove(index);
        self.invalidate_results();
        Ok(removed)
    }

    /// Analyzes every registration, then intersects and paginates the wallets
    ///
    /// Registrations are analyzed one after another; `observer` is notified
    /// before and after each. A provider failure degrades the affected
    /// registration and the run continues.
    ///
    /// # Errors
    ///
    /// [`SessionError::Cancelled`] when `cancel` is raised. It is checked
    /// between registrations: registrations analyzed before it keep their new
    /// data, the others keep their previous state, and no pages are produced.
    pub async fn analyze(
        &mut self,
        observer: &dyn AnalysisObserver,
        cancel: &CancellationFlag,
    ) -> Result<&CommonAddresses, SessionError> {
        let span = spans::analyze_session(self.registrations.len());
        self.analyze_inner(observer, cancel).instrument(span).await?;
        self.results
            .as_ref()
            .ok_or(SessionError::Cancelled {
                completed: 0,
                total: self.registrations.len(),
            })
    }

    async fn analyze_inner(
        &mut self,
        observer: &dyn AnalysisObserver,
        cancel: &CancellationFlag,
    ) -> Result<(), SessionError> {
        self.invalidate_results();
        let total = self.registrations.len();
        let classifier = self.analyzer.classifier();

        for index in 0..total {
            if cancel.is_cancelled() {
                info!(completed = index, total, "Analysis cancelled");
                return Err(SessionError::Cancelled {
                    completed: index,
                    total,
                });
            }

            let registration = &self.registrations[index];
            let display_name = registration.display_name().to_string();
            observer.on_event(AnalysisEvent::RegistrationStarted {
                index,
                contract: registration.address().clone(),
                display_name: display_name.clone(),
            });

            let analysis = self.analyzer.analyze(index, registration, &classifier).await;
            let event = match &analysis.status {
                RegistrationStatus::Degraded { reason } => AnalysisEvent::RegistrationDegraded {
                    index,
                    display_name,
                    reason: reason.clone(),
                },
                _ => AnalysisEvent::RegistrationFinished {
                    index,
                    display_name,
                    wallets: analysis.unique_wallets.len(),
                    transactions: analysis.transactions.len(),
                    unclassified: analysis.unclassified,
                },
            };
            self.registrations[index].apply(analysis);
            observer.on_event(event);
        }

        observer.on_event(AnalysisEvent::ResolvingCommonAddresses);
        let resolver = CommonAddressResolver::new(self.analyzer.config().intersection_policy);
        let common = {
            let _guard = spans::resolve_common_addresses(total).entered();
            resolver.resolve(&self.registrations)
        };

        self.pages = ResultPaginator::new(common.addresses.clone(), self.analyzer.config().page_size);
        info!(
            common = common.len(),
            pages = self.pages.total_pages(),
            degraded = common.degraded.len(),
            "Analysis complete"
        );
        observer.on_event(AnalysisEvent::Completed {
            common: common.len(),
            pages: self.pages.total_pages(),
        });
        self.results = Some(common);
        Ok(())
    }

    /// Common wallets of the last completed analysis
    pub fn results(&self) -> Option<&CommonAddresses> {
        self.results.as_ref()
    }

    pub fn pages(&self) -> &[Vec<NormalizedAddress>] {
        self.pages.pages()
    }

    pub fn total_pages(&self) -> usize {
        self.pages.total_pages()
    }

    pub fn current_page_index(&self) -> usize {
        self.pages.current_index()
    }

    pub fn current_page(&self) -> Option<&[NormalizedAddress]> {
        self.pages.current()
    }

    /// Page `index` of the last completed analysis
    pub fn page(&self, index: usize) -> Result<&[NormalizedAddress], PaginationError> {
        self.pages.page(index)
    }

    pub fn first_page(&mut self) -> usize {
        self.pages.first()
    }

    pub fn next_page(&mut self) -> usize {
        self.pages.next()
    }

    pub fn previous_page(&mut self) -> usize {
        self.pages.previous()
    }

    pub fn last_page(&mut self) -> usize {
        self.pages.last()
    }

    /// Shows page `index`, clamped to the available pages
    pub fn go_to_page(&mut self, index: usize) -> usize {
        self.pages.go_to(index)
    }

    fn registration_mut(&mut self, index: usize) -> Result<&mut ContractRegistration, SessionError> {
        let len = self.registrations.len();
        self.registrations
            .get_mut(index)
            .ok_or_else(|| SessionError::registration_not_found(index, len))
    }

    fn invalidate_results(&mut self) {
        self.results = None;
        self.pages = ResultPaginator::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::progress::NoopObserver;
    use crate::config::CommonscanConfig;
    use crate::errors::{ProviderError, TimeError};
    use crate::provider::{ExplorerEnvelope, RawTransfer, TokenInfo};
    use alloy_primitives::BlockNumber;
    use async_trait::async_trait;

    struct EmptyProvider;

    #[async_trait]
    impl ChainDataProvider for EmptyProvider {
        async fn get_token_transfers(
            &self,
            _contract: &NormalizedAddress,
            _start_block: BlockNumber,
            _end_block: BlockNumber,
        ) -> Result<ExplorerEnvelope<Vec<RawTransfer>>, ProviderError> {
            Ok(ExplorerEnvelope::ok(Vec::new()))
        }

        async fn get_code(&self, _address: &NormalizedAddress) -> Result<String, ProviderError> {
            Ok("0x".to_string())
        }

        async fn get_token_symbol(
            &self,
            _contract: &NormalizedAddress,
        ) -> Result<ExplorerEnvelope<Option<TokenInfo>>, ProviderError> {
            Ok(ExplorerEnvelope::ok(Some(TokenInfo {
                token_symbol: "TKN".to_string(),
            })))
        }
    }

    fn session() -> AnalysisSession<EmptyProvider> {
        AnalysisSession::new(Arc::new(ContractAnalyzer::new(
            Arc::new(EmptyProvider),
            CommonscanConfig::minimal(),
        )))
    }

    fn address(n: u8) -> String {
        format!("0x{:040x}", n)
    }

    #[tokio::test]
    async fn test_register_normalizes_address() {
        let mut session = session();
        let index = session
            .register("0x4ED4E862860BED51A9570B96D89AF5E1B0EFEFED")
            .await
            .unwrap();

        let registration = session.registration(index).unwrap();
        assert_eq!(
            registration.address().as_str(),
            "0x4ed4e862860bed51a9570b96d89af5e1b0efefed"
        );
        assert_eq!(registration.display_name(), "TKN");
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_address() {
        let mut session = session();
        let err = session.register("not an address").await.unwrap_err();
        assert_eq!(err, SessionError::invalid_address("not an address"));
        assert!(session.registrations().is_empty());
    }

    #[tokio::test]
    async fn test_window_validation() {
        let mut session = session();
        session.register(&address(1)).await.unwrap();

        let err = session.set_window_start(0, "2024/01/01").unwrap_err();
        assert!(matches!(err, CommonscanError::Time(TimeError::InvalidTimeFormat { .. })));

        let err = session.set_window_start(3, "2024-01-01 00:00:00").unwrap_err();
        assert!(matches!(
            err,
            CommonscanError::Session(SessionError::RegistrationNotFound { index: 3, len: 1 })
        ));

        session.set_window_start(0, "2020-01-01 00:00:00").unwrap();
        let err = session.set_window_end(0, "2021-01-01 00:00:00").unwrap_err();
        assert!(matches!(err, CommonscanError::Time(TimeError::WindowBeforeGenesis { .. })));
        assert_eq!(session.registrations()[0].window_end(), None);
    }

    #[tokio::test]
    async fn test_remove_shifts_and_rejects_bad_index() {
        let mut session = session();
        session.register(&address(1)).await.unwrap();
        session.register(&address(2)).await.unwrap();

        let removed = session.remove(0).unwrap();
        assert_eq!(removed.address().as_str(), address(1));
        assert_eq!(session.registrations()[0].address().as_str(), address(2));
        assert!(session.remove(5).is_err());
    }

    #[tokio::test]
    async fn test_analyze_without_registrations_is_empty() {
        let mut session = session();
        let results = session
            .analyze(&NoopObserver, &CancellationFlag::new())
            .await
            .unwrap();

        assert!(results.is_empty());
        assert_eq!(session.total_pages(), 0);
        assert_eq!(session.current_page_index(), 0);
    }

    #[tokio::test]
    async fn test_cancel_before_start() {
        let mut session = session();
        session.register(&address(1)).await.unwrap();
        let cancel = CancellationFlag::new();
        cancel.cancel();

        let err = session.analyze(&NoopObserver, &cancel).await.unwrap_err();
        assert_eq!(err, SessionError::Cancelled { completed: 0, total: 1 });
        assert!(session.results().is_none());
    }
}
