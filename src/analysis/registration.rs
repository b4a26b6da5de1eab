// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Contract registrations and their per-contract analysis results

use chrono::NaiveDateTime;

use crate::blocks::{BlockRange, TimeWindow};
use crate::errors::TimeError;
use crate::events::Transaction;
use crate::types::address::NormalizedAddress;
use crate::types::wallets::WalletSet;

/// Analysis state of a registration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RegistrationStatus {
    /// Not analyzed since it was added or its window last changed
    #[default]
    Pending,
    /// Transfers were fetched and counterparties classified
    Analyzed,
    /// No usable data: the window was unusable or the provider failed
    Degraded { reason: String },
}

/// Result of analyzing one registration, applied in a single step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationAnalysis {
    /// Block range queried, when the window could be converted
    pub range: Option<BlockRange>,
    pub transactions: Vec<Transaction>,
    /// Counterparties confirmed to be wallets
    pub unique_wallets: WalletSet,
    /// Counterparties whose classification failed (excluded from the wallets)
    pub unclassified: usize,
    pub status: RegistrationStatus,
}

impl RegistrationAnalysis {
    /// Analysis without usable data
    pub fn degraded(reason: impl Into<String>) -> Self {
        Self {
            range: None,
            transactions: Vec::new(),
            unique_wallets: WalletSet::new(),
            unclassified: 0,
            status: RegistrationStatus::Degraded {
                reason: reason.into(),
            },
        }
    }
}

/// A token contract registered in a session, with its window and analysis data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractRegistration {
    address: NormalizedAddress,
    display_name: String,
    window_start: Option<NaiveDateTime>,
    window_end: Option<NaiveDateTime>,
    range: Option<BlockRange>,
    transactions: Vec<Transaction>,
    unique_wallets: WalletSet,
    unclassified: usize,
    status: RegistrationStatus,
}

impl ContractRegistration {
    pub fn new(address: NormalizedAddress, display_name: impl Into<String>) -> Self {
        Self {
            address,
            display_name: display_name.into(),
            window_start: None,
            window_end: None,
            range: None,
            transactions: Vec::new(),
            unique_wallets: WalletSet::new(),
            unclassified: 0,
            status: RegistrationStatus::Pending,
        }
    }

    pub fn address(&self) -> &NormalizedAddress {
        &self.address
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn window_start(&self) -> Option<NaiveDateTime> {
        self.window_start
    }

    pub fn window_end(&self) -> Option<NaiveDateTime> {
        self.window_end
    }

    /// The configured window, once both bounds are set
    pub fn window(&self) -> Option<TimeWindow> {
        match (self.window_start, self.window_end) {
            (Some(start), Some(end)) => TimeWindow::new(start, end).ok(),
            _ => None,
        }
    }

    /// Sets the window start, rejecting a start after an existing end
    ///
    /// Any previous analysis data is discarded.
    pub fn set_window_start(&mut self, start: NaiveDateTime) -> Result<(), TimeError> {
        if let Some(end) = self.window_end {
            TimeWindow::new(start, end)?;
        }
        self.window_start = Some(start);
        self.reset();
        Ok(())
    }

    /// Sets the window end, rejecting an end before an existing start
    ///
    /// Any previous analysis data is discarded.
    pub fn set_window_end(&mut self, end: NaiveDateTime) -> Result<(), TimeError> {
        if let Some(start) = self.window_start {
            TimeWindow::new(start, end)?;
        }
        self.window_end = Some(end);
        self.reset();
        Ok(())
    }

    /// Block range queried by the last analysis
    pub fn range(&self) -> Option<BlockRange> {
        self.range
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Wallets (never contracts) that transacted with this contract in the window
    pub fn unique_wallets(&self) -> &WalletSet {
        &self.unique_wallets
    }

    /// Counterparties left out of the wallets because classification failed
    pub fn unclassified(&self) -> usize {
        self.unclassified
    }

    pub fn status(&self) -> &RegistrationStatus {
        &self.status
    }

    pub fn is_analyzed(&self) -> bool {
        self.status == RegistrationStatus::Analyzed
    }

    /// Number of transfers in the window sent or received by `address`
    pub fn transactions_involving(&self, address: &NormalizedAddress) -> usize {
        self.transactions
            .iter()
            .filter(|tx| tx.involves(address))
            .count()
    }

    /// Replaces all analysis data at once
    pub fn apply(&mut self, analysis: RegistrationAnalysis) {
        self.range = analysis.range;
        self.transactions = analysis.transactions;
        self.unique_wallets = analysis.unique_wallets;
        self.unclassified = analysis.unclassified;
        self.status = analysis.status;
    }

    fn reset(&mut self) {
        self.apply(RegistrationAnalysis {
            range: None,
            transactions: Vec::new(),
            unique_wallets: WalletSet::new(),
            unclassified: 0,
            status: RegistrationStatus::Pending,
        });
    }
}
