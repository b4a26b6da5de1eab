// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Common-wallet analysis for EVM token contracts
//!
//! Given up to four token contracts, each with its own calendar window,
//! `commonscan` finds the externally-owned wallets that transacted with every
//! one of them inside their windows.
//!
//! The pipeline:
//!
//! 1. [`TimeWindow`] bounds are mapped to block numbers by a
//!    [`BlockTimeConverter`] ([`LinearBlockClock`] for a constant block interval)
//! 2. [`events::TransactionFetcher`] retrieves the token transfers of each
//!    contract in its block range from a [`provider::ChainDataProvider`]
//! 3. [`classify::AddressClassifier`] keeps only counterparties without
//!    deployed code
//! 4. [`analysis::CommonAddressResolver`] intersects the wallet sets
//! 5. [`pagination::ResultPaginator`] splits the sorted result into pages
//!
//! [`analysis::AnalysisSession`] drives the pipeline for one operator,
//! [`store::SessionStore`] keeps one session per operator and
//! [`report`] renders pages for display.
//!
//! # Provider failures
//!
//! A provider failure never aborts an analysis. The affected registration is
//! reported as degraded, contributes no wallets, and the result records which
//! registrations failed (see [`IntersectionPolicy`]).
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use commonscan::analysis::{AnalysisSession, ContractAnalyzer, NoopObserver, CancellationFlag};
//! use commonscan::provider::{ExplorerClient, ExplorerConfig};
//! use commonscan::CommonscanConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ExplorerClient::new(ExplorerConfig::basescan("API_KEY")?)?;
//! let analyzer = Arc::new(ContractAnalyzer::new(Arc::new(client), CommonscanConfig::default()));
//!
//! let mut session = AnalysisSession::new(analyzer);
//! let index = session.register("0x4ed4e862860bed51a9570b96d89af5e1b0efefed").await?;
//! session.set_window_start(index, "2024-03-01 00:00:00")?;
//! session.set_window_end(index, "2024-03-01 01:00:00")?;
//!
//! let results = session.analyze(&NoopObserver, &CancellationFlag::new()).await?;
//! println!("{} common wallets", results.len());
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod blocks;
pub mod bootstrap;
pub mod classify;
pub mod config;
pub mod config_types;
pub mod errors;
pub mod events;
pub mod interaction;
pub mod pagination;
pub mod provider;
pub mod report;
pub mod store;
pub mod transport;
pub mod types;

mod tracing;

pub use analysis::{
    AnalysisEvent, AnalysisObserver, AnalysisSession, CancellationFlag, CommonAddresses,
    ContractAnalyzer, IntersectionPolicy,
};
pub use blocks::{BlockRange, BlockTimeConverter, LinearBlockClock, TimeWindow, UnixTimestamp};
pub use config::{BlockClockConfig, ChainConfig, CommonscanConfig, CommonscanConfigBuilder};
pub use config_types::{MaxBlockRange, PageSize};
pub use errors::{CommonscanError, PaginationError, ProviderError, SessionError, TimeError};
pub use interaction::{InteractionOutcome, InteractionState, SessionContext};
pub use store::{SessionId, SessionStore};
pub use types::address::NormalizedAddress;
pub use types::tokens::{TokenAmount, TokenDecimals};
pub use types::wallets::WalletSet;
