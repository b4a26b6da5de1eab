// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Token transfer retrieval.
//!
//! This module handles:
//! - Normalized transfer records ([`Transaction`])
//! - Chunked, range-exact transfer fetching with degraded-continue semantics
//!   ([`TransactionFetcher`])

pub mod fetcher;
pub mod transaction;

pub use fetcher::{FetchOutcome, TransactionFetcher};
pub use transaction::Transaction;
