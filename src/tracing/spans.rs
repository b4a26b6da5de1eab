// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Span creation helpers for commonscan operations.
//!
//! Telemetry is kept orthogonal to business logic: instead of `#[instrument]`
//! attributes, each instrumented operation has a span helper here.
//!
//! Usage pattern:
//! ```rust,ignore
//! pub async fn my_operation(&self, param: Type) -> Result<T> {
//!     async move {
//!         // Business logic here
//!     }
//!     .instrument(spans::my_operation(param_value))
//!     .await
//! }
//! ```

use alloy_primitives::BlockNumber;
use tracing::{Level, Span};

use crate::types::address::NormalizedAddress;

/// Create span for a single call to the chain data provider.
///
/// Parent: fetch_transactions, classify_addresses or register_contract span
#[inline]
pub(crate) fn provider_call(method: &'static str, address: &NormalizedAddress) -> Span {
    tracing::trace_span!("commonscan.provider_call", method, address = %address)
}

/// Create span for fetching and normalizing the transfers of one contract.
///
/// Parent: analyze_registration span
/// Children: provider_call spans (one per block chunk)
#[inline]
pub(crate) fn fetch_transactions(
    contract: &NormalizedAddress,
    start_block: BlockNumber,
    end_block: BlockNumber,
) -> Span {
    tracing::debug_span!(
        "commonscan.fetch_transactions",
        contract = %contract,
        start_block,
        end_block,
    )
}

/// Create span for classifying the counterparties of one contract.
///
/// Parent: analyze_registration span
/// Children: provider_call spans (one per uncached address)
#[inline]
pub(crate) fn classify_addresses(contract: &NormalizedAddress, candidates: usize) -> Span {
    tracing::debug_span!(
        "commonscan.classify_addresses",
        contract = %contract,
        candidates,
    )
}

/// Create span for analyzing one registration.
///
/// Parent: analyze_session span
/// Children: fetch_transactions and classify_addresses spans
#[inline]
pub(crate) fn analyze_registration(index: usize, contract: &NormalizedAddress) -> Span {
    tracing::info_span!(
        "commonscan.analyze_registration",
        index,
        contract = %contract,
    )
}

/// Create span for a full analysis run.
///
/// This is the main public API entry point for analysis.
///
/// Parent: None (root span for this operation)
/// Children: analyze_registration and resolve_common_addresses spans
#[inline]
pub(crate) fn analyze_session(registrations: usize) -> Span {
    tracing::span!(
        Level::INFO,
        "commonscan.analyze_session",
        registrations,
    )
}

/// Create span for intersecting wallet sets.
///
/// Parent: analyze_session span
#[inline]
pub(crate) fn resolve_common_addresses(registrations: usize) -> Span {
    tracing::debug_span!("commonscan.resolve_common_addresses", registrations)
}

/// Create span for registering a contract and resolving its display name.
///
/// Parent: None (root span for this operation)
/// Children: provider_call span for the symbol lookup
#[inline]
pub(crate) fn register_contract(contract: &NormalizedAddress) -> Span {
    tracing::info_span!("commonscan.register_contract", contract = %contract)
}
