// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Operator-facing text: result pages, summaries and progress lines
//!
//! Output is Markdown as understood by chat clients (`[label](url)` links).

use std::fmt::Write as _;

use alloy_chains::NamedChain;

use crate::analysis::{AnalysisEvent, AnalysisSession, CommonAddresses, RegistrationStatus};
use crate::config::constants::links;
use crate::errors::PaginationError;
use crate::provider::ChainDataProvider;
use crate::types::address::NormalizedAddress;

/// Renders page `index` of the session's common addresses
///
/// For each address: one block per registration with its transaction count in
/// the window and a DexScreener link filtered to the address, then Debank and
/// block explorer links.
///
/// # Errors
///
/// [`PaginationError::InvalidPageIndex`] when the page does not exist.
pub fn render_page<P: ChainDataProvider + ?Sized>(
    session: &AnalysisSession<P>,
    index: usize,
    chain: NamedChain,
) -> Result<String, PaginationError> {
    let page = session.page(index)?;
    let mut out = String::new();

    let _ = writeln!(out, "📄 Page {}/{}\n", index + 1, session.total_pages());
    for address in page {
        render_address(&mut out, session, address, chain);
    }
    Ok(out)
}

fn render_address<P: ChainDataProvider + ?Sized>(
    out: &mut String,
    session: &AnalysisSession<P>,
    address: &NormalizedAddress,
    chain: NamedChain,
) {
    let _ = writeln!(out, "🎫 {address}");
    for registration in session.registrations() {
        let _ = writeln!(
            out,
            "{} - {} TX (timeframe)\n[DexScreener]({})\n",
            registration.display_name(),
            registration.transactions_involving(address),
            dexscreener_url(chain, registration.address(), address),
        );
    }
    let _ = writeln!(out, "🔍 [Debank]({}/{address})", links::DEBANK_PROFILE_URL);
    let _ = writeln!(
        out,
        "🔍 [{}]({})\n",
        explorer_name(chain),
        explorer_address_url(chain, address)
    );
}

/// DexScreener page of `contract` filtered to trades by `maker`
pub fn dexscreener_url(chain: NamedChain, contract: &NormalizedAddress, maker: &NormalizedAddress) -> String {
    format!(
        "{}/{}/{contract}?maker={maker}",
        links::DEXSCREENER_URL,
        dexscreener_chain(chain)
    )
}

/// DexScreener's path segment for `chain`; other chains use their canonical name
fn dexscreener_chain(chain: NamedChain) -> String {
    match chain {
        NamedChain::Mainnet => "ethereum".to_string(),
        NamedChain::Base => "base".to_string(),
        NamedChain::Arbitrum => "arbitrum".to_string(),
        NamedChain::Optimism => "optimism".to_string(),
        NamedChain::Polygon => "polygon".to_string(),
        NamedChain::BinanceSmartChain => "bsc".to_string(),
        NamedChain::Avalanche => "avalanche".to_string(),
        other => other.to_string(),
    }
}

/// Block explorer page of `address`, falling back to BaseScan for unknown chains
pub fn explorer_address_url(chain: NamedChain, address: &NormalizedAddress) -> String {
    match chain.etherscan_urls() {
        Some((_, base)) => format!("{}/address/{address}", base.trim_end_matches('/')),
        None => format!("{}/{address}", links::BASESCAN_ADDRESS_URL),
    }
}

fn explorer_name(chain: NamedChain) -> &'static str {
    match chain {
        NamedChain::Base => "BaseScan",
        NamedChain::Mainnet => "Etherscan",
        _ => "Explorer",
    }
}

/// One-paragraph summary of an analysis result
///
/// An empty result caused by failed registrations or failed classification
/// lookups is reported as possibly incomplete, never as "no common addresses".
pub fn render_summary<P: ChainDataProvider + ?Sized>(
    session: &AnalysisSession<P>,
    results: &CommonAddresses,
) -> String {
    let registrations = session.registrations();
    let failed: Vec<String> = results
        .degraded
        .iter()
        .filter_map(|&index| registrations.get(index))
        .map(|registration| match registration.status() {
            RegistrationStatus::Degraded { reason } => {
                format!("{} ({reason})", registration.display_name())
            }
            _ => format!("{} (not analyzed)", registration.display_name()),
        })
        .chain(
            results
                .partially_classified
                .iter()
                .filter_map(|&index| registrations.get(index))
                .map(|registration| {
                    format!(
                        "{} ({} addresses could not be classified)",
                        registration.display_name(),
                        registration.unclassified()
                    )
                }),
        )
        .collect();

    match (results.is_empty(), failed.is_empty()) {
        (true, true) => "No common addresses found.".to_string(),
        (true, false) => format!(
            "⚠️ No common addresses, possibly because these contracts could not be fully analyzed: {}",
            failed.join(", ")
        ),
        (false, true) => format!(
            "✅ {} common addresses across {} contracts ({} pages).",
            results.len(),
            registrations.len(),
            session.total_pages()
        ),
        (false, false) => format!(
            "⚠️ {} common addresses across the analyzed contracts ({} pages), possibly incomplete: {}",
            results.len(),
            session.total_pages(),
            failed.join(", ")
        ),
    }
}

/// Registrations with their windows and analysis state
pub fn render_registrations<P: ChainDataProvider + ?Sized>(session: &AnalysisSession<P>) -> String {
    if session.registrations().is_empty() {
        return "No contracts registered.".to_string();
    }

    let mut out = String::new();
    for (index, registration) in session.registrations().iter().enumerate() {
        let bound = |value: Option<chrono::NaiveDateTime>| {
            value.map_or_else(|| "not set".to_string(), |v| v.to_string())
        };
        let state = match registration.status() {
            RegistrationStatus::Pending => "pending".to_string(),
            RegistrationStatus::Analyzed if registration.unclassified() > 0 => format!(
                "{} TX, {} wallets, {} unclassified",
                registration.transactions().len(),
                registration.unique_wallets().len(),
                registration.unclassified()
            ),
            RegistrationStatus::Analyzed => format!(
                "{} TX, {} wallets",
                registration.transactions().len(),
                registration.unique_wallets().len()
            ),
            RegistrationStatus::Degraded { reason } => format!("failed: {reason}"),
        };
        let _ = writeln!(
            out,
            "[{index}] {} {} | start: {} | end: {} | {state}",
            registration.display_name(),
            registration.address(),
            bound(registration.window_start()),
            bound(registration.window_end()),
        );
    }
    out
}

/// Progress line for an analysis event
pub fn render_event(event: &AnalysisEvent) -> String {
    match event {
        AnalysisEvent::RegistrationStarted { display_name, .. } => {
            format!("⏳ Start analyzing transactions for the following contract: {display_name}")
        }
        AnalysisEvent::RegistrationFinished {
            display_name,
            wallets,
            transactions,
            unclassified: 0,
            ..
        } => format!(
            "✅ End analyzing {display_name}: {transactions} transactions, {wallets} different wallets"
        ),
        AnalysisEvent::RegistrationFinished {
            display_name,
            wallets,
            transactions,
            unclassified,
            ..
        } => format!(
            "⚠️ End analyzing {display_name}: {transactions} transactions, {wallets} different wallets, \
             {unclassified} addresses could not be classified"
        ),
        AnalysisEvent::RegistrationDegraded {
            display_name,
            reason,
            ..
        } => format!("⚠️ {display_name} could not be analyzed: {reason}"),
        AnalysisEvent::ResolvingCommonAddresses => "🔎 Resolving common addresses...".to_string(),
        AnalysisEvent::Completed { common, pages } => {
            format!("🏁 Analysis complete: {common} common addresses, {pages} pages")
        }
    }
}
