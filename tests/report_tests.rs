// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for result rendering

mod helpers;

use std::sync::Arc;

use alloy_chains::NamedChain;
use commonscan::analysis::{CancellationFlag, NoopObserver};
use commonscan::report::{render_page, render_registrations, render_summary};
use commonscan::PaginationError;
use helpers::{address, register_with_window, session, test_config, transfer, MockChainProvider};

#[tokio::test]
async fn test_page_lists_counts_and_links_per_contract() {
    let token_a = address(1);
    let token_b = address(2);
    let provider = MockChainProvider::new()
        .with_transfers(
            &token_a,
            vec![transfer("0xB", "0xa", 1), transfer("0xa", "0xb", 2), transfer("0xC", "0xa", 3)],
        )
        .with_transfers(&token_b, vec![transfer("0xb", "0xa", 4)])
        .with_contract("0xa")
        .with_symbol(&token_a, "AAA")
        .with_symbol(&token_b, "BBB");
    let mut session = session(Arc::new(provider), test_config());
    register_with_window(&mut session, &token_a, 0, 10).await;
    register_with_window(&mut session, &token_b, 0, 10).await;
    session
        .analyze(&NoopObserver, &CancellationFlag::new())
        .await
        .unwrap();

    let page = render_page(&session, 0, NamedChain::Base).unwrap();

    assert!(page.starts_with("📄 Page 1/1"));
    assert!(page.contains("🎫 0xb"));
    assert!(page.contains("AAA - 2 TX (timeframe)"));
    assert!(page.contains("BBB - 1 TX (timeframe)"));
    assert!(page.contains(&format!("https://dexscreener.com/base/{token_a}?maker=0xb")));
    assert!(page.contains("https://debank.com/profile/0xb"));
    assert!(page.contains("[BaseScan](https://basescan.org/address/0xb)"));
    assert!(!page.contains("0xc"));
}

#[tokio::test]
async fn test_missing_page_is_an_error() {
    let session = session(Arc::new(MockChainProvider::new()), test_config());
    assert_eq!(
        render_page(&session, 0, NamedChain::Base),
        Err(PaginationError::InvalidPageIndex { index: 0, total: 0 })
    );
}

#[tokio::test]
async fn test_summary_distinguishes_failures_from_true_empty() {
    let token_a = address(1);
    let token_b = address(2);
    let provider = MockChainProvider::new()
        .with_transfers(&token_a, vec![transfer("0xB", "0xa", 1)])
        .with_transfers(&token_b, vec![transfer("0xC", "0xa", 1)])
        .with_contract("0xa")
        .with_symbol(&token_b, "BBB");
    let mut session = session(Arc::new(provider), test_config());
    register_with_window(&mut session, &token_a, 0, 10).await;
    register_with_window(&mut session, &token_b, 0, 10).await;

    let results = session
        .analyze(&NoopObserver, &CancellationFlag::new())
        .await
        .unwrap()
        .clone();
    assert_eq!(render_summary(&session, &results), "No common addresses found.");

    let failing = MockChainProvider::new()
        .with_transfers(&token_a, vec![transfer("0xB", "0xa", 1)])
        .with_transfer_status_failure(&token_b, "NOTOK")
        .with_contract("0xa")
        .with_symbol(&token_b, "BBB");
    let mut session = helpers::session(Arc::new(failing), test_config());
    register_with_window(&mut session, &token_a, 0, 10).await;
    register_with_window(&mut session, &token_b, 0, 10).await;

    let results = session
        .analyze(&NoopObserver, &CancellationFlag::new())
        .await
        .unwrap()
        .clone();
    let summary = render_summary(&session, &results);
    assert!(summary.contains("possibly because"));
    assert!(summary.contains("BBB"));
    assert!(summary.contains("NOTOK"));
}

#[tokio::test]
async fn test_registration_listing() {
    let mut session = session(Arc::new(MockChainProvider::new()), test_config());
    assert_eq!(render_registrations(&session), "No contracts registered.");

    session.register(&address(1)).await.unwrap();
    let listing = render_registrations(&session);
    assert!(listing.starts_with("[0] 0x0000...0001"));
    assert!(listing.contains("start: not set"));
    assert!(listing.contains("pending"));
}

#[tokio::test]
async fn test_failed_classification_is_not_reported_as_true_empty() {
    let token_a = address(1);
    let token_b = address(2);
    let provider = MockChainProvider::new()
        .with_transfers(&token_a, vec![transfer("0xB", "0xa", 1)])
        .with_transfers(&token_b, vec![transfer("0xb", "0xa", 2)])
        .with_contract("0xa")
        .with_code_failure("0xb")
        .with_symbol(&token_a, "AAA")
        .with_symbol(&token_b, "BBB");
    let mut session = session(Arc::new(provider), test_config());
    register_with_window(&mut session, &token_a, 0, 10).await;
    register_with_window(&mut session, &token_b, 0, 10).await;

    let results = session
        .analyze(&NoopObserver, &CancellationFlag::new())
        .await
        .unwrap()
        .clone();

    assert!(results.is_empty());
    assert!(results.degraded.is_empty());
    assert_eq!(results.partially_classified, vec![0, 1]);
    assert!(results.possibly_incomplete());

    let summary = render_summary(&session, &results);
    assert_ne!(summary, "No common addresses found.");
    assert!(summary.contains("possibly because"));
    assert!(summary.contains("AAA (1 addresses could not be classified)"));
    assert!(summary.contains("BBB"));

    let listing = render_registrations(&session);
    assert!(listing.contains("1 unclassified"));
}
