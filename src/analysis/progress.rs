// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Progress reporting and cancellation for long-running analyses

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::types::address::NormalizedAddress;

/// Progress notification emitted while a session is analyzed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisEvent {
    /// Analysis of a registration is starting
    RegistrationStarted {
        index: usize,
        contract: NormalizedAddress,
        display_name: String,
    },
    /// Analysis of a registration finished with usable data
    RegistrationFinished {
        index: usize,
        display_name: String,
        wallets: usize,
        transactions: usize,
        /// Counterparties whose code lookup failed; never counted as wallets
        unclassified: usize,
    },
    /// Analysis of a registration finished without usable data
    RegistrationDegraded {
        index: usize,
        display_name: String,
        reason: String,
    },
    /// All registrations are analyzed; intersecting wallet sets
    ResolvingCommonAddresses,
    /// The result pages are ready
    Completed { common: usize, pages: usize },
}

/// Receives [`AnalysisEvent`]s
///
/// Implementations must not block: they run inline with the analysis.
pub trait AnalysisObserver: Send + Sync {
    fn on_event(&self, event: AnalysisEvent);
}

/// Observer that discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl AnalysisObserver for NoopObserver {
    fn on_event(&self, _event: AnalysisEvent) {}
}

/// Forwards events to a channel; a closed receiver is ignored
impl AnalysisObserver for mpsc::UnboundedSender<AnalysisEvent> {
    fn on_event(&self, event: AnalysisEvent) {
        let _ = self.send(event);
    }
}

/// Forwards events to a bounded channel, dropping them when it is full
impl AnalysisObserver for mpsc::Sender<AnalysisEvent> {
    fn on_event(&self, event: AnalysisEvent) {
        if let Err(mpsc::error::TrySendError::Full(event)) = self.try_send(event) {
            tracing::debug!(?event, "Progress channel full, dropping event");
        }
    }
}

/// Cooperative cancellation signal shared between a host and a running analysis
///
/// The analysis checks the flag between registrations; a registration in
/// progress always completes (or degrades) before cancellation takes effect.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clears the flag so the next analysis can run
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_flag_is_shared() {
        let flag = CancellationFlag::new();
        let handle = flag.clone();

        assert!(!flag.is_cancelled());
        handle.cancel();
        assert!(flag.is_cancelled());
        flag.reset();
        assert!(!handle.is_cancelled());
    }

    #[tokio::test]
    async fn test_unbounded_sender_forwards_events() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.on_event(AnalysisEvent::ResolvingCommonAddresses);
        assert_eq!(rx.recv().await, Some(AnalysisEvent::ResolvingCommonAddresses));
    }

    #[test]
    fn test_closed_channel_is_ignored() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        tx.on_event(AnalysisEvent::Completed { common: 0, pages: 0 });
    }

    #[tokio::test]
    async fn test_full_bounded_channel_drops() {
        let (tx, mut rx) = mpsc::channel(1);
        tx.on_event(AnalysisEvent::ResolvingCommonAddresses);
        tx.on_event(AnalysisEvent::Completed { common: 1, pages: 1 });

        assert_eq!(rx.recv().await, Some(AnalysisEvent::ResolvingCommonAddresses));
        assert!(rx.try_recv().is_err());
    }
}
