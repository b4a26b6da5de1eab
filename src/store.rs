// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Per-operator session storage
//!
//! Sessions are keyed by an opaque [`SessionId`] chosen by the host (a chat
//! id, a console name). Each session sits behind its own mutex, so a long
//! analysis in one session never blocks another. Sessions are created by
//! [`SessionStore::start`] and removed by [`SessionStore::end`] or, once idle
//! for longer than the configured TTL, by [`SessionStore::evict_expired`].
//! Hosts either call `evict_expired` themselves or go through
//! [`SessionStore::resume`], which evicts before every lookup.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::info;

use crate::analysis::{AnalysisSession, ContractAnalyzer};
use crate::errors::SessionError;
use crate::interaction::SessionContext;
use crate::provider::ChainDataProvider;

/// Opaque identifier of an operator session
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for SessionId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shared handle to one session
pub type SharedSession<P> = Arc<Mutex<SessionContext<P>>>;

struct Entry<P: ?Sized> {
    context: SharedSession<P>,
    last_seen: Instant,
}

/// Sessions of every operator served by one analyzer
pub struct SessionStore<P: ?Sized> {
    analyzer: Arc<ContractAnalyzer<P>>,
    sessions: RwLock<HashMap<SessionId, Entry<P>>>,
    ttl: Duration,
}

impl<P: ChainDataProvider + ?Sized> SessionStore<P> {
    /// Create a store whose sessions expire after the analyzer's configured TTL
    pub fn new(analyzer: Arc<ContractAnalyzer<P>>) -> Self {
        let ttl = analyzer.config().session_ttl;
        Self {
            analyzer,
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Starts a fresh session for `id`, replacing any existing one
    pub async fn start(&self, id: impl Into<SessionId>) -> SharedSession<P> {
        let id = id.into();
        let context = Arc::new(Mutex::new(SessionContext::new(AnalysisSession::new(
            self.analyzer.clone(),
        ))));

        let replaced = self.sessions.write().await.insert(
            id.clone(),
            Entry {
                context: context.clone(),
                last_seen: Instant::now(),
            },
        );
        info!(session = %id, replaced = replaced.is_some(), "Session started");
        context
    }

    /// Session for `id`, refreshing its idle timer
    ///
    /// # Errors
    ///
    /// [`SessionError::UnknownSession`] when no session was started for `id`
    /// or it has ended or expired.
    pub async fn get(&self, id: &SessionId) -> Result<SharedSession<P>, SessionError> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions
            .get_mut(id)
            .ok_or_else(|| SessionError::UnknownSession { id: id.clone() })?;
        entry.last_seen = Instant::now();
        Ok(entry.context.clone())
    }

    /// Ends the session for `id`; returns false when there was none
    pub async fn end(&self, id: &SessionId) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            info!(session = %id, "Session ended");
        }
        removed
    }

    /// Removes sessions idle for longer than the TTL; returns how many
    pub async fn evict_expired(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, entry| {
            let keep = now.duration_since(entry.last_seen) <= self.ttl;
            if !keep {
                info!(session = %id, "Session expired");
            }
            keep
        });
        before - sessions.len()
    }

    /// Evicts idle sessions, then returns the session for `id`
    ///
    /// A session that was missing or just expired is started afresh; the flag
    /// is true in that case so the host can tell the operator.
    pub async fn resume(&self, id: &SessionId) -> (SharedSession<P>, bool) {
        self.evict_expired().await;
        match self.get(id).await {
            Ok(context) => (context, false),
            Err(_) => (self.start(id.clone()).await, true),
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
