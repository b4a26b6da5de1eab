// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Operator interaction state
//!
//! A host collects input one message at a time. [`SessionContext`] remembers
//! what the next free-text message is expected to be and routes it to the
//! matching [`AnalysisSession`] operation.
//!
//! Input that can be corrected keeps the state, so the host can prompt again:
//! a malformed date, an inverted window or an invalid address. Everything else
//! returns the context to [`InteractionState::Idle`].

use tracing::debug;

use crate::analysis::AnalysisSession;
use crate::errors::{CommonscanError, SessionError};
use crate::provider::ChainDataProvider;

/// What the next free-text message is expected to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    AwaitingContractAddress,
    /// Window start of the registration at the given index
    AwaitingStartDate(usize),
    /// Window end of the registration at the given index
    AwaitingEndDate(usize),
}

/// Effect of a free-text message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionOutcome {
    Registered { index: usize, display_name: String },
    WindowStartSet { index: usize },
    WindowEndSet { index: usize },
    /// No input was expected
    Ignored,
}

/// An analysis session plus the interaction state of its operator
pub struct SessionContext<P: ?Sized> {
    session: AnalysisSession<P>,
    state: InteractionState,
}

impl<P: ChainDataProvider + ?Sized> SessionContext<P> {
    pub fn new(session: AnalysisSession<P>) -> Self {
        Self {
            session,
            state: InteractionState::Idle,
        }
    }

    pub fn session(&self) -> &AnalysisSession<P> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut AnalysisSession<P> {
        &mut self.session
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// Expect a contract address next
    ///
    /// Fails without changing state when the session is full.
    pub fn begin_add_contract(&mut self) -> Result<(), SessionError> {
        if !self.session.can_register() {
            return Err(SessionError::registration_limit_exceeded(
                self.session.max_registrations(),
            ));
        }
        self.transition(InteractionState::AwaitingContractAddress);
        Ok(())
    }

    /// Expect the window start of registration `index` next
    pub fn begin_set_start(&mut self, index: usize) -> Result<(), SessionError> {
        self.session.registration(index)?;
        self.transition(InteractionState::AwaitingStartDate(index));
        Ok(())
    }

    /// Expect the window end of registration `index` next
    pub fn begin_set_end(&mut self, index: usize) -> Result<(), SessionError> {
        self.session.registration(index)?;
        self.transition(InteractionState::AwaitingEndDate(index));
        Ok(())
    }

    /// Drop any pending input expectation
    pub fn cancel_input(&mut self) {
        self.transition(InteractionState::Idle);
    }

    /// Routes a free-text message according to the current state
    ///
    /// # Errors
    ///
    /// Whatever the routed operation returns. On a recoverable error the
    /// state is kept so the host can prompt again.
    pub async fn handle_text(&mut self, input: &str) -> Result<InteractionOutcome, CommonscanError> {
        let result = match self.state {
            InteractionState::Idle => return Ok(InteractionOutcome::Ignored),
            InteractionState::AwaitingContractAddress => {
                self.session.register(input).await.map_err(CommonscanError::from).and_then(
                    |index| {
                        let display_name = self.session.registration(index)?.display_name().to_string();
                        Ok(InteractionOutcome::Registered {
                            index,
                            display_name,
                        })
                    },
                )
            }
            InteractionState::AwaitingStartDate(index) => self
                .session
                .set_window_start(index, input)
                .map(|()| InteractionOutcome::WindowStartSet { index }),
            InteractionState::AwaitingEndDate(index) => self
                .session
                .set_window_end(index, input)
                .map(|()| InteractionOutcome::WindowEndSet { index }),
        };

        match &result {
            Err(error) if is_recoverable(error) => {
                debug!(state = ?self.state, error = %error, "Input rejected, awaiting retry");
            }
            _ => self.transition(InteractionState::Idle),
        }
        result
    }

    fn transition(&mut self, next: InteractionState) {
        debug!(from = ?self.state, to = ?next, "Interaction state change");
        self.state = next;
    }
}

fn is_recoverable(error: &CommonscanError) -> bool {
    matches!(
        error,
        CommonscanError::Time(_) | CommonscanError::Session(SessionError::InvalidAddress { .. })
    )
}
