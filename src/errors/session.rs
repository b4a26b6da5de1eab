// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for session and registration management.

use crate::store::SessionId;

/// Errors that can occur while managing an analysis session.
///
/// # Examples
///
/// ```rust,ignore
/// use commonscan::SessionError;
///
/// match session.register(address, &provider).await {
///     Ok(index) => println!("Registered as #{index}"),
///     Err(SessionError::RegistrationLimitExceeded { limit }) => {
///         println!("You can only add up to {limit} contracts.");
///     }
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The session already holds the maximum number of registrations.
    #[error("Registration limit exceeded: at most {limit} contracts per session")]
    RegistrationLimitExceeded {
        /// Maximum number of registrations per session
        limit: usize,
    },

    /// No registration exists at the given index.
    #[error("No registration at index {index} (session has {len})")]
    RegistrationNotFound {
        /// The requested index
        index: usize,
        /// Number of registrations in the session
        len: usize,
    },

    /// The supplied contract address is not a 20-byte hex address.
    #[error("Invalid contract address: {input:?}")]
    InvalidAddress {
        /// The rejected input, verbatim
        input: String,
    },

    /// No session exists for the given identifier.
    #[error("Unknown session: {id}")]
    UnknownSession {
        /// The session identifier
        id: SessionId,
    },

    /// The analysis was interrupted between registrations.
    #[error("Analysis cancelled after {completed} of {total} registrations")]
    Cancelled {
        /// Registrations fully analyzed before the interruption
        completed: usize,
        /// Registrations in the session
        total: usize,
    },
}

impl SessionError {
    /// Create a `RegistrationLimitExceeded` error.
    pub fn registration_limit_exceeded(limit: usize) -> Self {
        SessionError::RegistrationLimitExceeded { limit }
    }

    /// Create a `RegistrationNotFound` error.
    pub fn registration_not_found(index: usize, len: usize) -> Self {
        SessionError::RegistrationNotFound { index, len }
    }

    /// Create an `InvalidAddress` error.
    pub fn invalid_address(input: impl Into<String>) -> Self {
        SessionError::InvalidAddress {
            input: input.into(),
        }
    }
}
