// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for calendar input and window-to-block conversion.
//!
//! These errors are raised before any provider call is made, so a host can
//! reprompt the operator without touching the chain data provider.

use chrono::NaiveDateTime;

/// Errors that can occur while parsing a time window or converting it to blocks.
///
/// # Examples
///
/// ```rust
/// use commonscan::{TimeError, TimeWindow};
///
/// let err = TimeWindow::parse_instant("15/06/2023").unwrap_err();
/// assert!(matches!(err, TimeError::InvalidTimeFormat { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeError {
    /// Input did not match `YYYY-MM-DD HH:MM:SS`.
    #[error("Invalid time format: {input:?} (expected YYYY-MM-DD HH:MM:SS)")]
    InvalidTimeFormat {
        /// The rejected input, verbatim
        input: String,
    },

    /// The whole window lies before the chain's genesis block.
    #[error("Window ending at {end} lies entirely before the chain start")]
    WindowBeforeGenesis {
        /// Window end that mapped to a negative block
        end: NaiveDateTime,
    },

    /// Window end precedes window start.
    #[error("Window end {end} is before window start {start}")]
    InvertedWindow {
        /// Window start
        start: NaiveDateTime,
        /// Window end
        end: NaiveDateTime,
    },
}

impl TimeError {
    /// Create an `InvalidTimeFormat` error for the rejected input.
    pub fn invalid_time_format(input: impl Into<String>) -> Self {
        TimeError::InvalidTimeFormat {
            input: input.into(),
        }
    }

    /// Create a `WindowBeforeGenesis` error.
    pub fn window_before_genesis(end: NaiveDateTime) -> Self {
        TimeError::WindowBeforeGenesis { end }
    }

    /// Create an `InvertedWindow` error.
    pub fn inverted_window(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        TimeError::InvertedWindow { start, end }
    }
}
