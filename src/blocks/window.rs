// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Time windows and the block ranges they map to
//!
//! Operators enter window bounds as `YYYY-MM-DD HH:MM:SS`, interpreted as UTC.
//! A [`TimeWindow`] is converted to an inclusive [`BlockRange`] through a
//! [`BlockTimeConverter`].
//!
//! # Chain-start policy
//!
//! - A start bound before genesis is clamped to block 0.
//! - An end bound before genesis rejects the window with
//!   [`TimeError::WindowBeforeGenesis`]: nothing on chain can match it.
//!
//! # Examples
//!
//! ```
//! use commonscan::{LinearBlockClock, TimeWindow};
//! use chrono::{TimeZone, Utc};
//! use std::time::Duration;
//!
//! let genesis = Utc.with_ymd_and_hms(2023, 6, 15, 0, 35, 47).unwrap();
//! let clock = LinearBlockClock::new(genesis, Duration::from_secs(2));
//!
//! let window = TimeWindow::parse("2023-06-15 00:35:47", "2023-06-15 00:37:27").unwrap();
//! let range = window.to_block_range(&clock).unwrap();
//! assert_eq!((range.start_block, range.end_block), (0, 50));
//! ```

use alloy_primitives::BlockNumber;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::blocks::clock::BlockTimeConverter;
use crate::errors::TimeError;

/// Textual date-time format accepted for window bounds
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Unix timestamp in seconds (always UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnixTimestamp(pub i64);

impl UnixTimestamp {
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp())
    }

    /// Converts to a UTC date-time, if representable
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.0, 0)
    }

    /// Formats as `YYYY-MM-DD HH:MM:SS` (UTC)
    ///
    /// Out-of-range timestamps fall back to the raw number.
    pub fn human(&self) -> String {
        match self.to_datetime() {
            Some(dt) => dt.format(TIME_FORMAT).to_string(),
            None => self.0.to_string(),
        }
    }
}

impl std::fmt::Display for UnixTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Calendar range `[start, end]` configured for one contract registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeWindow {
    /// Parses a single bound in [`TIME_FORMAT`]
    ///
    /// Surrounding whitespace is ignored; anything else that does not match is
    /// rejected with [`TimeError::InvalidTimeFormat`].
    pub fn parse_instant(input: &str) -> Result<NaiveDateTime, TimeError> {
        NaiveDateTime::parse_from_str(input.trim(), TIME_FORMAT)
            .map_err(|_| TimeError::invalid_time_format(input))
    }

    /// Parses both bounds and validates their order
    pub fn parse(start: &str, end: &str) -> Result<Self, TimeError> {
        Self::new(Self::parse_instant(start)?, Self::parse_instant(end)?)
    }

    /// Creates a window, rejecting `end < start`
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, TimeError> {
        if end < start {
            return Err(TimeError::inverted_window(start, end));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Converts the window to an inclusive block range
    ///
    /// See the module docs for the chain-start policy.
    pub fn to_block_range(
        &self,
        clock: &dyn BlockTimeConverter,
    ) -> Result<BlockRange, TimeError> {
        let start_block = clock.block_for(self.start.and_utc());
        let end_block = clock.block_for(self.end.and_utc());

        if end_block < 0 {
            return Err(TimeError::window_before_genesis(self.end));
        }

        // end_block >= 0 and start <= end, so both casts are lossless after the clamp
        Ok(BlockRange {
            start_block: start_block.max(0) as BlockNumber,
            end_block: end_block as BlockNumber,
        })
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} .. {}",
            self.start.format(TIME_FORMAT),
            self.end.format(TIME_FORMAT)
        )
    }
}

/// Inclusive block range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRange {
    /// First block in the range (inclusive)
    pub start_block: BlockNumber,

    /// Last block in the range (inclusive)
    pub end_block: BlockNumber,
}

impl BlockRange {
    /// Returns true when `block` lies in `[start_block, end_block]`
    pub fn contains(&self, block: BlockNumber) -> bool {
        self.start_block <= block && block <= self.end_block
    }

    /// Returns the number of blocks in this range (inclusive)
    pub fn block_count(&self) -> u64 {
        self.end_block
            .saturating_sub(self.start_block)
            .saturating_add(1)
    }
}

impl std::fmt::Display for BlockRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start_block, self.end_block)
    }
}
