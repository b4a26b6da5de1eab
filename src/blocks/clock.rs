// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Calendar-instant to block-number conversion
//!
//! Block numbers are approximated linearly from a fixed genesis instant and an
//! average block interval. Real inter-block time drifts, so results are only as
//! accurate as the calibration. Callers depend on the [`BlockTimeConverter`]
//! trait so a provider-queried lookup can replace the linear model without
//! touching them.
//!
//! # Examples
//!
//! ```
//! use commonscan::{BlockTimeConverter, LinearBlockClock};
//! use chrono::{TimeDelta, TimeZone, Utc};
//! use std::time::Duration;
//!
//! let genesis = Utc.with_ymd_and_hms(2023, 6, 15, 0, 35, 47).unwrap();
//! let clock = LinearBlockClock::new(genesis, Duration::from_secs(2));
//!
//! assert_eq!(clock.block_for(genesis + TimeDelta::seconds(100)), 50);
//! ```

use chrono::{DateTime, TimeDelta, Utc};
use std::time::Duration;

/// Maps calendar instants to (approximate) block numbers
///
/// Implementations must be pure: identical input always yields identical output.
/// Instants before the chain start may map to zero or to negative numbers; the
/// caller decides whether to clamp or reject (see
/// [`TimeWindow::to_block_range`](crate::TimeWindow::to_block_range)).
pub trait BlockTimeConverter: Send + Sync {
    /// Returns the block number produced at `instant`
    fn block_for(&self, instant: DateTime<Utc>) -> i64;
}

/// Linear block clock: `block = floor((instant - genesis) / interval)`
///
/// Arithmetic is done in whole milliseconds with floor (not truncating)
/// division, so fractional remainders are discarded and instants before
/// genesis map to negative blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearBlockClock {
    genesis: DateTime<Utc>,
    interval_ms: i64,
}

impl LinearBlockClock {
    /// Creates a clock anchored at `genesis` (block 0) with the given average block interval
    ///
    /// Intervals below one millisecond are raised to one millisecond.
    pub fn new(genesis: DateTime<Utc>, interval: Duration) -> Self {
        let interval_ms = i64::try_from(interval.as_millis())
            .unwrap_or(i64::MAX)
            .max(1);
        Self {
            genesis,
            interval_ms,
        }
    }

    /// Instant of block 0
    pub fn genesis(&self) -> DateTime<Utc> {
        self.genesis
    }

    /// Average block interval
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms as u64)
    }

    /// Approximate instant at which `block` was produced
    ///
    /// Inverse of [`BlockTimeConverter::block_for`] up to the discarded remainder.
    pub fn instant_for(&self, block: i64) -> Option<DateTime<Utc>> {
        let offset_ms = block.checked_mul(self.interval_ms)?;
        self.genesis
            .checked_add_signed(TimeDelta::milliseconds(offset_ms))
    }
}

impl BlockTimeConverter for LinearBlockClock {
    fn block_for(&self, instant: DateTime<Utc>) -> i64 {
        let elapsed_ms = instant.timestamp_millis() - self.genesis.timestamp_millis();
        elapsed_ms.div_euclid(self.interval_ms)
    }
}
