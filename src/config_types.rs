// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Strong types for configuration values
//!
//! These types keep configuration values from being confused with chain
//! values (block numbers, token amounts, page indices).

use serde::{Deserialize, Serialize};

use crate::errors::PaginationError;

/// Maximum block span covered by a single transfer request
///
/// Wide windows are split into requests of at most this many blocks. A span
/// does not bound the number of records: explorer APIs stop at 10 000 records
/// per `tokentx` query, and the transfer fetcher splits any request whose
/// reply reaches that cap.
///
/// # Examples
///
/// ```
/// use commonscan::MaxBlockRange;
///
/// let range = MaxBlockRange::DEFAULT;
/// assert_eq!(range.as_u64(), 10_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaxBlockRange(u64);

impl MaxBlockRange {
    /// Default span per request
    pub const DEFAULT: Self = Self(10_000);

    /// Narrow span for very active tokens
    pub const CONSERVATIVE: Self = Self(1_000);

    /// Create a new max block range
    ///
    /// A zero range is bumped to one block so chunking always makes progress.
    pub const fn new(blocks: u64) -> Self {
        if blocks == 0 {
            Self(1)
        } else {
            Self(blocks)
        }
    }

    /// Get the inner u64 value
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Calculate number of chunks needed to cover a range
    ///
    /// # Examples
    ///
    /// ```
    /// use commonscan::MaxBlockRange;
    ///
    /// let range = MaxBlockRange::new(1000);
    /// assert_eq!(range.chunks_needed(0, 2500), 3); // 0-999, 1000-1999, 2000-2500
    /// ```
    pub fn chunks_needed(&self, start: u64, end: u64) -> usize {
        if end < start {
            return 0;
        }
        let total_blocks = end - start + 1;
        total_blocks.div_ceil(self.0) as usize
    }

    /// Split an inclusive block range into chunks of at most `self` blocks
    ///
    /// # Examples
    ///
    /// ```
    /// use commonscan::MaxBlockRange;
    ///
    /// let chunks: Vec<_> = MaxBlockRange::new(1000).chunk_range(0, 2500).collect();
    /// assert_eq!(chunks, vec![(0, 999), (1000, 1999), (2000, 2500)]);
    /// ```
    pub fn chunk_range(&self, start: u64, end: u64) -> ChunkIterator {
        ChunkIterator {
            current: start,
            end,
            chunk_size: self.0,
            done: end < start,
        }
    }
}

impl Default for MaxBlockRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for MaxBlockRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} blocks", self.0)
    }
}

/// Iterator over block range chunks
///
/// Created by [`MaxBlockRange::chunk_range`]. Yields inclusive `(start, end)` tuples.
#[derive(Debug, Clone)]
pub struct ChunkIterator {
    current: u64,
    end: u64,
    chunk_size: u64,
    done: bool,
}

impl Iterator for ChunkIterator {
    type Item = (u64, u64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let chunk_start = self.current;
        let chunk_end = self
            .current
            .saturating_add(self.chunk_size - 1)
            .min(self.end);

        // chunk_end == u64::MAX would overflow the cursor
        if chunk_end == self.end {
            self.done = true;
        } else {
            self.current = chunk_end + 1;
        }

        Some((chunk_start, chunk_end))
    }
}

/// Number of addresses shown per result page
///
/// Always at least one; construct with [`PageSize::new`].
///
/// # Examples
///
/// ```
/// use commonscan::PageSize;
///
/// assert_eq!(PageSize::new(3).unwrap().get(), 3);
/// assert!(PageSize::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct PageSize(usize);

impl PageSize {
    /// Three addresses per page, which keeps a rendered page within one chat message
    pub const DEFAULT: Self = Self(3);

    /// Create a page size, rejecting zero
    pub fn new(size: usize) -> Result<Self, PaginationError> {
        if size == 0 {
            return Err(PaginationError::invalid_page_size(size));
        }
        Ok(Self(size))
    }

    /// Get the inner value
    pub const fn get(&self) -> usize {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<usize> for PageSize {
    type Error = PaginationError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageSize> for usize {
    fn from(value: PageSize) -> Self {
        value.0
    }
}

impl std::fmt::Display for PageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} per page", self.0)
    }
}
