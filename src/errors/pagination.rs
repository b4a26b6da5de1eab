// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for result pagination.
//!
//! Both variants indicate a logic or configuration bug rather than bad
//! operator input: navigation requests clamp instead of failing.

/// Errors that can occur while paginating a result collection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// Page size must be a positive integer.
    #[error("Invalid page size: {size} (must be at least 1)")]
    InvalidPageSize {
        /// The rejected page size
        size: usize,
    },

    /// A page was requested by an index that does not exist.
    #[error("Invalid page index {index} (total pages: {total})")]
    InvalidPageIndex {
        /// The requested index
        index: usize,
        /// Number of pages available
        total: usize,
    },
}

impl PaginationError {
    /// Create an `InvalidPageSize` error.
    pub fn invalid_page_size(size: usize) -> Self {
        PaginationError::InvalidPageSize { size }
    }

    /// Create an `InvalidPageIndex` error.
    pub fn invalid_page_index(index: usize, total: usize) -> Self {
        PaginationError::InvalidPageIndex { index, total }
    }
}
