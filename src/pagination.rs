// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Fixed-size pages over a sorted result and clamped navigation
//!
//! Navigation never fails: moving past either end leaves the index at the
//! boundary. Looking a page up by an index that does not exist is a logic
//! error and is reported as [`PaginationError::InvalidPageIndex`].
//!
//! # Examples
//!
//! ```
//! use commonscan::pagination::{paginate, ResultPaginator};
//! use commonscan::PageSize;
//!
//! let pages = paginate(&[1, 2, 3, 4, 5], 2).unwrap();
//! assert_eq!(pages, vec![vec![1, 2], vec![3, 4], vec![5]]);
//!
//! let mut paginator = ResultPaginator::new(vec![1, 2, 3, 4, 5], PageSize::new(2).unwrap());
//! assert_eq!(paginator.last(), 2);
//! assert_eq!(paginator.next(), 2); // clamped
//! ```

use crate::config_types::PageSize;
use crate::errors::PaginationError;

/// Splits `items` into pages of `page_size`, preserving order
///
/// Every page but the last holds exactly `page_size` items; the last holds
/// between 1 and `page_size`. No items yield no pages.
///
/// # Errors
///
/// [`PaginationError::InvalidPageSize`] when `page_size` is zero.
pub fn paginate<T: Clone>(items: &[T], page_size: usize) -> Result<Vec<Vec<T>>, PaginationError> {
    let page_size = PageSize::new(page_size)?;
    Ok(split_pages(items, page_size))
}

fn split_pages<T: Clone>(items: &[T], page_size: PageSize) -> Vec<Vec<T>> {
    items
        .chunks(page_size.get())
        .map(<[T]>::to_vec)
        .collect()
}

/// Index of the first page
pub const fn first() -> usize {
    0
}

/// Index after `current`, clamped to the last page
pub fn next(current: usize, total_pages: usize) -> usize {
    current.saturating_add(1).min(last(total_pages))
}

/// Index before `current`, clamped to the first page
pub fn previous(current: usize) -> usize {
    current.saturating_sub(1)
}

/// Index of the last page (0 when there are no pages)
pub fn last(total_pages: usize) -> usize {
    total_pages.saturating_sub(1)
}

/// Pages of a result plus the page currently shown
///
/// The current index always lies in `[0, total_pages)` when pages exist and is
/// 0 otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPaginator<T> {
    pages: Vec<Vec<T>>,
    current: usize,
}

impl<T> Default for ResultPaginator<T> {
    fn default() -> Self {
        Self {
            pages: Vec::new(),
            current: 0,
        }
    }
}

impl<T: Clone> ResultPaginator<T> {
    /// Paginates `items` and positions on the first page
    pub fn new(items: Vec<T>, page_size: PageSize) -> Self {
        Self {
            pages: split_pages(&items, page_size),
            current: first(),
        }
    }
}

impl<T> ResultPaginator<T> {
    pub fn pages(&self) -> &[Vec<T>] {
        &self.pages
    }

    pub fn total_pages(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The page currently shown, if any
    pub fn current(&self) -> Option<&[T]> {
        self.pages.get(self.current).map(Vec::as_slice)
    }

    /// Page at `index`
    ///
    /// # Errors
    ///
    /// [`PaginationError::InvalidPageIndex`] when `index >= total_pages`.
    pub fn page(&self, index: usize) -> Result<&[T], PaginationError> {
        self.pages
            .get(index)
            .map(Vec::as_slice)
            .ok_or_else(|| PaginationError::invalid_page_index(index, self.pages.len()))
    }

    pub fn first(&mut self) -> usize {
        self.current = first();
        self.current
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> usize {
        self.current = next(self.current, self.total_pages());
        self.current
    }

    pub fn previous(&mut self) -> usize {
        self.current = previous(self.current);
        self.current
    }

    pub fn last(&mut self) -> usize {
        self.current = last(self.total_pages());
        self.current
    }

    /// Moves to `index`, clamped to the available pages
    pub fn go_to(&mut self, index: usize) -> usize {
        self.current = index.min(last(self.total_pages()));
        self.current
    }
}
