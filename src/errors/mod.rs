// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the commonscan library.
//!
//! This module provides strongly-typed errors for all public APIs in commonscan.
//! It follows a hybrid approach:
//!
//! - **Module-specific errors** for fine-grained error handling (`TimeError`,
//!   `ProviderError`, etc.)
//! - **Unified error type** (`CommonscanError`) for convenience when you don't need
//!   to distinguish between error sources
//!
//! # Architecture
//!
//! - [`TimeError`] - Malformed calendar input and windows that cannot map to blocks
//! - [`ProviderError`] - Failures reported by, or while reaching, the chain data provider
//! - [`PaginationError`] - Invalid page sizes and page indices
//! - [`SessionError`] - Registration limits, unknown indices, cancellation
//!
//! # Recovery policy
//!
//! `TimeError` and `SessionError::RegistrationLimitExceeded` are recovered by the
//! host (reprompt, reject the add). `ProviderError` never aborts a session: the
//! affected registration contributes no data and the failure is surfaced in the
//! analysis outcome. `PaginationError` signals a logic bug.
//!
//! # Examples
//!
//! ```rust,ignore
//! use commonscan::{CommonscanError, SessionContext};
//!
//! async fn example(ctx: &mut SessionContext) -> Result<(), CommonscanError> {
//!     ctx.session.set_window_start(0, "2024-01-15 00:00:00")?;
//!     ctx.session.set_window_end(0, "2024-01-16 00:00:00")?;
//!     // Errors automatically convert to CommonscanError via From implementations
//!     Ok(())
//! }
//! ```

mod pagination;
mod provider;
mod session;
mod time;

pub use pagination::PaginationError;
pub use provider::ProviderError;
pub use session::SessionError;
pub use time::TimeError;

/// Unified error type for all commonscan operations.
///
/// All module-specific error types automatically convert to `CommonscanError` via
/// `From` implementations, so you can use `?` to propagate errors naturally.
#[derive(Debug, thiserror::Error)]
pub enum CommonscanError {
    /// Error from calendar parsing or block conversion.
    #[error("Time error: {0}")]
    Time(#[from] TimeError),

    /// Error from the chain data provider.
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from result pagination.
    #[error("Pagination error: {0}")]
    Pagination(#[from] PaginationError),

    /// Error from session management.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}
