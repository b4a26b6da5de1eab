// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Transport layer utilities for chain data providers.
//!
//! This module provides Tower-based middleware layers that wrap any
//! [`ChainDataProvider`](crate::provider::ChainDataProvider). Each wrapped
//! provider is itself a `ChainDataProvider`, so layers compose freely.
//!
//! # Rate Limiting
//!
//! The [`RateLimitLayer`] keeps call volume within the explorer's API limits.
//!
//! # Timeouts
//!
//! The [`TimeoutLayer`] bounds each call; expiry becomes a
//! [`ProviderError::Timeout`](crate::errors::ProviderError::Timeout).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use commonscan::transport::{LoggingLayer, RateLimitLayer, TimeoutLayer};
//! use std::time::Duration;
//! use tower::ServiceBuilder;
//!
//! // Rate limiting wraps the timeout so time spent waiting for a token
//! // does not count against the call
//! let provider = ServiceBuilder::new()
//!     .layer(LoggingLayer::new())
//!     .layer(RateLimitLayer::per_second(5))
//!     .layer(TimeoutLayer::new(Duration::from_secs(30)))
//!     .service(explorer_client);
//! ```

mod logging;
mod rate_limit;
mod timeout;

pub use logging::{LoggedProvider, LoggingLayer};
pub use rate_limit::{RateLimitLayer, RateLimitedProvider};
pub use timeout::{TimeoutLayer, TimeoutProvider};
