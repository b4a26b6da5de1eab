// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Calendar to block-range conversion.
//!
//! This module provides functionality for:
//! - Approximating block numbers from calendar instants ([`clock`])
//! - Parsing operator-entered time windows and mapping them to block ranges ([`window`])

pub mod clock;
pub mod window;

pub use clock::{BlockTimeConverter, LinearBlockClock};
pub use window::*;
