// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Strong types for token-related values
//!
//! ```text
//! TokenAmount (U256, raw)
//!     |
//!     | normalize(TokenDecimals)
//!     ↓
//! BigDecimal (exact, human-readable)
//! ```

mod amount;
mod decimals;

pub use amount::TokenAmount;
pub use decimals::TokenDecimals;
