// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Strong types for type safety across commonscan.
//!
//! This module provides newtype wrappers for domain concepts:
//! - Case-normalized addresses and wallet sets
//! - Token amounts and decimals

pub mod address;
pub mod tokens;
pub mod wallets;

// Note: Public types are re-exported from lib.rs, not here
