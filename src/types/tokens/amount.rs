// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Raw and decimal-adjusted token amounts

use alloy_primitives::U256;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::decimals::TokenDecimals;

/// Raw token amount in the token's smallest unit
///
/// Explorer APIs report transfer values as decimal strings of the raw
/// on-chain integer. Use [`normalize`](Self::normalize) to scale by decimals.
///
/// # Examples
///
/// ```
/// use commonscan::{TokenAmount, TokenDecimals};
///
/// let raw = TokenAmount::parse("1500000000000000000").unwrap();
/// assert_eq!(raw.normalize(TokenDecimals::STANDARD).to_string(), "1.5");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenAmount(U256);

impl TokenAmount {
    pub const ZERO: Self = Self(U256::ZERO);

    pub const fn new(amount: U256) -> Self {
        Self(amount)
    }

    /// Parses a base-10 integer string; returns `None` for anything else
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        U256::from_str_radix(raw, 10).ok().map(Self)
    }

    pub const fn as_u256(&self) -> U256 {
        self.0
    }

    /// Exact decimal value: `amount / 10^decimals`
    ///
    /// Unlike a float division this keeps every digit of large balances.
    pub fn normalize(&self, decimals: TokenDecimals) -> BigDecimal {
        // U256's Display is base-10 digits only, which BigDecimal always parses
        let digits = self.0.to_string();
        BigDecimal::from_str(&digits)
            .map(|value| (value / ten_pow(decimals.as_u8())).normalized())
            .unwrap_or_default()
    }
}

fn ten_pow(exponent: u8) -> BigDecimal {
    BigDecimal::new(1.into(), -i64::from(exponent))
}

impl std::fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
