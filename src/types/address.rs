// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Case-normalized address strings

use serde::{Deserialize, Serialize};

/// An address string trimmed and lower-cased
///
/// Explorer `from`/`to` fields and operator input may spell the same address
/// with different case. Every comparison, set operation and sort in the engine
/// goes through this type so those spellings collapse to one value. Ordering is
/// lexicographic on the normalized string.
///
/// The value is not validated as hex: counterparties are taken as the provider
/// reports them.
///
/// # Examples
///
/// ```
/// use commonscan::NormalizedAddress;
///
/// let a = NormalizedAddress::new("0xAbC");
/// let b = NormalizedAddress::new(" 0xabc ");
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "0xabc");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct NormalizedAddress(String);

impl NormalizedAddress {
    pub fn new(address: impl AsRef<str>) -> Self {
        Self(address.as_ref().trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against a raw address string
    pub fn matches(&self, raw: &str) -> bool {
        self.0.eq_ignore_ascii_case(raw.trim())
    }

    /// Short display form: first 6 and last 4 characters joined by an ellipsis
    ///
    /// Strings too short to abbreviate are returned whole.
    pub fn abbreviated(&self) -> String {
        abbreviate(&self.0)
    }
}

/// `0x1234...abcd` form of an address string, used when no symbol is known
pub(crate) fn abbreviate(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

impl From<String> for NormalizedAddress {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for NormalizedAddress {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<NormalizedAddress> for String {
    fn from(value: NormalizedAddress) -> Self {
        value.0
    }
}

impl AsRef<str> for NormalizedAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NormalizedAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_and_whitespace_normalized() {
        let mixed = NormalizedAddress::new("  0xA0b86991C6218b36c1d19D4a2e9Eb0cE3606eB48\n");
        assert_eq!(mixed.as_str(), "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
    }

    #[test]
    fn test_matches_ignores_case() {
        let address = NormalizedAddress::new("0xabc");
        assert!(address.matches("0xABC"));
        assert!(!address.matches("0xabd"));
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let mut addresses = vec![
            NormalizedAddress::new("0xC"),
            NormalizedAddress::new("0xa"),
            NormalizedAddress::new("0xB"),
        ];
        addresses.sort();
        let sorted: Vec<_> = addresses.iter().map(|a| a.as_str()).collect();
        assert_eq!(sorted, vec!["0xa", "0xb", "0xc"]);
    }

    #[test]
    fn test_abbreviated() {
        let address = NormalizedAddress::new("0x833589fcd6edb6e08f4c7c32d4f71b54bda02913");
        assert_eq!(address.abbreviated(), "0x8335...2913");
        assert_eq!(NormalizedAddress::new("0xabc").abbreviated(), "0xabc");
    }

    #[test]
    fn test_serde_normalizes_on_read() {
        let address: NormalizedAddress = serde_json::from_str("\"0xABC\"").unwrap();
        assert_eq!(address.as_str(), "0xabc");
        assert_eq!(serde_json::to_string(&address).unwrap(), "\"0xabc\"");
    }
}
