// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Wallet set type for collections of unique, case-normalized wallet addresses

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::address::NormalizedAddress;

/// A set of unique wallet addresses
///
/// Uses `BTreeSet` internally for:
/// - Automatic deduplication (after case normalization)
/// - Deterministic, lexicographic ordering
///
/// # Examples
///
/// ```
/// use commonscan::WalletSet;
///
/// let a: WalletSet = ["0xA", "0xB"].into_iter().collect();
/// let b: WalletSet = ["0xb", "0xC"].into_iter().collect();
///
/// let common = a.intersection(&b);
/// assert_eq!(common.len(), 1);
/// assert!(common.contains("0xB"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletSet(BTreeSet<NormalizedAddress>);

impl WalletSet {
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Insert an address into the set
    ///
    /// Returns `true` if the address was newly inserted.
    pub fn insert(&mut self, address: impl Into<NormalizedAddress>) -> bool {
        self.0.insert(address.into())
    }

    /// Case-insensitive membership check
    pub fn contains(&self, address: &str) -> bool {
        self.0.contains(&NormalizedAddress::new(address))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in lexicographic order
    pub fn iter(&self) -> impl Iterator<Item = &NormalizedAddress> {
        self.0.iter()
    }

    /// Addresses present in both sets
    pub fn intersection(&self, other: &WalletSet) -> WalletSet {
        Self(self.0.intersection(&other.0).cloned().collect())
    }

    /// Sorted addresses
    pub fn into_sorted_vec(self) -> Vec<NormalizedAddress> {
        self.0.into_iter().collect()
    }
}

impl<A: Into<NormalizedAddress>> FromIterator<A> for WalletSet {
    fn from_iter<T: IntoIterator<Item = A>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl IntoIterator for WalletSet {
    type Item = NormalizedAddress;
    type IntoIter = std::collections::btree_set::IntoIter<NormalizedAddress>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a WalletSet {
    type Item = &'a NormalizedAddress;
    type IntoIter = std::collections::btree_set::Iter<'a, NormalizedAddress>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::fmt::Display for WalletSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WalletSet({} wallets)", self.len())
    }
}
