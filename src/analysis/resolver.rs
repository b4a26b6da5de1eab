// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Intersection of wallet sets across registrations
//!
//! # Failed registrations
//!
//! A registration without usable data has an empty wallet set. How it takes
//! part in the intersection is a policy choice:
//!
//! - [`IntersectionPolicy::Strict`] intersects every registration, so one
//!   failure empties the result. The result lists the failed registrations so
//!   the host can tell "nothing in common" from "possibly empty due to failures".
//! - [`IntersectionPolicy::ExcludeFailed`] intersects only the registrations
//!   that were analyzed successfully.
//!
//! Registrations whose transfers were fetched but some counterparties could not
//! be classified are listed separately: their wallet sets may be missing
//! addresses, so an empty or short result is possibly incomplete as well.

use serde::{Deserialize, Serialize};

use crate::analysis::registration::ContractRegistration;
use crate::types::address::NormalizedAddress;
use crate::types::wallets::WalletSet;

/// How registrations without usable data take part in the intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntersectionPolicy {
    /// Failed registrations contribute an empty set
    #[default]
    Strict,
    /// Failed registrations are left out of the intersection
    ExcludeFailed,
}

/// Sorted common wallets plus what was left out to obtain them
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommonAddresses {
    /// Addresses present in every intersected wallet set, sorted
    pub addresses: Vec<NormalizedAddress>,
    /// Indices of registrations without usable data
    pub degraded: Vec<usize>,
    /// Indices of analyzed registrations with unclassified counterparties
    pub partially_classified: Vec<usize>,
    /// Policy the intersection was computed with
    pub policy: IntersectionPolicy,
}

impl CommonAddresses {
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    /// Returns true when registration or classification failures may have
    /// shrunk the result
    pub fn possibly_incomplete(&self) -> bool {
        !self.degraded.is_empty() || !self.partially_classified.is_empty()
    }
}

/// Computes the common wallets of a session's registrations
#[derive(Debug, Clone, Copy, Default)]
pub struct CommonAddressResolver {
    policy: IntersectionPolicy,
}

impl CommonAddressResolver {
    pub fn new(policy: IntersectionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> IntersectionPolicy {
        self.policy
    }

    /// Intersects the wallet sets of `registrations`
    ///
    /// Zero registrations yield an empty result; one registration yields its
    /// wallets, sorted.
    pub fn resolve(&self, registrations: &[ContractRegistration]) -> CommonAddresses {
        let degraded: Vec<usize> = registrations
            .iter()
            .enumerate()
            .filter(|(_, reg)| !reg.is_analyzed())
            .map(|(index, _)| index)
            .collect();
        let partially_classified: Vec<usize> = registrations
            .iter()
            .enumerate()
            .filter(|(_, reg)| reg.is_analyzed() && reg.unclassified() > 0)
            .map(|(index, _)| index)
            .collect();

        let sets: Vec<&WalletSet> = registrations
            .iter()
            .filter(|reg| match self.policy {
                IntersectionPolicy::Strict => true,
                IntersectionPolicy::ExcludeFailed => reg.is_analyzed(),
            })
            .map(ContractRegistration::unique_wallets)
            .collect();

        CommonAddresses {
            addresses: intersect_all(&sets),
            degraded,
            partially_classified,
            policy: self.policy,
        }
    }
}

/// Sorted intersection of every set in `sets`; empty for no sets
pub fn intersect_all(sets: &[&WalletSet]) -> Vec<NormalizedAddress> {
    let Some((first, rest)) = sets.split_first() else {
        return Vec::new();
    };

    rest.iter()
        .fold((*first).clone(), |common, set| common.intersection(set))
        .into_sorted_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::registration::{RegistrationAnalysis, RegistrationStatus};

    fn analyzed(wallets: &[&str]) -> ContractRegistration {
        analyzed_with_unclassified(wallets, 0)
    }

    fn analyzed_with_unclassified(wallets: &[&str], unclassified: usize) -> ContractRegistration {
        let mut reg = ContractRegistration::new(NormalizedAddress::new("0xtoken"), "TKN");
        reg.apply(RegistrationAnalysis {
            range: None,
            transactions: Vec::new(),
            unique_wallets: wallets.iter().copied().collect(),
            unclassified,
            status: RegistrationStatus::Analyzed,
        });
        reg
    }

    fn failed() -> ContractRegistration {
        let mut reg = ContractRegistration::new(NormalizedAddress::new("0xtoken"), "TKN");
        reg.apply(RegistrationAnalysis::degraded("NOTOK"));
        reg
    }

    fn strings(result: &CommonAddresses) -> Vec<&str> {
        result.addresses.iter().map(|a| a.as_str()).collect()
    }

    #[test]
    fn test_no_registrations() {
        let result = CommonAddressResolver::default().resolve(&[]);
        assert!(result.is_empty());
        assert!(!result.possibly_incomplete());
    }

    #[test]
    fn test_single_registration_is_sorted() {
        let result = CommonAddressResolver::default().resolve(&[analyzed(&["0xC", "0xa", "0xB"])]);
        assert_eq!(strings(&result), vec!["0xa", "0xb", "0xc"]);
    }

    #[test]
    fn test_case_insensitive_intersection() {
        let result = CommonAddressResolver::default()
            .resolve(&[analyzed(&["0xA", "0xB"]), analyzed(&["0xb", "0xC"])]);
        assert_eq!(strings(&result), vec!["0xb"]);
    }

    #[test]
    fn test_strict_failure_collapses_result() {
        let result = CommonAddressResolver::new(IntersectionPolicy::Strict)
            .resolve(&[analyzed(&["0xa"]), failed()]);

        assert!(result.is_empty());
        assert_eq!(result.degraded, vec![1]);
        assert!(result.possibly_incomplete());
    }

    #[test]
    fn test_exclude_failed_skips_failures() {
        let result = CommonAddressResolver::new(IntersectionPolicy::ExcludeFailed).resolve(&[
            analyzed(&["0xa", "0xb"]),
            failed(),
            analyzed(&["0xb"]),
        ]);

        assert_eq!(strings(&result), vec!["0xb"]);
        assert_eq!(result.degraded, vec![1]);
    }

    #[test]
    fn test_exclude_failed_with_all_failed_is_empty() {
        let result =
            CommonAddressResolver::new(IntersectionPolicy::ExcludeFailed).resolve(&[failed(), failed()]);
        assert!(result.is_empty());
        assert_eq!(result.degraded, vec![0, 1]);
    }

    #[test]
    fn test_unclassified_counterparties_mark_result_incomplete() {
        let result = CommonAddressResolver::default().resolve(&[
            analyzed_with_unclassified(&["0xa"], 1),
            analyzed(&["0xa"]),
            failed(),
        ]);

        assert_eq!(result.partially_classified, vec![0]);
        assert_eq!(result.degraded, vec![2]);
        assert!(result.possibly_incomplete());

        let clean = CommonAddressResolver::default().resolve(&[analyzed(&["0xa"])]);
        assert!(clean.partially_classified.is_empty());
        assert!(!clean.possibly_incomplete());
    }
}
