// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Multi-contract analysis
//!
//! - [`ContractAnalyzer`]: fetches and classifies one registration's data
//! - [`AnalysisSession`]: registrations, windows, runs and result pages
//! - [`CommonAddressResolver`]: intersection of wallet sets
//! - [`AnalysisObserver`] / [`CancellationFlag`]: progress and interruption

pub mod analyzer;
pub mod progress;
pub mod registration;
pub mod resolver;
pub mod session;

pub use analyzer::{ContractAnalyzer, WINDOW_NOT_SET};
pub use progress::{AnalysisEvent, AnalysisObserver, CancellationFlag, NoopObserver};
pub use registration::{ContractRegistration, RegistrationAnalysis, RegistrationStatus};
pub use resolver::{intersect_all, CommonAddressResolver, CommonAddresses, IntersectionPolicy};
pub use session::AnalysisSession;
