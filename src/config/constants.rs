// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Well-known chain timings, limits and endpoints
//!
//! This module centralizes magic constants used throughout the commonscan crate.

/// Chain timing calibrations for the linear block clock
pub mod timing {
    /// Unix timestamp of Base block 0 (2023-06-15T00:35:47Z)
    pub const BASE_GENESIS_TIMESTAMP: i64 = 1_686_789_347;

    /// Average Base block interval in seconds
    pub const BASE_BLOCK_INTERVAL_SECS: u64 = 2;
}

/// Session limits
pub mod limits {
    /// Maximum contract registrations per session
    pub const MAX_REGISTRATIONS: usize = 4;

    /// Concurrent `eth_getCode` lookups per registration
    pub const CLASSIFY_CONCURRENCY: usize = 4;

    /// Requests per second allowed by the free explorer API tier
    pub const FREE_TIER_REQUESTS_PER_SECOND: u32 = 5;
}

/// Explorer API endpoints and sentinels
pub mod explorer {
    /// BaseScan API endpoint
    pub const BASESCAN_API_URL: &str = "https://api.basescan.org/api";

    /// `eth_getCode` result for addresses without deployed bytecode
    pub const EMPTY_CODE: &str = "0x";

    /// Envelope status for a successful explorer response
    pub const STATUS_OK: &str = "1";

    /// Message sent with status `"0"` when a `tokentx` range simply has no records
    pub const NO_TRANSACTIONS_FOUND: &str = "No transactions found";

    /// Most records a single `tokentx` query returns; `page * offset` may not exceed it
    pub const MAX_RECORDS_PER_QUERY: usize = 10_000;
}

/// Public explorers linked from rendered reports
pub mod links {
    /// DexScreener trader view: `/<chain>/<pair>?maker=<wallet>`
    pub const DEXSCREENER_URL: &str = "https://dexscreener.com";

    /// Debank wallet profile: `/profile/<wallet>`
    pub const DEBANK_PROFILE_URL: &str = "https://debank.com/profile";

    /// BaseScan address page: `/address/<wallet>`
    pub const BASESCAN_ADDRESS_URL: &str = "https://basescan.org/address";
}
