// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Normalized token transfer records

use alloy_primitives::BlockNumber;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::blocks::UnixTimestamp;
use crate::errors::ProviderError;
use crate::provider::RawTransfer;
use crate::types::address::NormalizedAddress;
use crate::types::tokens::{TokenAmount, TokenDecimals};

/// A token transfer, normalized from provider data
///
/// Addresses are case-normalized, the value is scaled by the token's decimals
/// and the timestamp is rendered as `YYYY-MM-DD HH:MM:SS` (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub from_address: NormalizedAddress,
    pub to_address: NormalizedAddress,
    pub block_number: BlockNumber,
    pub raw_timestamp: UnixTimestamp,
    pub human_time: String,
    pub token_value: BigDecimal,
}

impl Transaction {
    /// Normalizes a provider record
    ///
    /// Fails with [`ProviderError::MalformedResponse`] when a numeric field
    /// does not parse as a base-10 integer.
    pub fn from_raw(raw: &RawTransfer, decimals: TokenDecimals) -> Result<Self, ProviderError> {
        let block_number = raw
            .block_number
            .trim()
            .parse::<BlockNumber>()
            .map_err(|_| malformed("blockNumber", &raw.block_number))?;
        let raw_timestamp = raw
            .time_stamp
            .trim()
            .parse::<i64>()
            .map(UnixTimestamp)
            .map_err(|_| malformed("timeStamp", &raw.time_stamp))?;
        let amount = TokenAmount::parse(&raw.value).ok_or_else(|| malformed("value", &raw.value))?;

        Ok(Self {
            from_address: NormalizedAddress::new(&raw.from),
            to_address: NormalizedAddress::new(&raw.to),
            block_number,
            human_time: raw_timestamp.human(),
            raw_timestamp,
            token_value: amount.normalize(decimals),
        })
    }

    /// Returns true when `address` is the sender or the receiver
    pub fn involves(&self, address: &NormalizedAddress) -> bool {
        &self.from_address == address || &self.to_address == address
    }
}

fn malformed(field: &str, value: &str) -> ProviderError {
    ProviderError::malformed("tokentx", format!("unparseable {field}: {value:?}"))
}
