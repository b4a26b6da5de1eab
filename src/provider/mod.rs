// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Chain data provider abstraction
//!
//! The analysis engine never talks to an HTTP endpoint directly. Everything it
//! needs from the chain goes through [`ChainDataProvider`]:
//!
//! - [`ChainDataProvider::get_token_transfers`] - token transfer records of a contract
//!   within an inclusive block range
//! - [`ChainDataProvider::get_code`] - deployed bytecode at an address
//! - [`ChainDataProvider::get_token_symbol`] - token metadata used for display names
//!
//! [`ExplorerClient`] implements the trait against an Etherscan-family API
//! (BaseScan by default). Tests and alternative backends implement it directly.
//!
//! # Middleware
//!
//! Rate limiting, per-call timeouts and call logging are applied by wrapping a
//! provider in the `tower` layers from [`crate::transport`]:
//!
//! ```rust,ignore
//! use commonscan::provider::{ExplorerClient, ExplorerConfig};
//! use commonscan::transport::{RateLimitLayer, TimeoutLayer};
//! use std::time::Duration;
//! use tower::ServiceBuilder;
//!
//! let client = ExplorerClient::new(ExplorerConfig::basescan(api_key)?)?;
//! let provider = ServiceBuilder::new()
//!     .layer(RateLimitLayer::per_second(5))
//!     .layer(TimeoutLayer::new(Duration::from_secs(30)))
//!     .service(client);
//! ```

mod config;
mod explorer;

pub use config::ExplorerConfig;
pub use explorer::ExplorerClient;

use std::sync::Arc;

use alloy_primitives::BlockNumber;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::constants::explorer::STATUS_OK;
use crate::errors::ProviderError;
use crate::types::address::NormalizedAddress;

/// Provider reply carrying its own success status
///
/// Explorer APIs answer HTTP 200 even when the request failed; the failure is
/// signalled by `status != "1"` with a human-readable `message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorerEnvelope<T> {
    /// `"1"` on success
    pub status: String,
    /// Provider message (`"OK"`, `"NOTOK"`, rate-limit text, ...)
    pub message: String,
    /// Payload; empty when the status is not a success
    pub result: T,
}

impl<T> ExplorerEnvelope<T> {
    /// Successful reply wrapping `result`
    pub fn ok(result: T) -> Self {
        Self {
            status: STATUS_OK.to_string(),
            message: "OK".to_string(),
            result,
        }
    }

    /// Returns true when the provider reported success
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

impl<T: Default> ExplorerEnvelope<T> {
    /// Failed reply with the provider's status and message and an empty payload
    pub fn failed(status: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            message: message.into(),
            result: T::default(),
        }
    }
}

/// Token transfer record as returned by the provider
///
/// All numeric fields arrive as decimal strings and are parsed during
/// normalization (see [`crate::events::Transaction`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransfer {
    pub from: String,
    pub to: String,
    #[serde(rename = "blockNumber")]
    pub block_number: String,
    #[serde(rename = "timeStamp")]
    pub time_stamp: String,
    pub value: String,
}

/// Token metadata subset used for display names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    #[serde(rename = "tokenSymbol")]
    pub token_symbol: String,
}

/// Capability the analysis engine requires from the chain
///
/// Implementations must be safe to share across tasks: the classifier issues
/// `get_code` calls concurrently.
#[async_trait]
pub trait ChainDataProvider: Send + Sync {
    /// Transfer records of `contract` within `[start_block, end_block]`
    ///
    /// The provider may return records outside the range; callers re-filter.
    /// A non-success status is returned as data in the envelope; `Err` is
    /// reserved for failures to obtain a reply at all.
    async fn get_token_transfers(
        &self,
        contract: &NormalizedAddress,
        start_block: BlockNumber,
        end_block: BlockNumber,
    ) -> Result<ExplorerEnvelope<Vec<RawTransfer>>, ProviderError>;

    /// Hex-encoded bytecode deployed at `address`, `"0x"` when there is none
    async fn get_code(&self, address: &NormalizedAddress) -> Result<String, ProviderError>;

    /// Token metadata for `contract`
    async fn get_token_symbol(
        &self,
        contract: &NormalizedAddress,
    ) -> Result<ExplorerEnvelope<Option<TokenInfo>>, ProviderError>;
}

#[async_trait]
impl<P: ChainDataProvider + ?Sized> ChainDataProvider for Arc<P> {
    async fn get_token_transfers(
        &self,
        contract: &NormalizedAddress,
        start_block: BlockNumber,
        end_block: BlockNumber,
    ) -> Result<ExplorerEnvelope<Vec<RawTransfer>>, ProviderError> {
        (**self)
            .get_token_transfers(contract, start_block, end_block)
            .await
    }

    async fn get_code(&self, address: &NormalizedAddress) -> Result<String, ProviderError> {
        (**self).get_code(address).await
    }

    async fn get_token_symbol(
        &self,
        contract: &NormalizedAddress,
    ) -> Result<ExplorerEnvelope<Option<TokenInfo>>, ProviderError> {
        (**self).get_token_symbol(contract).await
    }
}
