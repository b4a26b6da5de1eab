// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Etherscan-family HTTP provider
//!
//! Endpoints used:
//!
//! - `module=account&action=tokentx` for transfer records, first page of
//!   [`MAX_RECORDS_PER_QUERY`] records (the explorer's result window)
//! - `module=proxy&action=eth_getCode` for bytecode
//! - `module=token&action=tokeninfo` for the token symbol
//!
//! Every reply is an envelope `{status, message, result}`. `eth_getCode` is a
//! JSON-RPC passthrough and carries no status; rate-limit rejections arrive as
//! a plain-text `result` instead of hex, which is reported as a status failure.

use alloy_primitives::BlockNumber;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{ChainDataProvider, ExplorerConfig, ExplorerEnvelope, RawTransfer, TokenInfo};
use crate::config::constants::explorer::{MAX_RECORDS_PER_QUERY, NO_TRANSACTIONS_FOUND, STATUS_OK};
use crate::errors::ProviderError;
use crate::types::address::NormalizedAddress;

/// Envelope as it comes off the wire, before the result is interpreted
#[derive(Debug, Default, Deserialize)]
struct WireEnvelope {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<Value>,
}

impl WireEnvelope {
    fn status(&self) -> &str {
        self.status.as_deref().unwrap_or_default()
    }

    /// Provider message, with a textual `result` appended when present
    fn detail(&self) -> String {
        let message = self.message.as_deref().unwrap_or_default();
        match &self.result {
            Value::String(text) if !text.is_empty() => format!("{message}: {text}"),
            _ => message.to_string(),
        }
    }
}

/// `tokeninfo` answers with an object on some explorers and a one-element list on others
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    fn into_first(self) -> Option<T> {
        match self {
            OneOrMany::One(item) => Some(item),
            OneOrMany::Many(items) => items.into_iter().next(),
        }
    }
}

/// [`ChainDataProvider`] backed by an Etherscan-family REST API
#[derive(Debug, Clone)]
pub struct ExplorerClient {
    http: reqwest::Client,
    config: ExplorerConfig,
}

impl ExplorerClient {
    /// Create a client for the configured endpoint
    pub fn new(config: ExplorerConfig) -> Result<Self, ProviderError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.http_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ProviderError::transport("build HTTP client", e))?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    async fn query(
        &self,
        operation: &str,
        params: &[(&str, &str)],
    ) -> Result<WireEnvelope, ProviderError> {
        debug!(operation, url = %self.config.base_url, "Explorer request");

        let response = self
            .http
            .get(self.config.base_url.clone())
            .query(params)
            .query(&[("apikey", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(|e| self.request_error(operation, e))?
            .error_for_status()
            .map_err(|e| ProviderError::transport(operation, e))?;

        response
            .json::<WireEnvelope>()
            .await
            .map_err(|e| ProviderError::malformed(operation, e.to_string()))
    }

    fn request_error(&self, operation: &str, error: reqwest::Error) -> ProviderError {
        match self.config.http_timeout {
            Some(after) if error.is_timeout() => ProviderError::timeout(operation, after),
            _ => ProviderError::transport(operation, error),
        }
    }
}

#[async_trait]
impl ChainDataProvider for ExplorerClient {
    async fn get_token_transfers(
        &self,
        contract: &NormalizedAddress,
        start_block: BlockNumber,
        end_block: BlockNumber,
    ) -> Result<ExplorerEnvelope<Vec<RawTransfer>>, ProviderError> {
        let operation = format!("tokentx {start_block}-{end_block}");
        let start = start_block.to_string();
        let end = end_block.to_string();
        let offset = MAX_RECORDS_PER_QUERY.to_string();
        let wire = self
            .query(
                &operation,
                &[
                    ("module", "account"),
                    ("action", "tokentx"),
                    ("contractaddress", contract.as_str()),
                    ("startblock", &start),
                    ("endblock", &end),
                    ("page", "1"),
                    ("offset", &offset),
                    ("sort", "asc"),
                ],
            )
            .await?;

        transfers_from_wire(&operation, wire)
    }

    async fn get_code(&self, address: &NormalizedAddress) -> Result<String, ProviderError> {
        let wire = self
            .query(
                "eth_getCode",
                &[
                    ("module", "proxy"),
                    ("action", "eth_getCode"),
                    ("address", address.as_str()),
                    ("tag", "latest"),
                ],
            )
            .await?;

        code_from_wire("eth_getCode", wire)
    }

    async fn get_token_symbol(
        &self,
        contract: &NormalizedAddress,
    ) -> Result<ExplorerEnvelope<Option<TokenInfo>>, ProviderError> {
        let wire = self
            .query(
                "tokeninfo",
                &[
                    ("module", "token"),
                    ("action", "tokeninfo"),
                    ("contractaddress", contract.as_str()),
                ],
            )
            .await?;

        symbol_from_wire("tokeninfo", wire)
    }
}

fn transfers_from_wire(
    operation: &str,
    wire: WireEnvelope,
) -> Result<ExplorerEnvelope<Vec<RawTransfer>>, ProviderError> {
    if wire.status() == STATUS_OK {
        let result = serde_json::from_value(wire.result)
            .map_err(|e| ProviderError::malformed(operation, e.to_string()))?;
        return Ok(ExplorerEnvelope {
            status: STATUS_OK.to_string(),
            message: wire.message.unwrap_or_default(),
            result,
        });
    }

    // An empty range is reported as a failure status; it is not one
    if wire.message.as_deref() == Some(NO_TRANSACTIONS_FOUND) {
        return Ok(ExplorerEnvelope::ok(Vec::new()));
    }

    Ok(ExplorerEnvelope::failed(wire.status(), wire.detail()))
}

fn code_from_wire(operation: &str, wire: WireEnvelope) -> Result<String, ProviderError> {
    if let Some(error) = wire.error {
        return Err(ProviderError::status(operation, error.to_string()));
    }

    match wire.result {
        Value::String(code) if is_hex(&code) => Ok(code),
        Value::String(text) => Err(ProviderError::status(operation, text)),
        other => Err(ProviderError::malformed(
            operation,
            format!("expected hex string result, got {other}"),
        )),
    }
}

fn symbol_from_wire(
    operation: &str,
    wire: WireEnvelope,
) -> Result<ExplorerEnvelope<Option<TokenInfo>>, ProviderError> {
    if wire.status() != STATUS_OK {
        return Ok(ExplorerEnvelope::failed(wire.status(), wire.detail()));
    }

    let info = serde_json::from_value::<OneOrMany<TokenInfo>>(wire.result)
        .map_err(|e| ProviderError::malformed(operation, e.to_string()))?
        .into_first();

    Ok(ExplorerEnvelope {
        status: STATUS_OK.to_string(),
        message: wire.message.unwrap_or_default(),
        result: info,
    })
}

fn is_hex(value: &str) -> bool {
    value
        .strip_prefix("0x")
        .is_some_and(|digits| digits.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire(json: &str) -> WireEnvelope {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_transfers_success() {
        let envelope = transfers_from_wire(
            "tokentx",
            wire(
                r#"{"status":"1","message":"OK","result":[
                    {"from":"0xa","to":"0xb","blockNumber":"10","timeStamp":"1700000000","value":"1"}
                ]}"#,
            ),
        )
        .unwrap();

        assert!(envelope.is_ok());
        assert_eq!(envelope.result.len(), 1);
        assert_eq!(envelope.result[0].block_number, "10");
    }

    #[test]
    fn test_transfers_failure_keeps_provider_message() {
        let envelope = transfers_from_wire(
            "tokentx",
            wire(r#"{"status":"0","message":"NOTOK","result":"Max rate limit reached"}"#),
        )
        .unwrap();

        assert!(!envelope.is_ok());
        assert!(envelope.result.is_empty());
        assert_eq!(envelope.message, "NOTOK: Max rate limit reached");
    }

    #[test]
    fn test_transfers_empty_range_is_success() {
        let envelope = transfers_from_wire(
            "tokentx",
            wire(r#"{"status":"0","message":"No transactions found","result":[]}"#),
        )
        .unwrap();

        assert!(envelope.is_ok());
        assert!(envelope.result.is_empty());
    }

    #[test]
    fn test_transfers_malformed_records() {
        let err = transfers_from_wire(
            "tokentx",
            wire(r#"{"status":"1","message":"OK","result":[{"from":1}]}"#),
        )
        .unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse { .. }));
    }

    #[test]
    fn test_code_results() {
        assert_eq!(
            code_from_wire("eth_getCode", wire(r#"{"jsonrpc":"2.0","id":1,"result":"0x"}"#))
                .unwrap(),
            "0x"
        );
        assert_eq!(
            code_from_wire(
                "eth_getCode",
                wire(r#"{"jsonrpc":"2.0","id":1,"result":"0x6080604052"}"#)
            )
            .unwrap(),
            "0x6080604052"
        );
    }

    #[test]
    fn test_code_rate_limit_text_is_status_error() {
        let err = code_from_wire(
            "eth_getCode",
            wire(r#"{"status":"0","message":"NOTOK","result":"Max rate limit reached"}"#),
        )
        .unwrap_err();
        assert!(err.is_status());
    }

    #[test]
    fn test_code_rpc_error() {
        let err = code_from_wire(
            "eth_getCode",
            wire(r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"bad"}}"#),
        )
        .unwrap_err();
        assert!(err.is_status());
    }

    #[test]
    fn test_symbol_object_and_list() {
        let object = symbol_from_wire(
            "tokeninfo",
            wire(r#"{"status":"1","message":"OK","result":{"tokenSymbol":"DEGEN"}}"#),
        )
        .unwrap();
        assert_eq!(object.result.unwrap().token_symbol, "DEGEN");

        let list = symbol_from_wire(
            "tokeninfo",
            wire(r#"{"status":"1","message":"OK","result":[{"tokenSymbol":"BRETT"}]}"#),
        )
        .unwrap();
        assert_eq!(list.result.unwrap().token_symbol, "BRETT");
    }

    #[test]
    fn test_symbol_failure_status() {
        let envelope = symbol_from_wire(
            "tokeninfo",
            wire(r#"{"status":"0","message":"NOTOK","result":"Invalid API Key"}"#),
        )
        .unwrap();
        assert!(!envelope.is_ok());
        assert!(envelope.result.is_none());
    }

    #[test]
    fn test_is_hex() {
        assert!(is_hex("0x"));
        assert!(is_hex("0xdeadBEEF"));
        assert!(!is_hex("Max rate limit reached"));
        assert!(!is_hex("0xzz"));
    }
}
