// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Transfer retrieval for a contract and time window
//!
//! The fetcher converts the window to a block range, requests transfers in
//! chunks of at most [`MaxBlockRange`] blocks, re-filters the replies to the
//! exact inclusive range and normalizes every record.
//!
//! # Record cap
//!
//! Explorers return at most [`MAX_RECORDS_PER_QUERY`] records per query and
//! drop the rest without saying so. A reply that reaches the cap is discarded
//! and its chunk is split in two halves that are requested again. A single
//! block that still reaches the cap cannot be split and degrades the fetch.
//!
//! # Degraded continue
//!
//! A provider failure does not surface as `Err`: the outcome carries an empty
//! transaction list and the failure in [`FetchOutcome::error`], so the caller
//! can keep analyzing the other registrations. Only malformed calendar input
//! (rejected before any provider call) is returned as `Err`.

use std::sync::Arc;

use tracing::{debug, warn, Instrument};

use crate::blocks::{BlockRange, BlockTimeConverter, TimeWindow};
use crate::config::constants::explorer::MAX_RECORDS_PER_QUERY;
use crate::config_types::MaxBlockRange;
use crate::errors::{ProviderError, TimeError};
use crate::events::transaction::Transaction;
use crate::provider::{ChainDataProvider, RawTransfer};
use crate::tracing::spans;
use crate::types::address::NormalizedAddress;
use crate::types::tokens::TokenDecimals;

/// Result of fetching one contract's transfers
#[derive(Debug)]
pub struct FetchOutcome {
    /// Block range that was queried
    pub range: BlockRange,
    /// Normalized transfers within `range`, in provider order
    pub transactions: Vec<Transaction>,
    /// Provider failure that emptied `transactions`, if any
    pub error: Option<ProviderError>,
    /// Records discarded because they fell outside `range`
    pub out_of_range: usize,
    /// Records discarded because a numeric field did not parse
    pub malformed: usize,
    /// Chunks split because their reply reached the record cap
    pub splits: usize,
}

impl FetchOutcome {
    fn empty(range: BlockRange) -> Self {
        Self {
            range,
            transactions: Vec::new(),
            error: None,
            out_of_range: 0,
            malformed: 0,
            splits: 0,
        }
    }

    /// Returns true when a provider failure emptied the result
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// Retrieves and normalizes token transfers
pub struct TransactionFetcher<P: ?Sized> {
    provider: Arc<P>,
    clock: Arc<dyn BlockTimeConverter>,
    max_block_range: MaxBlockRange,
    decimals: TokenDecimals,
}

impl<P: ChainDataProvider + ?Sized> TransactionFetcher<P> {
    pub fn new(provider: Arc<P>, clock: Arc<dyn BlockTimeConverter>) -> Self {
        Self {
            provider,
            clock,
            max_block_range: MaxBlockRange::DEFAULT,
            decimals: TokenDecimals::STANDARD,
        }
    }

    /// Set the maximum block span per provider request
    pub fn with_max_block_range(mut self, max_block_range: MaxBlockRange) -> Self {
        self.max_block_range = max_block_range;
        self
    }

    /// Set the decimals used to scale transfer values
    pub fn with_decimals(mut self, decimals: TokenDecimals) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn clock(&self) -> &dyn BlockTimeConverter {
        self.clock.as_ref()
    }

    /// Fetches transfers of `contract` between two `YYYY-MM-DD HH:MM:SS` bounds
    ///
    /// # Errors
    ///
    /// Returns [`TimeError`] for malformed or unusable bounds. No provider call
    /// is made in that case.
    pub async fn fetch(
        &self,
        contract: &NormalizedAddress,
        start_time: &str,
        end_time: &str,
    ) -> Result<FetchOutcome, TimeError> {
        let window = TimeWindow::parse(start_time, end_time)?;
        self.fetch_window(contract, &window).await
    }

    /// Fetches transfers of `contract` within a parsed window
    pub async fn fetch_window(
        &self,
        contract: &NormalizedAddress,
        window: &TimeWindow,
    ) -> Result<FetchOutcome, TimeError> {
        let range = window.to_block_range(self.clock.as_ref())?;
        Ok(self.fetch_range(contract, range).await)
    }

    /// Fetches transfers of `contract` within an inclusive block range
    pub async fn fetch_range(&self, contract: &NormalizedAddress, range: BlockRange) -> FetchOutcome {
        self.fetch_range_inner(contract, range)
            .instrument(spans::fetch_transactions(
                contract,
                range.start_block,
                range.end_block,
            ))
            .await
    }

    async fn fetch_range_inner(&self, contract: &NormalizedAddress, range: BlockRange) -> FetchOutcome {
        let mut outcome = FetchOutcome::empty(range);

        debug!(
            num_chunks = self
                .max_block_range
                .chunks_needed(range.start_block, range.end_block),
            "Starting chunked transfer fetch"
        );

        // Popped from the back, so the lowest chunk is requested first
        let mut pending: Vec<BlockRange> = self
            .max_block_range
            .chunk_range(range.start_block, range.end_block)
            .map(|(start_block, end_block)| BlockRange {
                start_block,
                end_block,
            })
            .collect();
        pending.reverse();

        while let Some(chunk) = pending.pop() {
            let error = match self.fetch_chunk(contract, chunk).await {
                Ok(records) if records.len() < MAX_RECORDS_PER_QUERY => {
                    self.absorb(&mut outcome, chunk, records);
                    continue;
                }
                Ok(records) if chunk.start_block < chunk.end_block => {
                    let mid = chunk.start_block + (chunk.end_block - chunk.start_block) / 2;
                    debug!(
                        chunk_start = chunk.start_block,
                        chunk_end = chunk.end_block,
                        records = records.len(),
                        "Reply reached the record cap, splitting chunk"
                    );
                    outcome.splits += 1;
                    pending.push(BlockRange {
                        start_block: mid + 1,
                        end_block: chunk.end_block,
                    });
                    pending.push(BlockRange {
                        start_block: chunk.start_block,
                        end_block: mid,
                    });
                    continue;
                }
                Ok(records) => ProviderError::status(
                    format!("tokentx {}-{}", chunk.start_block, chunk.end_block),
                    format!(
                        "block {} has at least {} transfers, more than one query can return",
                        chunk.start_block,
                        records.len()
                    ),
                ),
                Err(error) => error,
            };

            warn!(
                contract = %contract,
                chunk_start = chunk.start_block,
                chunk_end = chunk.end_block,
                error = %error,
                "Transfer fetch failed, continuing with no data for this contract"
            );
            outcome.transactions.clear();
            outcome.error = Some(error);
            return outcome;
        }

        if outcome.out_of_range > 0 {
            debug!(dropped = outcome.out_of_range, "Discarded records outside the block range");
        }
        debug!(
            total = outcome.transactions.len(),
            splits = outcome.splits,
            "Finished chunked transfer fetch"
        );

        outcome
    }

    async fn fetch_chunk(
        &self,
        contract: &NormalizedAddress,
        chunk: BlockRange,
    ) -> Result<Vec<RawTransfer>, ProviderError> {
        let BlockRange {
            start_block: chunk_start,
            end_block: chunk_end,
        } = chunk;
        let envelope = self
            .provider
            .get_token_transfers(contract, chunk_start, chunk_end)
            .await?;

        if !envelope.is_ok() {
            return Err(ProviderError::status(
                format!("tokentx {chunk_start}-{chunk_end}"),
                envelope.message,
            ));
        }

        debug!(chunk_start, chunk_end, records = envelope.result.len(), "Fetched transfers for chunk");
        Ok(envelope.result)
    }

    /// Keeps the records of `chunk`; providers may answer with a superset
    fn absorb(&self, outcome: &mut FetchOutcome, chunk: BlockRange, records: Vec<RawTransfer>) {
        for record in records {
            match Transaction::from_raw(&record, self.decimals) {
                Ok(tx) if chunk.contains(tx.block_number) => outcome.transactions.push(tx),
                Ok(_) => outcome.out_of_range += 1,
                Err(error) => {
                    warn!(error = %error, "Dropping malformed transfer record");
                    outcome.malformed += 1;
                }
            }
        }
    }
}
