//! Requests whose payload is split across several sequential submissions.

use crate::application::client::Client;
use crate::application::transaction::Transaction;
use crate::domain::response::TransactionResponse;
use crate::domain::transaction::ChunkData;
use crate::foundation::{LedgerError, TransactionId, DEFAULT_MAX_CHUNKS};
use log::{debug, info};
use std::time::Duration;

/// Wraps a [`Transaction`] whose payload may exceed one chunk.
///
/// Each chunk is a clone of the wrapped request carrying its slice of the
/// payload. Chunk `i > 0` gets the first chunk's request id with the valid
/// start moved forward by `i` nanoseconds.
#[derive(Clone, Debug)]
pub struct ChunkedTransaction<D: ChunkData> {
    transaction: Transaction<D>,
    chunk_size: usize,
    max_chunks: u32,
    should_get_receipt: bool,
}

impl<D: ChunkData + Default> Default for ChunkedTransaction<D> {
    fn default() -> Self {
        Self::new(D::default())
    }
}

impl<D: ChunkData> ChunkedTransaction<D> {
    pub fn new(data: D) -> Self {
        Self { transaction: Transaction::new(data), chunk_size: D::DEFAULT_CHUNK_SIZE, max_chunks: DEFAULT_MAX_CHUNKS, should_get_receipt: false }
    }

    pub fn transaction(&self) -> &Transaction<D> {
        &self.transaction
    }

    /// Common request fields (memo, fee, node list, ...).
    pub fn transaction_mut(&mut self) -> &mut Transaction<D> {
        &mut self.transaction
    }

    pub fn data(&self) -> &[u8] {
        self.transaction.data().contents()
    }

    pub fn set_data(&mut self, data: impl Into<Vec<u8>>) -> Result<&mut Self, LedgerError> {
        self.transaction.data_mut()?.set_contents(data.into());
        Ok(self)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn set_chunk_size(&mut self, chunk_size: usize) -> Result<&mut Self, LedgerError> {
        self.require_not_frozen()?;
        if chunk_size == 0 {
            return Err(LedgerError::InvalidArgument("chunk size must be positive".to_string()));
        }
        self.chunk_size = chunk_size;
        Ok(self)
    }

    pub fn max_chunks(&self) -> u32 {
        self.max_chunks
    }

    pub fn set_max_chunks(&mut self, max_chunks: u32) -> Result<&mut Self, LedgerError> {
        self.require_not_frozen()?;
        self.max_chunks = max_chunks;
        Ok(self)
    }

    /// Wait for each chunk's receipt before sending the next one.
    pub fn set_should_get_receipt(&mut self, should_get_receipt: bool) -> &mut Self {
        self.should_get_receipt = should_get_receipt;
        self
    }

    /// Chunks needed for the current payload. An empty payload still sends one.
    pub fn required_chunks(&self) -> usize {
        self.data().len().div_ceil(self.chunk_size).max(1)
    }

    pub fn execute_all(&mut self, client: &Client) -> Result<Vec<TransactionResponse>, LedgerError> {
        self.execute_all_with_timeout(client, client.request_timeout())
    }

    /// Submits every chunk in order and returns one response per chunk.
    pub fn execute_all_with_timeout(&mut self, client: &Client, timeout: Duration) -> Result<Vec<TransactionResponse>, LedgerError> {
        let total = self.required_chunks();
        if total > self.max_chunks as usize {
            return Err(LedgerError::illegal_state(format!(
                "cannot execute chunked transaction with more than {} chunks; requires {} but is only allotted {}",
                self.max_chunks, total, self.max_chunks
            )));
        }
        let total_u32 = u32::try_from(total).map_err(|_| LedgerError::illegal_state("chunk count overflow"))?;

        let contents = self.data().to_vec();
        let mut initial_id: Option<TransactionId> = None;
        let mut responses = Vec::with_capacity(total);
        info!("chunked execute start kind={} bytes={} chunks={}", D::KIND, contents.len(), total);

        for (index, number) in (0..total).zip(1..=total_u32) {
            let start = index * self.chunk_size;
            let end = (start + self.chunk_size).min(contents.len());

            let mut chunk = self.transaction.clone();
            chunk.data_mut()?.set_contents(contents.get(start..end).unwrap_or_default().to_vec());

            if let Some(initial) = initial_id {
                let valid_start = initial.valid_start.plus_nanos(index as u64);
                chunk.set_transaction_id(TransactionId::with_valid_start(initial.account_id, valid_start))?;
            } else if chunk.transaction_id().is_none() {
                let operator = client
                    .operator_account_id()
                    .ok_or_else(|| LedgerError::uninitialized("transaction id not set and client has no operator"))?;
                chunk.set_transaction_id(TransactionId::generate(operator))?;
            }
            let chunk_id = chunk.transaction_id().ok_or_else(|| LedgerError::illegal_state("chunk has no transaction id"))?;
            let initial = *initial_id.get_or_insert(chunk_id);

            chunk.data_mut()?.on_chunk(initial, number, total_u32);
            chunk.freeze_with(client)?;

            debug!("chunk submit kind={} number={} total={} transaction_id={}", D::KIND, number, total, chunk_id);
            let response = chunk.execute_with_timeout(client, timeout)?;
            if self.should_get_receipt {
                response.get_receipt_with_timeout(client, timeout)?;
            }
            responses.push(response);
        }
        Ok(responses)
    }

    /// Submits every chunk and returns the first chunk's response.
    pub fn execute(&mut self, client: &Client) -> Result<TransactionResponse, LedgerError> {
        self.execute_all(client)?
            .into_iter()
            .next()
            .ok_or_else(|| LedgerError::illegal_state("chunked execution produced no responses"))
    }

    fn require_not_frozen(&self) -> Result<(), LedgerError> {
        if self.transaction.is_frozen() {
            return Err(LedgerError::illegal_state("chunked transaction is frozen"));
        }
        Ok(())
    }
}
