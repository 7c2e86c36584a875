//! Concrete request kinds carried inside a `TransactionBody`.

use crate::domain::transaction::body::TransactionData;
use crate::foundation::{AccountId, TransactionId, DEFAULT_FILE_APPEND_CHUNK_SIZE, DEFAULT_TOPIC_MESSAGE_CHUNK_SIZE};
use serde::{Deserialize, Serialize};

/// Moves value between accounts. Amounts must sum to zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferData {
    pub transfers: Vec<AccountAmount>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAmount {
    pub account_id: AccountId,
    pub amount: i64,
}

impl TransferData {
    pub fn add_transfer(&mut self, account_id: AccountId, amount: i64) {
        match self.transfers.iter_mut().find(|entry| entry.account_id == account_id) {
            Some(entry) => entry.amount = entry.amount.saturating_add(amount),
            None => self.transfers.push(AccountAmount { account_id, amount }),
        }
    }

    pub fn is_balanced(&self) -> bool {
        self.transfers.iter().map(|entry| i128::from(entry.amount)).sum::<i128>() == 0
    }
}

impl TransactionData for TransferData {
    const KIND: &'static str = "transfer";
}

/// Payload kinds that can be split across several sequential requests.
pub trait ChunkData: TransactionData {
    const DEFAULT_CHUNK_SIZE: usize;

    fn contents(&self) -> &[u8];

    /// Replaces the payload carried by this copy of the request.
    fn set_contents(&mut self, contents: Vec<u8>);

    /// Called on each chunk copy before it is frozen. `number` is 1-based.
    fn on_chunk(&mut self, _initial_transaction_id: TransactionId, _number: u32, _total: u32) {}
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAppendData {
    pub file_id: Option<AccountId>,
    pub contents: Vec<u8>,
}

impl TransactionData for FileAppendData {
    const KIND: &'static str = "file_append";
}

impl ChunkData for FileAppendData {
    const DEFAULT_CHUNK_SIZE: usize = DEFAULT_FILE_APPEND_CHUNK_SIZE;

    fn contents(&self) -> &[u8] {
        &self.contents
    }

    fn set_contents(&mut self, contents: Vec<u8>) {
        self.contents = contents;
    }
}

/// Position of one message chunk within the whole message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkInfo {
    pub initial_transaction_id: TransactionId,
    pub number: u32,
    pub total: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicMessageData {
    pub topic_id: Option<AccountId>,
    pub message: Vec<u8>,
    pub chunk_info: Option<ChunkInfo>,
}

impl TransactionData for TopicMessageData {
    const KIND: &'static str = "topic_message";
}

impl ChunkData for TopicMessageData {
    const DEFAULT_CHUNK_SIZE: usize = DEFAULT_TOPIC_MESSAGE_CHUNK_SIZE;

    fn contents(&self) -> &[u8] {
        &self.message
    }

    fn set_contents(&mut self, contents: Vec<u8>) {
        self.message = contents;
    }

    fn on_chunk(&mut self, initial_transaction_id: TransactionId, number: u32, total: u32) {
        self.chunk_info = Some(ChunkInfo { initial_transaction_id, number, total });
    }
}
