//! Response payloads exchanged with nodes and returned to callers.

use crate::domain::status::Status;
use crate::foundation::{AccountId, TransactionHash, TransactionId};
use serde::{Deserialize, Serialize};

/// Synchronous answer to a submitted request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecheckResponse {
    pub status: Status,
    pub cost: u64,
}

impl PrecheckResponse {
    pub const fn new(status: Status) -> Self {
        Self { status, cost: 0 }
    }
}

/// Consensus outcome of a request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub status: Status,
    pub transaction_id: Option<TransactionId>,
    pub file_id: Option<AccountId>,
    pub topic_id: Option<AccountId>,
    pub topic_sequence_number: u64,
}

impl TransactionReceipt {
    pub fn with_status(status: Status) -> Self {
        Self { status, transaction_id: None, file_id: None, topic_id: None, topic_sequence_number: 0 }
    }
}

/// Answer to a receipt query: the node's header status plus the receipt once known.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptResponse {
    pub header_status: Status,
    pub receipt: Option<TransactionReceipt>,
}

/// What a successful submission hands back to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionResponse {
    /// Node that accepted the request.
    pub node_id: AccountId,
    pub transaction_id: TransactionId,
    pub hash: TransactionHash,
    /// When set, `get_receipt` fails on any receipt status other than `SUCCESS`.
    pub validate_status: bool,
}
