//! Status codes reported by nodes in precheck and receipt responses.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status code carried in precheck and receipt responses.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
pub enum Status {
    Ok,
    InvalidTransaction,
    PayerAccountNotFound,
    InvalidNodeAccount,
    TransactionExpired,
    InvalidTransactionStart,
    InvalidTransactionDuration,
    InvalidSignature,
    MemoTooLong,
    InsufficientTxFee,
    InsufficientPayerBalance,
    DuplicateTransaction,
    Busy,
    NotSupported,
    InvalidFileId,
    InvalidTopicId,
    InvalidChunkNumber,
    InvalidChunkTransactionId,
    ReceiptNotFound,
    Unknown,
    Success,
    FailInvalid,
    PlatformTransactionNotCreated,
    PlatformNotActive,
}

impl Status {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::InvalidTransaction => "INVALID_TRANSACTION",
            Self::PayerAccountNotFound => "PAYER_ACCOUNT_NOT_FOUND",
            Self::InvalidNodeAccount => "INVALID_NODE_ACCOUNT",
            Self::TransactionExpired => "TRANSACTION_EXPIRED",
            Self::InvalidTransactionStart => "INVALID_TRANSACTION_START",
            Self::InvalidTransactionDuration => "INVALID_TRANSACTION_DURATION",
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::MemoTooLong => "MEMO_TOO_LONG",
            Self::InsufficientTxFee => "INSUFFICIENT_TX_FEE",
            Self::InsufficientPayerBalance => "INSUFFICIENT_PAYER_BALANCE",
            Self::DuplicateTransaction => "DUPLICATE_TRANSACTION",
            Self::Busy => "BUSY",
            Self::NotSupported => "NOT_SUPPORTED",
            Self::InvalidFileId => "INVALID_FILE_ID",
            Self::InvalidTopicId => "INVALID_TOPIC_ID",
            Self::InvalidChunkNumber => "INVALID_CHUNK_NUMBER",
            Self::InvalidChunkTransactionId => "INVALID_CHUNK_TRANSACTION_ID",
            Self::ReceiptNotFound => "RECEIPT_NOT_FOUND",
            Self::Unknown => "UNKNOWN",
            Self::Success => "SUCCESS",
            Self::FailInvalid => "FAIL_INVALID",
            Self::PlatformTransactionNotCreated => "PLATFORM_TRANSACTION_NOT_CREATED",
            Self::PlatformNotActive => "PLATFORM_NOT_ACTIVE",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
