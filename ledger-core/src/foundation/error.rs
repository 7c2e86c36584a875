use crate::foundation::status::Status;
use crate::foundation::TransactionId;
use secp256k1::Error as SecpError;
use std::io;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Precheck,
    ReceiptStatus,
    MaxAttemptsExceeded,
    IllegalState,
    Uninitialized,
    InvalidArgument,
    TransportError,
    SerializationError,
    EncodingError,
    CryptoError,
    KeyOperationFailed,
    UnsupportedSignatureScheme,
    ConfigError,
    ParseError,
    TaskFailed,
    Message,
}

#[derive(Debug, Error)]
pub enum LedgerError {
    // === Execution outcomes ===
    /// A node rejected the request during precheck. Never retried.
    #[error("precheck failed: status={status} transaction_id={}", display_tx_id(.transaction_id))]
    Precheck { status: Status, transaction_id: Option<TransactionId> },

    /// The receipt for a submitted request reported a non-success status.
    #[error("receipt status {status} for transaction_id={transaction_id}")]
    ReceiptStatus { status: Status, transaction_id: TransactionId },

    #[error("max number of attempts made (max attempts allowed: {max_attempts})")]
    MaxAttemptsExceeded { max_attempts: u32 },

    // === Caller misuse ===
    #[error("illegal state: {0}")]
    IllegalState(String),

    #[error("uninitialized: {0}")]
    Uninitialized(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    // === Collaborator failures ===
    #[error("transport error during {operation}: {details}")]
    TransportError { operation: String, details: String },

    #[error("{format} serialization error: {details}")]
    SerializationError { format: String, details: String },

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("crypto error during {operation}: {details}")]
    CryptoError { operation: String, details: String },

    #[error("key operation failed: {operation} on {key_ref} - {details}")]
    KeyOperationFailed { operation: String, key_ref: String, details: String },

    #[error("unsupported signature scheme: {scheme}")]
    UnsupportedSignatureScheme { scheme: String },

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("parse error: {0}")]
    ParseError(String),

    #[error("background execution failed: {0}")]
    TaskFailed(String),

    #[error("{0}")]
    Message(String),
}

fn display_tx_id(id: &Option<TransactionId>) -> String {
    id.as_ref().map(ToString::to_string).unwrap_or_else(|| "none".to_string())
}

pub type Result<T> = std::result::Result<T, LedgerError>;

impl LedgerError {
    pub fn code(&self) -> ErrorCode {
        match self {
            LedgerError::Precheck { .. } => ErrorCode::Precheck,
            LedgerError::ReceiptStatus { .. } => ErrorCode::ReceiptStatus,
            LedgerError::MaxAttemptsExceeded { .. } => ErrorCode::MaxAttemptsExceeded,
            LedgerError::IllegalState(_) => ErrorCode::IllegalState,
            LedgerError::Uninitialized(_) => ErrorCode::Uninitialized,
            LedgerError::InvalidArgument(_) => ErrorCode::InvalidArgument,
            LedgerError::TransportError { .. } => ErrorCode::TransportError,
            LedgerError::SerializationError { .. } => ErrorCode::SerializationError,
            LedgerError::EncodingError(_) => ErrorCode::EncodingError,
            LedgerError::CryptoError { .. } => ErrorCode::CryptoError,
            LedgerError::KeyOperationFailed { .. } => ErrorCode::KeyOperationFailed,
            LedgerError::UnsupportedSignatureScheme { .. } => ErrorCode::UnsupportedSignatureScheme,
            LedgerError::ConfigError(_) => ErrorCode::ConfigError,
            LedgerError::ParseError(_) => ErrorCode::ParseError,
            LedgerError::TaskFailed(_) => ErrorCode::TaskFailed,
            LedgerError::Message(_) => ErrorCode::Message,
        }
    }

    pub fn illegal_state(details: impl Into<String>) -> Self {
        LedgerError::IllegalState(details.into())
    }

    pub fn uninitialized(details: impl Into<String>) -> Self {
        LedgerError::Uninitialized(details.into())
    }

    pub fn key_operation_failed(operation: impl Into<String>, key_ref: impl Into<String>, details: impl Into<String>) -> Self {
        LedgerError::KeyOperationFailed { operation: operation.into(), key_ref: key_ref.into(), details: details.into() }
    }

    /// Precheck and receipt failures carry the status the network reported.
    pub fn status(&self) -> Option<Status> {
        match self {
            LedgerError::Precheck { status, .. } | LedgerError::ReceiptStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<hex::FromHexError> for LedgerError {
    fn from(err: hex::FromHexError) -> Self {
        LedgerError::EncodingError(format!("hex decode error: {}", err))
    }
}

impl From<toml::de::Error> for LedgerError {
    fn from(err: toml::de::Error) -> Self {
        LedgerError::ConfigError(format!("TOML parsing error: {}", err))
    }
}

impl From<bincode::Error> for LedgerError {
    fn from(err: bincode::Error) -> Self {
        LedgerError::SerializationError { format: "bincode".to_string(), details: err.to_string() }
    }
}

impl From<io::Error> for LedgerError {
    fn from(err: io::Error) -> Self {
        LedgerError::Message(format!("io error: {}", err))
    }
}

impl From<SecpError> for LedgerError {
    fn from(err: SecpError) -> Self {
        LedgerError::CryptoError { operation: "secp256k1".to_string(), details: err.to_string() }
    }
}

// NOTE: Avoid adding generic "stringly" error conversions here.
// Use structured `LedgerError` variants at the call site to preserve context.
