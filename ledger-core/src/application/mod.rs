//! Application layer: the client context, the execution engine and the
//! request kinds it drives.

pub mod chunked;
pub mod client;
pub mod executor;
pub mod receipt;
pub mod transaction;

pub use chunked::ChunkedTransaction;
pub use client::{Client, Operator};
pub use executor::{execute, execute_async, execute_with_callback, execute_with_timeout, ByteListener, Executable, ExecutionSettings};
pub use receipt::{ReceiptRequest, TransactionReceiptQuery};
pub use transaction::{SignatureList, Transaction};

use crate::domain::transaction::{FileAppendData, TopicMessageData, TransferData};

pub type TransferTransaction = Transaction<TransferData>;
pub type FileAppendTransaction = ChunkedTransaction<FileAppendData>;
pub type TopicMessageSubmitTransaction = ChunkedTransaction<TopicMessageData>;
