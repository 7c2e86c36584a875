//! Domain layer: pure request construction, node health and status rules.

pub mod node;
pub mod response;
pub mod signing;
pub mod status;
pub mod transaction;

pub use response::{PrecheckResponse, ReceiptResponse, TransactionReceipt, TransactionResponse};
pub use status::{classify, ExecutionState, Status};
