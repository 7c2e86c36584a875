pub mod body;
pub mod codec;
pub mod envelope;
pub mod hash;
pub mod kinds;
pub mod lifecycle;
pub mod signatory;

pub use body::{TransactionBody, TransactionData};
pub use envelope::{PerNodeEnvelope, SignatureMap, SignaturePair, SignedTransaction, TransactionList, WireFormat, WireTransaction};
pub use hash::transaction_hash;
pub use kinds::{AccountAmount, ChunkData, ChunkInfo, FileAppendData, TopicMessageData, TransferData};
pub use lifecycle::{ensure_valid_transition, RequestState};
pub use signatory::{Signatories, Signatory, SignatoryState};
