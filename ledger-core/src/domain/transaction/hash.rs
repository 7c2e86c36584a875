use crate::foundation::{TransactionHash, TRANSACTION_HASH_SIZE};
use sha2::{Digest, Sha384};

/// SHA-384 over a node's built envelope bytes.
pub fn transaction_hash(signed_transaction_bytes: &[u8]) -> TransactionHash {
    let mut hasher = Sha384::new();
    hasher.update(signed_transaction_bytes);
    let digest = hasher.finalize();
    let mut out = [0u8; TRANSACTION_HASH_SIZE];
    out.copy_from_slice(&digest);
    TransactionHash::new(out)
}
