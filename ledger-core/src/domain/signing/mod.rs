//! Signing capability seen by the request builder.

pub mod types;

pub use types::{keccak256, PublicKey, SignatureScheme};

use crate::foundation::LedgerError;
use std::sync::Arc;

/// Signs request body bytes with one key.
pub trait Signer: Send + Sync {
    fn public_key(&self) -> PublicKey;
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, LedgerError>;
}

/// Closure form of a signer, as registered on a request.
pub type SignerFn = Arc<dyn Fn(&[u8]) -> Result<Vec<u8>, LedgerError> + Send + Sync>;

/// Adapts a key object into the closure form.
pub fn signer_fn(signer: Arc<dyn Signer>) -> SignerFn {
    Arc::new(move |message: &[u8]| signer.sign(message))
}
