use crate::domain::signing::PublicKey;
use crate::domain::transaction::body::{TransactionBody, TransactionData};
use crate::domain::transaction::codec;
use crate::foundation::{AccountId, LedgerError};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignaturePair {
    pub public_key: PublicKey,
    pub signature: Vec<u8>,
}

/// Signatures over one node's body bytes, in the order they were added.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureMap {
    pub pairs: Vec<SignaturePair>,
}

impl SignatureMap {
    pub fn contains(&self, key: &PublicKey) -> bool {
        self.pairs.iter().any(|pair| &pair.public_key == key)
    }

    pub fn get(&self, key: &PublicKey) -> Option<&[u8]> {
        self.pairs.iter().find(|pair| &pair.public_key == key).map(|pair| pair.signature.as_slice())
    }

    pub fn push(&mut self, public_key: PublicKey, signature: Vec<u8>) {
        self.pairs.push(SignaturePair { public_key, signature });
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }
}

/// Body bytes plus the signatures over them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub body_bytes: Vec<u8>,
    pub sig_map: SignatureMap,
}

/// What a node receives for one attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireTransaction {
    pub signed_transaction_bytes: Vec<u8>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionList {
    pub transactions: Vec<WireTransaction>,
}

/// The three shapes a serialized request can take. None of them carries a
/// tag on the wire; [`WireFormat::detect`] tells them apart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WireFormat<D> {
    /// Every node's signed envelope, as written by `to_bytes`.
    List(TransactionList),
    /// One signed envelope, as submitted to a node.
    Single(WireTransaction),
    /// An unsigned body with no node list.
    Body(TransactionBody<D>),
}

impl<D: TransactionData> WireFormat<D> {
    /// Tries list, then single envelope, then bare body. A candidate only
    /// matches when it consumes the whole buffer and every envelope inside
    /// it holds a well-formed `SignedTransaction`.
    pub fn detect(bytes: &[u8]) -> Result<Self, LedgerError> {
        if let Ok(list) = codec::decode_exact::<TransactionList>(bytes) {
            if !list.transactions.is_empty() && list.transactions.iter().all(WireTransaction::is_well_formed) {
                return Ok(WireFormat::List(list));
            }
        }
        if let Ok(single) = codec::decode_exact::<WireTransaction>(bytes) {
            if single.is_well_formed() {
                return Ok(WireFormat::Single(single));
            }
        }
        match codec::decode_exact::<TransactionBody<D>>(bytes) {
            Ok(body) => Ok(WireFormat::Body(body)),
            Err(err) => Err(LedgerError::SerializationError {
                format: "bincode".to_string(),
                details: format!("not a transaction list, signed transaction or transaction body: {}", err),
            }),
        }
    }

    /// Encodes without any framing, so a `Single` is byte-identical to what a node receives.
    pub fn encode(&self) -> Result<Vec<u8>, LedgerError> {
        match self {
            WireFormat::List(list) => codec::encode(list),
            WireFormat::Single(wire) => codec::encode(wire),
            WireFormat::Body(body) => codec::encode(body),
        }
    }
}

impl WireTransaction {
    fn is_well_formed(&self) -> bool {
        codec::decode_exact::<SignedTransaction>(&self.signed_transaction_bytes).is_ok()
    }
}

/// One node's slice of a frozen request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PerNodeEnvelope {
    pub node_account_id: AccountId,
    pub body_bytes: Vec<u8>,
    pub sig_map: SignatureMap,
    /// Serialized `SignedTransaction`, cached after the first build.
    pub built: Option<Vec<u8>>,
}

impl PerNodeEnvelope {
    pub fn new(node_account_id: AccountId, body_bytes: Vec<u8>) -> Self {
        Self { node_account_id, body_bytes, sig_map: SignatureMap::default(), built: None }
    }

    pub fn is_built(&self) -> bool {
        self.built.is_some()
    }

    pub fn invalidate(&mut self) {
        self.built = None;
    }
}
