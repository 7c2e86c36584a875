use crate::foundation::util::hx;
use crate::foundation::{LedgerError, ECDSA_PUBLIC_KEY_SIZE, ED25519_PUBLIC_KEY_SIZE, SIGNATURE_SIZE};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;

/// Signature algorithm a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SignatureScheme {
    Ed25519,
    EcdsaSecp256k1,
}

impl SignatureScheme {
    const fn tag(&self) -> u8 {
        match self {
            Self::Ed25519 => 0x01,
            Self::EcdsaSecp256k1 => 0x02,
        }
    }

    fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0x01 => Some(Self::Ed25519),
            0x02 => Some(Self::EcdsaSecp256k1),
            _ => None,
        }
    }
}

impl fmt::Display for SignatureScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ed25519 => write!(f, "ed25519"),
            Self::EcdsaSecp256k1 => write!(f, "ecdsa-secp256k1"),
        }
    }
}

impl FromStr for SignatureScheme {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "ed25519" => Ok(Self::Ed25519),
            "ecdsa" | "secp256k1" | "ecdsa-secp256k1" | "ecdsa_secp256k1" => Ok(Self::EcdsaSecp256k1),
            _ => Err(LedgerError::UnsupportedSignatureScheme { scheme: value.to_string() }),
        }
    }
}

/// Public half of a signing key.
///
/// Equality, ordering and lookups all go through the scheme-tagged serialized
/// bytes, so one key is registered at most once per request.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PublicKey {
    scheme: SignatureScheme,
    bytes: Vec<u8>,
}

impl PublicKey {
    pub fn ed25519(bytes: &[u8]) -> Result<Self, LedgerError> {
        let raw: [u8; ED25519_PUBLIC_KEY_SIZE] = bytes.try_into().map_err(|_| LedgerError::CryptoError {
            operation: "parse_ed25519_public_key".to_string(),
            details: format!("expected {} bytes, got {}", ED25519_PUBLIC_KEY_SIZE, bytes.len()),
        })?;
        ed25519_dalek::VerifyingKey::from_bytes(&raw)
            .map_err(|err| LedgerError::CryptoError { operation: "parse_ed25519_public_key".to_string(), details: err.to_string() })?;
        Ok(Self { scheme: SignatureScheme::Ed25519, bytes: raw.to_vec() })
    }

    /// Accepts compressed or uncompressed SEC1 bytes; stores the compressed form.
    pub fn ecdsa_secp256k1(bytes: &[u8]) -> Result<Self, LedgerError> {
        let key = secp256k1::PublicKey::from_slice(bytes)?;
        Ok(Self { scheme: SignatureScheme::EcdsaSecp256k1, bytes: key.serialize().to_vec() })
    }

    pub fn scheme(&self) -> SignatureScheme {
        self.scheme
    }

    pub fn raw_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Stable serialized form used for identity and on the wire.
    pub fn serialized_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.bytes.len());
        out.push(self.scheme.tag());
        out.extend_from_slice(&self.bytes);
        out
    }

    pub fn from_serialized_bytes(bytes: &[u8]) -> Result<Self, LedgerError> {
        let (tag, raw) = bytes
            .split_first()
            .ok_or_else(|| LedgerError::CryptoError { operation: "parse_public_key".to_string(), details: "empty input".to_string() })?;
        match SignatureScheme::from_tag(*tag) {
            Some(SignatureScheme::Ed25519) => Self::ed25519(raw),
            Some(SignatureScheme::EcdsaSecp256k1) => Self::ecdsa_secp256k1(raw),
            None => Err(LedgerError::UnsupportedSignatureScheme { scheme: format!("tag {:#04x}", tag) }),
        }
    }

    /// Checks `signature` over `message`. Invalid encodings verify as `false`.
    pub fn verify(&self, signature: &[u8], message: &[u8]) -> bool {
        if signature.len() != SIGNATURE_SIZE {
            return false;
        }
        match self.scheme {
            SignatureScheme::Ed25519 => {
                let Ok(raw) = <[u8; ED25519_PUBLIC_KEY_SIZE]>::try_from(self.bytes.as_slice()) else {
                    return false;
                };
                let Ok(key) = ed25519_dalek::VerifyingKey::from_bytes(&raw) else {
                    return false;
                };
                let Ok(sig) = ed25519_dalek::Signature::from_slice(signature) else {
                    return false;
                };
                key.verify_strict(message, &sig).is_ok()
            }
            SignatureScheme::EcdsaSecp256k1 => {
                if self.bytes.len() != ECDSA_PUBLIC_KEY_SIZE {
                    return false;
                }
                let Ok(key) = secp256k1::PublicKey::from_slice(&self.bytes) else {
                    return false;
                };
                let Ok(sig) = secp256k1::ecdsa::Signature::from_compact(signature) else {
                    return false;
                };
                let msg = secp256k1::Message::from_digest(keccak256(message));
                secp256k1::Secp256k1::verification_only().verify_ecdsa(&msg, &sig, &key).is_ok()
            }
        }
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hx(&self.serialized_bytes()))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({}:{})", self.scheme, hx(&self.bytes))
    }
}

impl FromStr for PublicKey {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let bytes = hex::decode(trimmed.strip_prefix("0x").unwrap_or(trimmed))?;
        Self::from_serialized_bytes(&bytes)
    }
}

/// Digest ECDSA keys sign over.
pub fn keccak256(message: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(message);
    hasher.finalize().into()
}
