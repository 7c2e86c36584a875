//! Local in-process signer backed by a raw private key.

use crate::domain::signing::{keccak256, PublicKey, SignatureScheme, Signer};
use crate::foundation::{LedgerError, PRIVATE_KEY_SIZE};
use crate::infrastructure::keys::panic_guard::SecretPanicGuard;
use crate::infrastructure::keys::secret::SecretBytes;
use ed25519_dalek::Signer as _;
use log::debug;
use rand::rngs::OsRng;
use rand::RngCore;
use secp256k1::{Message, Secp256k1, SecretKey};
use zeroize::Zeroize;

/// Holds one private key and signs with it on demand. The key bytes only leave
/// the `SecretBytes` wrapper for the duration of a single operation.
pub struct LocalSigner {
    scheme: SignatureScheme,
    secret: SecretBytes,
    public_key: PublicKey,
}

impl LocalSigner {
    /// Wraps a 32-byte private key (ed25519 seed or secp256k1 scalar).
    pub fn from_bytes(scheme: SignatureScheme, private_key: &[u8]) -> Result<Self, LedgerError> {
        let secret = SecretBytes::from_slice(private_key);
        let public_key = derive_public_key(scheme, &secret)?;
        debug!("local signer loaded scheme={} public_key={}", scheme, public_key);
        Ok(Self { scheme, secret, public_key })
    }

    pub fn from_hex(scheme: SignatureScheme, private_key_hex: &str) -> Result<Self, LedgerError> {
        let trimmed = private_key_hex.trim();
        let mut bytes = hex::decode(trimmed.strip_prefix("0x").unwrap_or(trimmed))?;
        let signer = Self::from_bytes(scheme, &bytes);
        bytes.zeroize();
        signer
    }

    /// Fresh random key from the OS entropy source.
    pub fn generate(scheme: SignatureScheme) -> Result<Self, LedgerError> {
        let mut guard = SecretPanicGuard::new([0u8; PRIVATE_KEY_SIZE]);
        loop {
            let mut candidate = [0u8; PRIVATE_KEY_SIZE];
            OsRng.fill_bytes(&mut candidate);
            let valid = match scheme {
                SignatureScheme::Ed25519 => true,
                SignatureScheme::EcdsaSecp256k1 => SecretKey::from_slice(&candidate).is_ok(),
            };
            if valid {
                guard = SecretPanicGuard::new(candidate);
                candidate.zeroize();
                break;
            }
            candidate.zeroize();
        }
        Self::from_bytes(scheme, guard.get()?)
    }

    pub fn scheme(&self) -> SignatureScheme {
        self.scheme
    }

    /// Hex of the raw private key. Callers own zeroizing the returned string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.secret.expose_secret())
    }
}

impl std::fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSigner").field("scheme", &self.scheme).field("public_key", &self.public_key).finish_non_exhaustive()
    }
}

impl Signer for LocalSigner {
    fn public_key(&self) -> PublicKey {
        self.public_key.clone()
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, LedgerError> {
        match self.scheme {
            SignatureScheme::Ed25519 => sign_ed25519(&self.secret, message),
            SignatureScheme::EcdsaSecp256k1 => sign_ecdsa(&self.secret, message),
        }
    }
}

fn ed25519_seed(guard: &SecretPanicGuard<Vec<u8>>) -> Result<[u8; PRIVATE_KEY_SIZE], LedgerError> {
    guard.get()?.as_slice().try_into().map_err(|_| {
        LedgerError::key_operation_failed("parse_ed25519_seed", "local", "Ed25519 seed must be exactly 32 bytes")
    })
}

fn secp256k1_secret(guard: &SecretPanicGuard<Vec<u8>>) -> Result<SecretKey, LedgerError> {
    SecretKey::from_slice(guard.get()?)
        .map_err(|err| LedgerError::key_operation_failed("parse_secp256k1_secret", "local", err.to_string()))
}

fn derive_public_key(scheme: SignatureScheme, secret: &SecretBytes) -> Result<PublicKey, LedgerError> {
    let guard = SecretPanicGuard::new(secret.expose_owned());
    match scheme {
        SignatureScheme::Ed25519 => {
            let mut seed = ed25519_seed(&guard)?;
            let signing_key = ed25519_dalek::SigningKey::from_bytes(&seed);
            seed.zeroize();
            PublicKey::ed25519(signing_key.verifying_key().as_bytes())
        }
        SignatureScheme::EcdsaSecp256k1 => {
            let secret_key = secp256k1_secret(&guard)?;
            let public_key = secp256k1::PublicKey::from_secret_key(&Secp256k1::signing_only(), &secret_key);
            PublicKey::ecdsa_secp256k1(&public_key.serialize())
        }
    }
}

fn sign_ed25519(secret: &SecretBytes, message: &[u8]) -> Result<Vec<u8>, LedgerError> {
    let guard = SecretPanicGuard::new(secret.expose_owned());
    let mut seed = ed25519_seed(&guard)?;
    let signing_key = ed25519_dalek::SigningKey::from_bytes(&seed);
    seed.zeroize();
    Ok(signing_key.sign(message).to_bytes().to_vec())
}

/// ECDSA over the keccak-256 digest of the message, compact 64-byte encoding.
fn sign_ecdsa(secret: &SecretBytes, message: &[u8]) -> Result<Vec<u8>, LedgerError> {
    let guard = SecretPanicGuard::new(secret.expose_owned());
    let secret_key = secp256k1_secret(&guard)?;
    let msg = Message::from_digest(keccak256(message));
    let sig = Secp256k1::signing_only().sign_ecdsa(&msg, &secret_key);
    Ok(sig.serialize_compact().to_vec())
}
