use crate::fixtures::{ecdsa_signer, ed25519_signer};
use ledger_core::domain::signing::{PublicKey, SignatureScheme, Signer};
use ledger_core::infrastructure::keys::LocalSigner;

#[test]
fn test_public_key_serialized_form_when_parsed_then_same_key() {
    for signer in [ed25519_signer(3).public_key(), ecdsa_signer(4).public_key()] {
        let parsed = PublicKey::from_serialized_bytes(&signer.serialized_bytes()).expect("parse");
        assert_eq!(parsed, signer);
    }
}

#[test]
fn test_signers_with_different_schemes_produce_verifiable_signatures() {
    let message = b"body bytes";
    let ed = ed25519_signer(5);
    let ec = ecdsa_signer(6);
    assert!(ed.public_key().verify(&ed.sign(message).expect("sign"), message));
    assert!(ec.public_key().verify(&ec.sign(message).expect("sign"), message));
    assert_ne!(ed.public_key().scheme(), ec.public_key().scheme());
}

#[test]
fn test_local_signer_from_hex_matches_from_bytes() {
    let from_bytes = LocalSigner::from_bytes(SignatureScheme::Ed25519, &[0x22; 32]).expect("bytes");
    let from_hex = LocalSigner::from_hex(SignatureScheme::Ed25519, &format!("0x{}", "22".repeat(32))).expect("hex");
    assert_eq!(from_bytes.public_key(), from_hex.public_key());
}
