use crate::fixtures::{ed25519_signer, ecdsa_signer, node_account, test_client, test_transaction_id, TransferBuilder};
use ledger_core::application::TransferTransaction;
use ledger_core::domain::signing::Signer;
use ledger_core::domain::transaction::{codec, RequestState, TransactionBody, TransferData};
use ledger_core::foundation::{LedgerError, DEFAULT_MAX_TRANSACTION_FEE};
use std::time::Duration;

#[test]
fn test_freeze_when_called_twice_then_second_is_noop() {
    let mut tx = TransferBuilder::default().frozen();
    let before = tx.envelopes().to_vec();
    tx.freeze().expect("second freeze");
    assert_eq!(tx.envelopes(), before.as_slice());
    assert_eq!(tx.state(), RequestState::Frozen);
}

#[test]
fn test_setters_when_frozen_then_illegal_state() {
    let mut tx = TransferBuilder::default().frozen();
    assert!(matches!(tx.set_memo("late"), Err(LedgerError::IllegalState(_))));
    assert!(matches!(tx.set_max_transaction_fee(1), Err(LedgerError::IllegalState(_))));
    assert!(matches!(tx.set_valid_duration(Duration::from_secs(30)), Err(LedgerError::IllegalState(_))));
    assert!(matches!(tx.set_transaction_id(test_transaction_id()), Err(LedgerError::IllegalState(_))));
    assert!(matches!(tx.set_node_account_ids(vec![node_account(9)]), Err(LedgerError::IllegalState(_))));
    assert!(matches!(tx.data_mut(), Err(LedgerError::IllegalState(_))));
    // Execution knobs stay writable.
    tx.execution_settings_mut().set_max_attempts(2);
}

#[test]
fn test_freeze_with_client_fills_id_nodes_and_fee() {
    let (mut client, _mocks) = test_client();
    client.set_max_transaction_fee(5_000);
    let mut tx = TransferBuilder::default().transaction_id(None).nodes(Vec::new()).build();
    tx.freeze_with(&client).expect("freeze");

    assert_eq!(tx.transaction_id().map(|id| id.account_id), client.operator_account_id());
    assert_eq!(tx.node_account_ids().len(), 1);
    let body: TransactionBody<TransferData> = codec::decode(&tx.envelopes()[0].body_bytes).expect("body");
    assert_eq!(body.transaction_fee, 5_000);
}

#[test]
fn test_freeze_without_client_when_nodes_missing_then_uninitialized() {
    let mut tx = TransferBuilder::default().nodes(Vec::new()).build();
    assert!(matches!(tx.freeze(), Err(LedgerError::Uninitialized(_))));
}

#[test]
fn test_request_fee_overrides_default() {
    let tx = TransferBuilder::default().max_fee(42).frozen();
    let body: TransactionBody<TransferData> = codec::decode(&tx.envelopes()[0].body_bytes).expect("body");
    assert_eq!(body.transaction_fee, 42);

    let default_fee = TransferBuilder::default().frozen();
    let body: TransactionBody<TransferData> = codec::decode(&default_fee.envelopes()[0].body_bytes).expect("body");
    assert_eq!(body.transaction_fee, DEFAULT_MAX_TRANSACTION_FEE);
}

#[test]
fn test_sign_produces_distinct_verifiable_signature_per_node() {
    let signer = ed25519_signer(7);
    let mut tx = TransferBuilder::default().frozen();
    tx.sign_with(signer.clone()).expect("sign");

    let signatures = tx.get_signatures().expect("signatures");
    assert_eq!(signatures.len(), 3);
    let mut seen = Vec::new();
    for envelope in tx.envelopes() {
        let signature = &signatures[&envelope.node_account_id][&signer.public_key()];
        assert!(signer.public_key().verify(signature, &envelope.body_bytes));
        seen.push(signature.clone());
    }
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 3);
}

#[test]
fn test_sign_when_same_key_twice_then_one_signature_per_node() {
    let signer = ecdsa_signer(8);
    let mut tx = TransferBuilder::default().frozen();
    tx.sign_with(signer.clone()).expect("sign").sign_with(signer.clone()).expect("sign again");
    tx.get_signatures().expect("signatures");
    assert_eq!(tx.signatories().len(), 1);
    assert!(tx.envelopes().iter().all(|envelope| envelope.sig_map.len() == 1));
}

#[test]
fn test_sign_when_same_key_twice_then_signatures_match_single_sign() {
    let signer = ed25519_signer(5);
    let mut once = TransferBuilder::default().frozen();
    once.sign_with(signer.clone()).expect("sign");
    let expected = once.get_signatures().expect("signatures");

    let mut twice = TransferBuilder::default().frozen();
    twice.sign_with(signer.clone()).expect("sign");
    let after_first = twice.get_signatures().expect("signatures");
    twice.sign_with(signer).expect("sign again");
    let after_second = twice.get_signatures().expect("signatures");

    assert_eq!(after_first, after_second);
    assert_eq!(after_second, expected);
}

#[test]
fn test_sign_after_build_invalidates_cached_bytes() {
    let mut tx = TransferBuilder::default().frozen();
    tx.sign_with(ed25519_signer(1)).expect("sign");
    let first = tx.transaction_hash().expect("hash");
    tx.sign_with(ed25519_signer(2)).expect("sign");
    let second = tx.transaction_hash().expect("hash");
    assert_ne!(first, second);
    assert!(tx.envelopes().iter().all(|envelope| envelope.sig_map.len() <= 2));
}

#[test]
fn test_add_signature_when_one_node_then_included() {
    let signer = ed25519_signer(9);
    let mut tx = TransferBuilder::default().nodes(vec![node_account(3)]).frozen();
    let signature = signer.sign(&tx.envelopes()[0].body_bytes).expect("sign");
    tx.add_signature(signer.public_key(), signature.clone()).expect("add");
    tx.add_signature(signer.public_key(), signature.clone()).expect("duplicate is a no-op");

    let signatures = tx.get_signatures().expect("signatures");
    assert_eq!(signatures[&node_account(3)][&signer.public_key()], signature);
    assert_eq!(tx.envelopes()[0].sig_map.len(), 1);
}

#[test]
fn test_add_signature_when_several_nodes_then_illegal_state() {
    let signer = ed25519_signer(9);
    let mut tx = TransferBuilder::default().frozen();
    let err = tx.add_signature(signer.public_key(), vec![0u8; 64]).expect_err("multi-node");
    assert!(matches!(err, LedgerError::IllegalState(msg) if msg.contains("exactly one node")));
}

#[test]
fn test_get_signatures_when_not_frozen_then_illegal_state() {
    let mut tx = TransferTransaction::default();
    assert!(matches!(tx.get_signatures(), Err(LedgerError::IllegalState(_))));
    assert!(matches!(tx.transaction_hash(), Err(LedgerError::IllegalState(_))));
}

#[test]
fn test_get_signatures_when_unsigned_then_empty() {
    let mut tx = TransferBuilder::default().frozen();
    assert!(tx.get_signatures().expect("signatures").is_empty());
}

#[test]
fn test_transaction_hash_per_node_covers_every_node() {
    let mut tx = TransferBuilder::default().frozen();
    tx.sign_with(ed25519_signer(4)).expect("sign");
    let hashes = tx.transaction_hash_per_node().expect("hashes");
    assert_eq!(hashes.len(), 3);
    assert_eq!(hashes[&node_account(3)], tx.transaction_hash().expect("hash"));
    assert_eq!(tx.state(), RequestState::Built);
}
