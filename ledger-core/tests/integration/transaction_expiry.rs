use crate::fixtures::{decode_submission, ed25519_signer, node_account, operator_signer, test_client, test_transaction_id, TransferBuilder};
use ledger_core::domain::signing::Signer;
use ledger_core::domain::transaction::TransferData;
use ledger_core::domain::Status;
use ledger_core::foundation::LedgerError;
use ledger_core::infrastructure::rpc::Method;

#[test]
fn test_expired_transaction_when_regeneration_enabled_then_resubmitted_under_new_id() {
    let (client, mocks) = test_client();
    mocks[0].push_precheck(Status::TransactionExpired);
    mocks[0].push_precheck(Status::Ok);

    let mut tx = TransferBuilder::default().nodes(vec![node_account(3)]).frozen();
    let external = ed25519_signer(42);
    let signature = external.sign(&tx.envelopes()[0].body_bytes).expect("sign");
    tx.add_signature(external.public_key(), signature).expect("add signature");

    let response = tx.execute(&client).expect("execute");
    assert_ne!(response.transaction_id, test_transaction_id());
    assert_eq!(response.transaction_id.account_id, test_transaction_id().account_id);

    let submitted = mocks[0].submitted_for(Method::SubmitTransaction);
    assert_eq!(submitted.len(), 2);
    let (first, first_body) = decode_submission::<TransferData>(&submitted[0]);
    let (second, second_body) = decode_submission::<TransferData>(&submitted[1]);
    assert_eq!(first_body.transaction_id, Some(test_transaction_id()));
    assert_eq!(second_body.transaction_id, Some(response.transaction_id));
    assert!(first.sig_map.contains(&external.public_key()));

    // Signers are replayed over the new body; supplied signatures cannot be.
    let operator = operator_signer().public_key();
    let replayed = second.sig_map.get(&operator).expect("operator signature");
    assert!(operator.verify(replayed, &second.body_bytes));
    assert!(!second.sig_map.contains(&external.public_key()));
}

#[test]
fn test_expired_transaction_when_regeneration_disabled_on_request_then_precheck_error() {
    let (client, mocks) = test_client();
    mocks[0].push_precheck(Status::TransactionExpired);

    let mut tx = TransferBuilder::default().nodes(vec![node_account(3)]).build();
    tx.set_regenerate_transaction_id(false).expect("policy");
    let err = tx.execute(&client).expect_err("expired");

    assert!(matches!(err, LedgerError::Precheck { status: Status::TransactionExpired, .. }));
    assert_eq!(tx.transaction_id(), Some(test_transaction_id()));
    assert_eq!(mocks[0].calls(), 1);
}

#[test]
fn test_expired_transaction_when_regeneration_disabled_on_client_then_precheck_error() {
    let (mut client, mocks) = test_client();
    client.set_regenerate_transaction_id(false);
    mocks[0].push_precheck(Status::TransactionExpired);

    let mut tx = TransferBuilder::default().nodes(vec![node_account(3)]).build();
    assert!(matches!(tx.execute(&client), Err(LedgerError::Precheck { status: Status::TransactionExpired, .. })));
}

#[test]
fn test_request_policy_overrides_client_policy() {
    let (mut client, mocks) = test_client();
    client.set_regenerate_transaction_id(false);
    mocks[0].push_precheck(Status::TransactionExpired);
    mocks[0].push_precheck(Status::Ok);

    let mut tx = TransferBuilder::default().nodes(vec![node_account(3)]).build();
    tx.set_regenerate_transaction_id(true).expect("policy");
    tx.execute(&client).expect("regenerated");
    assert_ne!(tx.transaction_id(), Some(test_transaction_id()));
}
