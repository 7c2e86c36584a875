use crate::fixtures::{decode_submission, node_account, operator_signer, test_client, TransferBuilder};
use ledger_core::application::{ByteListener, Client, TransferTransaction};
use ledger_core::domain::signing::Signer;
use ledger_core::domain::transaction::TransferData;
use ledger_core::domain::Status;
use ledger_core::foundation::LedgerError;
use ledger_core::infrastructure::rpc::{Method, TransportCode};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn test_execute_when_three_transient_failures_then_succeeds_on_fourth_attempt() {
    let (client, mocks) = test_client();
    mocks[0].push_transport_error(Method::SubmitTransaction, TransportCode::Unavailable);
    mocks[0].push_precheck(Status::Ok);
    mocks[1].push_transport_error(Method::SubmitTransaction, TransportCode::ResourceExhausted);
    mocks[2].push_transport_error(Method::SubmitTransaction, TransportCode::Internal);

    let mut tx = TransferBuilder::default().build();
    tx.execution_settings_mut().set_max_attempts(4);
    let response = tx.execute(&client).expect("execute");

    let total: u64 = mocks.iter().map(|mock| mock.calls()).sum();
    assert_eq!(total, 4);
    assert_eq!(response.node_id, node_account(3));
    assert_eq!(Some(response.transaction_id), tx.transaction_id());
    assert!(mocks[1].calls() == 1 && mocks[2].calls() == 1);
}

#[test]
fn test_execute_signs_with_operator_when_operator_pays() {
    let (client, mocks) = test_client();
    mocks[0].push_precheck(Status::Ok);

    let mut tx = TransferBuilder::default().nodes(vec![node_account(3)]).build();
    let response = tx.execute(&client).expect("execute");

    let submitted = mocks[0].submitted_for(Method::SubmitTransaction);
    let (signed, _body) = decode_submission::<TransferData>(&submitted[0]);
    let operator = operator_signer().public_key();
    let signature = signed.sig_map.get(&operator).expect("operator signature");
    assert!(operator.verify(signature, &signed.body_bytes));
    assert_eq!(response.hash, tx.transaction_hash().expect("hash"));
}

#[test]
fn test_submitted_envelope_when_decoded_then_restores_signed_request() {
    let (client, mocks) = test_client();
    mocks[0].push_precheck(Status::Ok);

    let mut tx = TransferBuilder::default().nodes(vec![node_account(3)]).build();
    tx.execute(&client).expect("execute");

    let submitted = mocks[0].submitted_for(Method::SubmitTransaction);
    let mut decoded = TransferTransaction::from_bytes(&submitted[0]).expect("decode submitted envelope");
    assert!(decoded.is_frozen());
    assert_eq!(decoded.transaction_id(), tx.transaction_id());
    assert_eq!(decoded.node_account_ids(), &[node_account(3)]);
    let signatures = decoded.get_signatures().expect("sigs");
    assert!(signatures[&node_account(3)].contains_key(&operator_signer().public_key()));
    assert_eq!(decoded.transaction_hash().expect("hash"), tx.transaction_hash().expect("hash"));
}

#[test]
fn test_execute_when_precheck_rejects_then_no_retry() {
    let (client, mocks) = test_client();
    mocks[0].push_precheck(Status::InvalidSignature);

    let mut tx = TransferBuilder::default().nodes(vec![node_account(3)]).build();
    let err = tx.execute(&client).expect_err("rejected");

    assert!(matches!(err, LedgerError::Precheck { status: Status::InvalidSignature, transaction_id: Some(_) }));
    assert_eq!(mocks[0].calls(), 1);
}

#[test]
fn test_execute_when_every_node_busy_then_backs_off_and_retries() {
    let (client, mocks) = test_client();
    for mock in &mocks {
        mock.push_precheck(Status::Busy);
    }
    mocks[0].push_precheck(Status::Ok);

    let mut tx = TransferBuilder::default().build();
    tx.execute(&client).expect("execute");

    let total: u64 = mocks.iter().map(|mock| mock.calls()).sum();
    assert_eq!(total, 4);
    assert_eq!(mocks[0].calls(), 2);
}

#[test]
fn test_execute_when_node_busy_then_moves_to_next_node() {
    let (client, mocks) = test_client();
    mocks[0].push_precheck(Status::PlatformNotActive);
    mocks[1].push_precheck(Status::Ok);

    let mut tx = TransferBuilder::default().build();
    let response = tx.execute(&client).expect("execute");
    assert_eq!(response.node_id, node_account(4));
}

#[test]
fn test_execute_when_attempts_exhausted_then_max_attempts_exceeded() {
    let (client, mocks) = test_client();
    let mut tx = TransferBuilder::default().build();
    tx.execution_settings_mut().set_max_attempts(2);

    let err = tx.execute(&client).expect_err("exhausted");
    assert!(matches!(err, LedgerError::MaxAttemptsExceeded { max_attempts: 2 }));
    let total: u64 = mocks.iter().map(|mock| mock.calls()).sum();
    assert_eq!(total, 2);
}

#[test]
fn test_execute_when_client_caps_attempts_then_client_value_applies() {
    let (mut client, mocks) = test_client();
    client.set_max_attempts(1);
    let mut tx = TransferBuilder::default().build();

    assert!(matches!(tx.execute(&client), Err(LedgerError::MaxAttemptsExceeded { max_attempts: 1 })));
    assert_eq!(mocks[0].calls(), 1);
}

#[test]
fn test_execute_when_transport_fails_permanently_then_transport_error() {
    let (client, mocks) = test_client();
    mocks[0].push_transport_error(Method::SubmitTransaction, TransportCode::Other("permission denied".to_string()));

    let mut tx = TransferBuilder::default().nodes(vec![node_account(3)]).build();
    let err = tx.execute(&client).expect_err("transport");
    assert!(matches!(err, LedgerError::TransportError { .. }));
    assert_eq!(mocks[0].calls(), 1);
}

#[test]
fn test_execute_when_node_disconnected_then_healthy_node_selected_first() {
    let (client, mocks) = test_client();
    mocks[0].set_connected(false);
    mocks[1].push_precheck(Status::Ok);

    let mut tx = TransferBuilder::default().nodes(vec![node_account(3), node_account(4)]).build();
    tx.execution_settings_mut().set_max_attempts(2);
    let response = tx.execute(&client).expect("execute");

    assert_eq!(response.node_id, node_account(4));
    assert_eq!(mocks[0].calls(), 0);
    assert_eq!(mocks[1].calls(), 1);
}

#[test]
fn test_execute_when_only_node_disconnected_then_attempts_consumed_without_sending() {
    let (client, mocks) = test_client();
    mocks[0].set_connected(false);

    let mut tx = TransferBuilder::default().nodes(vec![node_account(3)]).build();
    tx.execution_settings_mut().set_max_attempts(2);
    let err = tx.execute(&client).expect_err("never connects");

    assert!(matches!(err, LedgerError::MaxAttemptsExceeded { max_attempts: 2 }));
    assert_eq!(mocks[0].calls(), 0);
}

#[test]
fn test_execute_when_node_unknown_to_network_then_illegal_state() {
    let (client, _mocks) = test_client();
    let mut tx = TransferBuilder::default().nodes(vec![node_account(99)]).build();
    assert!(matches!(tx.execute(&client), Err(LedgerError::IllegalState(_))));
}

#[test]
fn test_execute_when_client_has_no_operator_and_no_id_then_uninitialized() {
    let mut tx = TransferBuilder::default().transaction_id(None).build();
    assert!(matches!(tx.execute(&Client::default()), Err(LedgerError::Uninitialized(_))));
}

#[test]
fn test_execute_invokes_request_and_response_listeners() {
    let (client, mocks) = test_client();
    mocks[0].push_precheck(Status::Ok);
    let requests = Arc::new(AtomicUsize::new(0));
    let responses = Arc::new(AtomicUsize::new(0));

    let seen_requests = requests.clone();
    let request_listener: ByteListener = Arc::new(move |bytes| {
        seen_requests.fetch_add(1, Ordering::SeqCst);
        bytes
    });
    let seen_responses = responses.clone();
    let response_listener: ByteListener = Arc::new(move |bytes| {
        seen_responses.fetch_add(1, Ordering::SeqCst);
        bytes
    });

    let mut tx = TransferBuilder::default().nodes(vec![node_account(3)]).build();
    tx.execution_settings_mut().set_request_listener(request_listener).set_response_listener(response_listener);
    tx.execute(&client).expect("execute");

    assert_eq!(requests.load(Ordering::SeqCst), 1);
    assert_eq!(responses.load(Ordering::SeqCst), 1);
}

#[test]
fn test_execute_marks_transaction_executed_or_failed() {
    let (client, mocks) = test_client();
    mocks[0].push_precheck(Status::Ok);
    let mut ok = TransferBuilder::default().nodes(vec![node_account(3)]).build();
    ok.execute(&client).expect("execute");
    assert_eq!(ok.state(), ledger_core::domain::transaction::RequestState::Executed);

    mocks[1].push_precheck(Status::InsufficientTxFee);
    let mut rejected = TransferBuilder::default().nodes(vec![node_account(4)]).build();
    rejected.execute(&client).expect_err("rejected");
    assert_eq!(rejected.state(), ledger_core::domain::transaction::RequestState::Failed);
}
