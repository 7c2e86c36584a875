use crate::fixtures::{node_account, test_client, TransferBuilder};
use ledger_core::application::{execute_async, execute_with_callback};
use ledger_core::domain::Status;
use std::sync::mpsc;
use std::time::Duration;

#[tokio::test(flavor = "multi_thread")]
async fn test_execute_async_when_node_accepts_then_response() {
    let (client, mocks) = test_client();
    mocks[0].push_precheck(Status::Ok);
    mocks[0].push_receipt(Status::Ok, Some(Status::Success));

    let tx = TransferBuilder::default().nodes(vec![node_account(3)]).build();
    let response = execute_async(tx, client.clone()).await.expect("execute");
    let receipt = response.get_receipt_async(client).await.expect("receipt");
    assert_eq!(receipt.status, Status::Success);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_execute_async_when_rejected_then_error() {
    let (client, mocks) = test_client();
    mocks[0].push_precheck(Status::InvalidSignature);

    let tx = TransferBuilder::default().nodes(vec![node_account(3)]).build();
    let err = execute_async(tx, client).await.expect_err("rejected");
    assert_eq!(err.status(), Some(Status::InvalidSignature));
}

#[test]
fn test_execute_with_callback_delivers_outcome() {
    let (client, mocks) = test_client();
    mocks[0].push_precheck(Status::Ok);
    let (sender, receiver) = mpsc::channel();

    let tx = TransferBuilder::default().nodes(vec![node_account(3)]).build();
    let handle = execute_with_callback(tx, client, move |result| {
        let _ = sender.send(result.map(|response| response.node_id));
    })
    .expect("spawn");

    let node = receiver.recv_timeout(Duration::from_secs(10)).expect("callback").expect("execute");
    assert_eq!(node, node_account(3));
    handle.join().expect("join");
}
