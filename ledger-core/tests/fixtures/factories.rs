#![allow(dead_code)]

use crate::fixtures::{TEST_MAX_BACKOFF, TEST_MIN_BACKOFF, TEST_NODE_NUMS, TEST_OPERATOR_NUM, TEST_OPERATOR_SEED, TEST_VALID_START_SECS};
use ledger_core::application::Client;
use ledger_core::domain::node::NodeBackoffConfig;
use ledger_core::domain::signing::{SignatureScheme, Signer};
use ledger_core::domain::transaction::{codec, SignedTransaction, TransactionBody, TransactionData, WireTransaction};
use ledger_core::foundation::{AccountId, Timestamp, TransactionId};
use ledger_core::infrastructure::keys::LocalSigner;
use ledger_core::infrastructure::network::Network;
use ledger_core::infrastructure::rpc::MockChannel;
use std::sync::Arc;

pub fn operator_account() -> AccountId {
    AccountId::from_num(TEST_OPERATOR_NUM)
}

pub fn node_account(num: u64) -> AccountId {
    AccountId::from_num(num)
}

pub fn test_node_accounts() -> Vec<AccountId> {
    TEST_NODE_NUMS.iter().map(|num| node_account(*num)).collect()
}

pub fn test_transaction_id() -> TransactionId {
    TransactionId::with_valid_start(operator_account(), Timestamp::new(TEST_VALID_START_SECS, 0))
}

pub fn operator_signer() -> Arc<LocalSigner> {
    Arc::new(LocalSigner::from_bytes(SignatureScheme::Ed25519, &TEST_OPERATOR_SEED).expect("operator signer"))
}

pub fn ed25519_signer(seed: u8) -> Arc<LocalSigner> {
    Arc::new(LocalSigner::from_bytes(SignatureScheme::Ed25519, &[seed; 32]).expect("ed25519 signer"))
}

pub fn ecdsa_signer(seed: u8) -> Arc<LocalSigner> {
    Arc::new(LocalSigner::from_bytes(SignatureScheme::EcdsaSecp256k1, &[seed; 32]).expect("ecdsa signer"))
}

pub fn fast_node_backoff() -> NodeBackoffConfig {
    NodeBackoffConfig::new(TEST_MIN_BACKOFF, TEST_MAX_BACKOFF)
}

/// Network of one mock channel per account, in the given order.
pub fn mock_network(accounts: &[AccountId]) -> (Network, Vec<Arc<MockChannel>>) {
    let mut network = Network::default();
    let mut mocks = Vec::with_capacity(accounts.len());
    for (i, account) in accounts.iter().enumerate() {
        let mock = Arc::new(MockChannel::new());
        network.add_node(*account, &format!("node{}.test:50211", i), mock.clone(), fast_node_backoff());
        mocks.push(mock);
    }
    (network, mocks)
}

/// Client over the three test nodes, with the test operator and fast backoff.
pub fn test_client() -> (Client, Vec<Arc<MockChannel>>) {
    let (network, mocks) = mock_network(&test_node_accounts());
    let signer: Arc<dyn Signer> = operator_signer();
    let mut client = Client::for_network(network).with_operator(operator_account(), signer);
    // The minimum goes first: an unset minimum validates against the 250ms default.
    client.set_min_backoff(TEST_MIN_BACKOFF).expect("min backoff");
    client.set_max_backoff(TEST_MAX_BACKOFF).expect("max backoff");
    (client, mocks)
}

/// Unwraps one submitted envelope into its signed form and body.
pub fn decode_submission<D: TransactionData>(bytes: &[u8]) -> (SignedTransaction, TransactionBody<D>) {
    let wire: WireTransaction = codec::decode(bytes).expect("wire transaction");
    let signed: SignedTransaction = codec::decode(&wire.signed_transaction_bytes).expect("signed transaction");
    let body: TransactionBody<D> = codec::decode(&signed.body_bytes).expect("body");
    (signed, body)
}
