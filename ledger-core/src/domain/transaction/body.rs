use crate::foundation::{AccountId, TransactionId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind-specific part of a request body.
pub trait TransactionData: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Short name used in log lines.
    const KIND: &'static str;
}

/// Common fields shared by every request kind, plus the kind-specific data.
///
/// One body is serialized per target node; the copies differ only in
/// `node_account_id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionBody<D> {
    pub transaction_id: Option<TransactionId>,
    pub node_account_id: Option<AccountId>,
    pub transaction_fee: u64,
    pub valid_duration_secs: u64,
    pub memo: String,
    pub data: D,
}

impl<D: TransactionData> TransactionBody<D> {
    pub fn for_node(&self, node_account_id: AccountId) -> Self {
        let mut body = self.clone();
        body.node_account_id = Some(node_account_id);
        body
    }
}
