#![allow(dead_code)]

use crate::fixtures::{operator_account, test_node_accounts, test_transaction_id, TEST_MEMO};
use ledger_core::application::TransferTransaction;
use ledger_core::domain::transaction::TransferData;
use ledger_core::foundation::{AccountId, TransactionId};

pub struct TransferBuilder {
    transaction_id: Option<TransactionId>,
    node_account_ids: Vec<AccountId>,
    memo: String,
    max_fee: Option<u64>,
    data: TransferData,
}

impl Default for TransferBuilder {
    fn default() -> Self {
        let mut data = TransferData::default();
        data.add_transfer(operator_account(), -100);
        data.add_transfer(AccountId::from_num(2002), 100);
        Self {
            transaction_id: Some(test_transaction_id()),
            node_account_ids: test_node_accounts(),
            memo: TEST_MEMO.to_string(),
            max_fee: None,
            data,
        }
    }
}

impl TransferBuilder {
    pub fn transaction_id(mut self, transaction_id: Option<TransactionId>) -> Self {
        self.transaction_id = transaction_id;
        self
    }

    pub fn nodes(mut self, node_account_ids: Vec<AccountId>) -> Self {
        self.node_account_ids = node_account_ids;
        self
    }

    pub fn memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    pub fn max_fee(mut self, fee: u64) -> Self {
        self.max_fee = Some(fee);
        self
    }

    pub fn build(self) -> TransferTransaction {
        let mut tx = TransferTransaction::new(self.data);
        if let Some(id) = self.transaction_id {
            tx.set_transaction_id(id).expect("transaction id");
        }
        tx.set_node_account_ids(self.node_account_ids).expect("nodes").set_memo(self.memo).expect("memo");
        if let Some(fee) = self.max_fee {
            tx.set_max_transaction_fee(fee).expect("fee");
        }
        tx
    }

    pub fn frozen(self) -> TransferTransaction {
        let mut tx = self.build();
        tx.freeze().expect("freeze");
        tx
    }
}
