//! Receipt lookup for submitted requests.

use crate::application::client::Client;
use crate::application::executor::{self, Executable, ExecutionSettings};
use crate::domain::response::{ReceiptResponse, TransactionReceipt, TransactionResponse};
use crate::domain::status::{ExecutionState, Status};
use crate::domain::transaction::codec;
use crate::foundation::{AccountId, LedgerError, TransactionId};
use crate::infrastructure::rpc::Method;
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Wire form of a receipt lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptRequest {
    pub transaction_id: TransactionId,
}

/// Polls nodes until the receipt for one request id is known.
#[derive(Clone, Debug, Default)]
pub struct TransactionReceiptQuery {
    settings: ExecutionSettings,
    transaction_id: Option<TransactionId>,
}

impl TransactionReceiptQuery {
    pub fn new(transaction_id: TransactionId) -> Self {
        Self { settings: ExecutionSettings::default(), transaction_id: Some(transaction_id) }
    }

    pub fn transaction_id(&self) -> Option<TransactionId> {
        self.transaction_id
    }

    pub fn set_transaction_id(&mut self, transaction_id: TransactionId) -> &mut Self {
        self.transaction_id = Some(transaction_id);
        self
    }

    pub fn set_node_account_ids(&mut self, node_account_ids: Vec<AccountId>) -> &mut Self {
        self.settings.set_node_account_ids(node_account_ids);
        self
    }

    pub fn execution_settings_mut(&mut self) -> &mut ExecutionSettings {
        &mut self.settings
    }

    pub fn execute(&mut self, client: &Client) -> Result<TransactionReceipt, LedgerError> {
        executor::execute(self, client)
    }

    pub fn execute_with_timeout(&mut self, client: &Client, timeout: Duration) -> Result<TransactionReceipt, LedgerError> {
        executor::execute_with_timeout(self, client, timeout)
    }
}

impl Executable for TransactionReceiptQuery {
    type Response = ReceiptResponse;
    type Output = TransactionReceipt;

    fn settings(&self) -> &ExecutionSettings {
        &self.settings
    }

    fn settings_mut(&mut self) -> &mut ExecutionSettings {
        &mut self.settings
    }

    fn kind(&self) -> &'static str {
        "receipt_query"
    }

    fn method(&self) -> Method {
        Method::GetReceipt
    }

    fn on_execute(&mut self, _client: &Client) -> Result<(), LedgerError> {
        if self.transaction_id.is_none() {
            return Err(LedgerError::uninitialized("receipt query has no transaction id"));
        }
        Ok(())
    }

    fn build_request(&mut self, _envelope_index: usize) -> Result<Vec<u8>, LedgerError> {
        let transaction_id = self.transaction_id.ok_or_else(|| LedgerError::uninitialized("receipt query has no transaction id"))?;
        codec::encode(&ReceiptRequest { transaction_id })
    }

    fn decode_response(&self, bytes: &[u8]) -> Result<ReceiptResponse, LedgerError> {
        codec::decode(bytes)
    }

    fn map_status(&self, response: &ReceiptResponse) -> Status {
        response.header_status
    }

    /// A receipt that is not final yet is polled again.
    fn determine_status(&mut self, status: Status, _client: &Client, response: &ReceiptResponse) -> Result<ExecutionState, LedgerError> {
        Ok(match status {
            Status::Busy | Status::Unknown | Status::ReceiptNotFound => ExecutionState::Retry,
            Status::Ok => match &response.receipt {
                Some(receipt) if receipt.status != Status::Unknown => ExecutionState::Success,
                _ => ExecutionState::Retry,
            },
            _ => ExecutionState::RequestError,
        })
    }

    fn map_response(&self, response: ReceiptResponse, _node_account_id: AccountId, _envelope_index: usize) -> Result<TransactionReceipt, LedgerError> {
        let mut receipt = response.receipt.ok_or_else(|| LedgerError::illegal_state("successful receipt response carried no receipt"))?;
        if receipt.transaction_id.is_none() {
            receipt.transaction_id = self.transaction_id;
        }
        Ok(receipt)
    }

    fn request_id(&self) -> Option<TransactionId> {
        self.transaction_id
    }
}

impl TransactionResponse {
    /// Receipt query against the node that accepted the request.
    pub fn receipt_query(&self) -> TransactionReceiptQuery {
        let mut query = TransactionReceiptQuery::new(self.transaction_id);
        query.set_node_account_ids(vec![self.node_id]);
        query
    }

    pub fn get_receipt(&self, client: &Client) -> Result<TransactionReceipt, LedgerError> {
        self.get_receipt_with_timeout(client, client.request_timeout())
    }

    pub fn get_receipt_with_timeout(&self, client: &Client, timeout: Duration) -> Result<TransactionReceipt, LedgerError> {
        let receipt = self.receipt_query().execute_with_timeout(client, timeout)?;
        self.validate_receipt(receipt)
    }

    pub async fn get_receipt_async(&self, client: Client) -> Result<TransactionReceipt, LedgerError> {
        let receipt = executor::execute_async(self.receipt_query(), client).await?;
        self.validate_receipt(receipt)
    }

    fn validate_receipt(&self, receipt: TransactionReceipt) -> Result<TransactionReceipt, LedgerError> {
        debug!("receipt received transaction_id={} status={}", self.transaction_id, receipt.status);
        if self.validate_status && receipt.status != Status::Success {
            return Err(LedgerError::ReceiptStatus { status: receipt.status, transaction_id: self.transaction_id });
        }
        Ok(receipt)
    }
}
