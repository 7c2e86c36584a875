//! Signed-request builder.
//!
//! A [`Transaction`] collects common fields and kind-specific data, freezes
//! into one body per target node, gathers signatures from registered keys and
//! serializes the result. Freezing makes every body-affecting field read-only.

use crate::application::client::Client;
use crate::application::executor::{self, Executable, ExecutionSettings};
use crate::domain::response::{PrecheckResponse, TransactionResponse};
use crate::domain::signing::{signer_fn, PublicKey, Signer, SignerFn};
use crate::domain::status::{classify, ExecutionState, Status};
use crate::domain::transaction::{
    codec, ensure_valid_transition, transaction_hash, PerNodeEnvelope, RequestState, Signatories, SignedTransaction,
    TransactionBody, TransactionData, TransactionList, WireFormat, WireTransaction,
};
use crate::foundation::{
    AccountId, LedgerError, TransactionHash, TransactionId, DEFAULT_MAX_TRANSACTION_FEE, DEFAULT_REGENERATE_TRANSACTION_ID,
    DEFAULT_TRANSACTION_VALID_DURATION, MAX_MEMO_LENGTH,
};
use crate::infrastructure::rpc::Method;
use log::{debug, info, trace, warn};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Signatures per node, per key.
pub type SignatureList = BTreeMap<AccountId, BTreeMap<PublicKey, Vec<u8>>>;

#[derive(Clone, Debug)]
pub struct Transaction<D: TransactionData> {
    settings: ExecutionSettings,
    state: RequestState,
    transaction_id: Option<TransactionId>,
    max_transaction_fee: Option<u64>,
    valid_duration: Duration,
    memo: String,
    regenerate_transaction_id: Option<bool>,
    data: D,
    envelopes: Vec<PerNodeEnvelope>,
    signatories: Signatories,
}

impl<D: TransactionData + Default> Default for Transaction<D> {
    fn default() -> Self {
        Self::new(D::default())
    }
}

impl<D: TransactionData> Transaction<D> {
    pub fn new(data: D) -> Self {
        Self {
            settings: ExecutionSettings::default(),
            state: RequestState::Unconfigured,
            transaction_id: None,
            max_transaction_fee: None,
            valid_duration: DEFAULT_TRANSACTION_VALID_DURATION,
            memo: String::new(),
            regenerate_transaction_id: None,
            data,
            envelopes: Vec::new(),
            signatories: Signatories::default(),
        }
    }

    // --- accessors ---

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn is_frozen(&self) -> bool {
        self.state.is_frozen()
    }

    pub fn transaction_id(&self) -> Option<TransactionId> {
        self.transaction_id
    }

    pub fn node_account_ids(&self) -> &[AccountId] {
        self.settings.node_account_ids()
    }

    pub fn max_transaction_fee(&self) -> Option<u64> {
        self.max_transaction_fee
    }

    pub fn valid_duration(&self) -> Duration {
        self.valid_duration
    }

    pub fn memo(&self) -> &str {
        &self.memo
    }

    pub fn regenerate_transaction_id(&self) -> Option<bool> {
        self.regenerate_transaction_id
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    /// Kind-specific data, writable until the request is frozen.
    pub fn data_mut(&mut self) -> Result<&mut D, LedgerError> {
        self.require_not_frozen()?;
        Ok(&mut self.data)
    }

    pub fn execution_settings(&self) -> &ExecutionSettings {
        &self.settings
    }

    /// Attempt, backoff and listener overrides. These do not affect the body
    /// and stay writable after freezing.
    pub fn execution_settings_mut(&mut self) -> &mut ExecutionSettings {
        &mut self.settings
    }

    pub fn envelopes(&self) -> &[PerNodeEnvelope] {
        &self.envelopes
    }

    pub fn signatories(&self) -> &Signatories {
        &self.signatories
    }

    // --- setters ---

    pub fn set_transaction_id(&mut self, transaction_id: TransactionId) -> Result<&mut Self, LedgerError> {
        self.require_not_frozen()?;
        self.transaction_id = Some(transaction_id);
        Ok(self)
    }

    pub fn set_node_account_ids(&mut self, node_account_ids: Vec<AccountId>) -> Result<&mut Self, LedgerError> {
        self.require_not_frozen()?;
        self.settings.set_node_account_ids(node_account_ids);
        Ok(self)
    }

    pub fn set_max_transaction_fee(&mut self, fee: u64) -> Result<&mut Self, LedgerError> {
        self.require_not_frozen()?;
        self.max_transaction_fee = Some(fee);
        Ok(self)
    }

    pub fn set_valid_duration(&mut self, duration: Duration) -> Result<&mut Self, LedgerError> {
        self.require_not_frozen()?;
        self.valid_duration = duration;
        Ok(self)
    }

    pub fn set_memo(&mut self, memo: impl Into<String>) -> Result<&mut Self, LedgerError> {
        self.require_not_frozen()?;
        let memo = memo.into();
        if memo.len() > MAX_MEMO_LENGTH {
            return Err(LedgerError::InvalidArgument(format!("memo is {} bytes, limit is {}", memo.len(), MAX_MEMO_LENGTH)));
        }
        self.memo = memo;
        Ok(self)
    }

    pub fn set_regenerate_transaction_id(&mut self, regenerate: bool) -> Result<&mut Self, LedgerError> {
        self.require_not_frozen()?;
        self.regenerate_transaction_id = Some(regenerate);
        Ok(self)
    }

    // --- freezing ---

    /// Freezes without a client; the request id and node list must already be set.
    pub fn freeze(&mut self) -> Result<&mut Self, LedgerError> {
        self.freeze_inner(None)?;
        Ok(self)
    }

    /// Freezes, filling a missing request id from the client's operator and a
    /// missing node list from the client's network. No-op once frozen.
    pub fn freeze_with(&mut self, client: &Client) -> Result<&mut Self, LedgerError> {
        self.freeze_inner(Some(client))?;
        Ok(self)
    }

    fn freeze_inner(&mut self, client: Option<&Client>) -> Result<(), LedgerError> {
        if self.is_frozen() {
            return Ok(());
        }

        if self.transaction_id.is_none() {
            let client = client.ok_or_else(|| {
                LedgerError::uninitialized("transaction id not set and no client provided to generate one")
            })?;
            let operator = client
                .operator_account_id()
                .ok_or_else(|| LedgerError::uninitialized("transaction id not set and client has no operator"))?;
            self.transaction_id = Some(TransactionId::generate(operator));
        }

        if self.settings.node_account_ids().is_empty() {
            let client = client.ok_or_else(|| {
                LedgerError::uninitialized("node account ids not set and no client provided to choose them")
            })?;
            let ids = client.network().node_account_ids_for_execute();
            if ids.is_empty() {
                return Err(LedgerError::uninitialized("client network has no nodes"));
            }
            self.settings.set_node_account_ids(ids);
        }

        self.regenerate_envelopes(client)?;
        self.transition(RequestState::Frozen)?;
        info!(
            "transaction frozen kind={} transaction_id={} nodes={}",
            D::KIND,
            self.display_id(),
            self.envelopes.len()
        );
        Ok(())
    }

    /// Body before a node account is filled in.
    fn source_body(&self, client: Option<&Client>) -> TransactionBody<D> {
        let fee = self
            .max_transaction_fee
            .or_else(|| client.and_then(Client::max_transaction_fee))
            .unwrap_or(DEFAULT_MAX_TRANSACTION_FEE);
        TransactionBody {
            transaction_id: self.transaction_id,
            node_account_id: None,
            transaction_fee: fee,
            valid_duration_secs: self.valid_duration.as_secs(),
            memo: self.memo.clone(),
            data: self.data.clone(),
        }
    }

    /// One fresh envelope per node; drops every signature and built byte.
    fn regenerate_envelopes(&mut self, client: Option<&Client>) -> Result<(), LedgerError> {
        let body = self.source_body(client);
        self.envelopes = self
            .settings
            .node_account_ids()
            .iter()
            .map(|node| Ok(PerNodeEnvelope::new(*node, codec::encode(&body.for_node(*node))?)))
            .collect::<Result<Vec<_>, LedgerError>>()?;
        Ok(())
    }

    // --- signing ---

    /// Registers a signer for every envelope. Signing happens lazily at build
    /// time; registering a key twice is a no-op.
    pub fn sign(&mut self, public_key: PublicKey, signer: SignerFn) -> Result<&mut Self, LedgerError> {
        self.require_frozen("sign")?;
        if !self.signatories.insert_signer(public_key.clone(), signer) {
            debug!("transaction sign skipped, key already registered public_key={}", public_key);
            return Ok(self);
        }
        self.invalidate_built();
        self.transition(RequestState::Signed)?;
        debug!("transaction signer registered kind={} public_key={}", D::KIND, public_key);
        Ok(self)
    }

    pub fn sign_with(&mut self, signer: Arc<dyn Signer>) -> Result<&mut Self, LedgerError> {
        let public_key = signer.public_key();
        self.sign(public_key, signer_fn(signer))
    }

    /// Freezes with the client if needed, then signs with its operator key.
    pub fn sign_with_operator(&mut self, client: &Client) -> Result<&mut Self, LedgerError> {
        let operator = client.operator().ok_or_else(|| LedgerError::uninitialized("client has no operator to sign with"))?;
        let (public_key, signer) = (operator.public_key(), operator.signer_fn());
        self.freeze_with(client)?;
        self.sign(public_key, signer)
    }

    /// Adds a signature produced elsewhere. Only valid for a request targeting
    /// exactly one node.
    pub fn add_signature(&mut self, public_key: PublicKey, signature: Vec<u8>) -> Result<&mut Self, LedgerError> {
        if self.settings.node_account_ids().len() != 1 {
            return Err(LedgerError::illegal_state("transaction does not have exactly one node account id set"));
        }
        self.require_frozen("add a signature")?;
        if self.signatories.contains(&public_key) {
            debug!("transaction add_signature skipped, key already registered public_key={}", public_key);
            return Ok(self);
        }
        let envelope = self
            .envelopes
            .first_mut()
            .ok_or_else(|| LedgerError::illegal_state("frozen transaction has no envelopes"))?;
        envelope.invalidate();
        envelope.sig_map.push(public_key.clone(), signature);
        self.signatories.insert_external(public_key);
        self.transition(RequestState::Signed)?;
        Ok(self)
    }

    /// Every signature per node and key, building envelopes first.
    pub fn get_signatures(&mut self) -> Result<SignatureList, LedgerError> {
        self.require_frozen("get signatures")?;
        let mut out = SignatureList::new();
        if self.signatories.is_empty() {
            return Ok(out);
        }
        self.build_all()?;
        for envelope in &self.envelopes {
            let per_key = out.entry(envelope.node_account_id).or_default();
            for signatory in self.signatories.iter() {
                if let Some(signature) = envelope.sig_map.get(&signatory.public_key) {
                    per_key.insert(signatory.public_key.clone(), signature.to_vec());
                }
            }
        }
        Ok(out)
    }

    // --- building ---

    /// Builds one node's envelope, signing it with every registered signer
    /// that has not signed it yet. Cached until the next signature change.
    fn build(&mut self, index: usize) -> Result<Vec<u8>, LedgerError> {
        let envelope = self
            .envelopes
            .get_mut(index)
            .ok_or_else(|| LedgerError::InvalidArgument(format!("no envelope at index {}", index)))?;
        if let Some(built) = &envelope.built {
            return Ok(built.clone());
        }
        for (public_key, signer) in self.signatories.signers() {
            if envelope.sig_map.contains(public_key) {
                continue;
            }
            let signature = signer(&envelope.body_bytes)?;
            envelope.sig_map.push(public_key.clone(), signature);
        }
        let signed = SignedTransaction { body_bytes: envelope.body_bytes.clone(), sig_map: envelope.sig_map.clone() };
        let built = codec::encode(&signed)?;
        envelope.built = Some(built.clone());
        Ok(built)
    }

    fn build_all(&mut self) -> Result<(), LedgerError> {
        for index in 0..self.envelopes.len() {
            self.build(index)?;
        }
        if self.signatories.has_pending() {
            trace!("signers applied kind={} envelopes={}", D::KIND, self.envelopes.len());
            self.signatories.mark_all_applied();
        }
        if self.is_frozen() {
            self.transition(RequestState::Built)?;
        }
        Ok(())
    }

    fn invalidate_built(&mut self) {
        for envelope in &mut self.envelopes {
            envelope.invalidate();
        }
    }

    // --- hashing ---

    /// SHA-384 of the first node's built envelope.
    pub fn transaction_hash(&mut self) -> Result<TransactionHash, LedgerError> {
        self.require_frozen("hash")?;
        let built = self.build(0)?;
        Ok(transaction_hash(&built))
    }

    pub fn transaction_hash_per_node(&mut self) -> Result<BTreeMap<AccountId, TransactionHash>, LedgerError> {
        self.require_frozen("hash")?;
        self.build_all()?;
        Ok(self
            .envelopes
            .iter()
            .filter_map(|envelope| envelope.built.as_ref().map(|built| (envelope.node_account_id, transaction_hash(built))))
            .collect())
    }

    // --- serialization ---

    /// Serializes the request. With no node list only the unsigned body is
    /// written; otherwise every envelope is built and written in node order.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>, LedgerError> {
        if self.settings.node_account_ids().is_empty() {
            return WireFormat::Body(self.source_body(None)).encode();
        }
        if !self.is_frozen() {
            self.regenerate_envelopes(None)?;
        }
        self.build_all()?;
        let transactions = self
            .envelopes
            .iter()
            .map(|envelope| {
                envelope
                    .built
                    .clone()
                    .map(|signed_transaction_bytes| WireTransaction { signed_transaction_bytes })
                    .ok_or_else(|| LedgerError::illegal_state("envelope not built"))
            })
            .collect::<Result<Vec<_>, LedgerError>>()?;
        WireFormat::<D>::List(TransactionList { transactions }).encode()
    }

    /// Restores a request from [`to_bytes`](Self::to_bytes) output or from a
    /// single envelope as submitted to a node. Envelopes keep their received
    /// bytes, so serializing the result again is byte-identical. A request
    /// carrying any signature comes back frozen.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LedgerError> {
        match WireFormat::<D>::detect(bytes)? {
            WireFormat::Body(body) => {
                let mut tx = Self::new(body.data.clone());
                tx.apply_body_fields(&body);
                Ok(tx)
            }
            WireFormat::Single(wire) => Self::from_wire(vec![wire]),
            WireFormat::List(list) => Self::from_wire(list.transactions),
        }
    }

    fn from_wire(transactions: Vec<WireTransaction>) -> Result<Self, LedgerError> {
        let mut envelopes = Vec::with_capacity(transactions.len());
        let mut first_body: Option<TransactionBody<D>> = None;
        for wire in transactions {
            let signed: SignedTransaction = codec::decode(&wire.signed_transaction_bytes)?;
            let body: TransactionBody<D> = codec::decode(&signed.body_bytes)?;
            let node = body
                .node_account_id
                .ok_or_else(|| LedgerError::InvalidArgument("envelope body has no node account id".to_string()))?;
            if let Some(first) = &first_body {
                if first.transaction_id != body.transaction_id {
                    return Err(LedgerError::InvalidArgument("envelopes carry different transaction ids".to_string()));
                }
            } else {
                first_body = Some(body);
            }
            envelopes.push(PerNodeEnvelope {
                node_account_id: node,
                body_bytes: signed.body_bytes,
                sig_map: signed.sig_map,
                built: Some(wire.signed_transaction_bytes),
            });
        }
        let body = first_body.ok_or_else(|| LedgerError::InvalidArgument("serialized transaction list is empty".to_string()))?;

        let mut tx = Self::new(body.data.clone());
        tx.apply_body_fields(&body);
        tx.settings.set_node_account_ids(envelopes.iter().map(|envelope| envelope.node_account_id).collect());
        for envelope in &envelopes {
            for pair in &envelope.sig_map.pairs {
                tx.signatories.insert_external(pair.public_key.clone());
            }
        }
        let signed = envelopes.iter().any(|envelope| !envelope.sig_map.is_empty());
        tx.envelopes = envelopes;
        if signed {
            tx.state = RequestState::Frozen;
        }
        debug!("transaction decoded kind={} nodes={} frozen={}", D::KIND, tx.envelopes.len(), signed);
        Ok(tx)
    }

    fn apply_body_fields(&mut self, body: &TransactionBody<D>) {
        self.transaction_id = body.transaction_id;
        self.max_transaction_fee = Some(body.transaction_fee);
        self.valid_duration = Duration::from_secs(body.valid_duration_secs);
        self.memo = body.memo.clone();
    }

    // --- execution ---

    pub fn execute(&mut self, client: &Client) -> Result<TransactionResponse, LedgerError> {
        self.execute_with_timeout(client, client.request_timeout())
    }

    pub fn execute_with_timeout(&mut self, client: &Client, timeout: Duration) -> Result<TransactionResponse, LedgerError> {
        let result = executor::execute_with_timeout(self, client, timeout);
        if self.is_frozen() {
            let next = if result.is_ok() { RequestState::Executed } else { RequestState::Failed };
            self.transition(next)?;
        }
        result
    }

    /// Replaces an expired request id and rebuilds every envelope under it.
    fn regenerate_transaction_id_for_retry(&mut self, client: &Client) -> Result<(), LedgerError> {
        let previous = self
            .transaction_id
            .ok_or_else(|| LedgerError::illegal_state("frozen transaction has no transaction id"))?;
        let next = TransactionId::generate(previous.account_id);
        self.transaction_id = Some(next);

        let dropped = self.signatories.reset_for_rebuild();
        if dropped > 0 {
            warn!(
                "transaction id regenerated, dropping externally supplied signatures kind={} dropped={}",
                D::KIND,
                dropped
            );
        }
        self.regenerate_envelopes(Some(client))?;
        self.transition(RequestState::Frozen)?;
        info!("transaction id regenerated kind={} previous={} next={}", D::KIND, previous, next);
        Ok(())
    }

    // --- helpers ---

    fn require_not_frozen(&self) -> Result<(), LedgerError> {
        if self.is_frozen() {
            return Err(LedgerError::illegal_state("transaction is immutable; it has at least one signature or has been explicitly frozen"));
        }
        Ok(())
    }

    fn require_frozen(&self, action: &str) -> Result<(), LedgerError> {
        if !self.is_frozen() {
            return Err(LedgerError::illegal_state(format!("transaction must be frozen to {}", action)));
        }
        Ok(())
    }

    fn transition(&mut self, to: RequestState) -> Result<(), LedgerError> {
        ensure_valid_transition(self.state, to)?;
        self.state = to;
        Ok(())
    }

    fn display_id(&self) -> String {
        self.transaction_id.map(|id| id.to_string()).unwrap_or_else(|| "none".to_string())
    }
}

impl<D: TransactionData> Executable for Transaction<D> {
    type Response = PrecheckResponse;
    type Output = TransactionResponse;

    fn settings(&self) -> &ExecutionSettings {
        &self.settings
    }

    fn settings_mut(&mut self) -> &mut ExecutionSettings {
        &mut self.settings
    }

    fn kind(&self) -> &'static str {
        D::KIND
    }

    fn method(&self) -> Method {
        Method::SubmitTransaction
    }

    fn on_execute(&mut self, client: &Client) -> Result<(), LedgerError> {
        self.freeze_with(client)?;
        let payer = self.transaction_id.map(|id| id.account_id);
        if payer.is_some() && payer == client.operator_account_id() {
            self.sign_with_operator(client)?;
        }
        Ok(())
    }

    fn build_request(&mut self, envelope_index: usize) -> Result<Vec<u8>, LedgerError> {
        let signed_transaction_bytes = self.build(envelope_index)?;
        WireFormat::<D>::Single(WireTransaction { signed_transaction_bytes }).encode()
    }

    fn decode_response(&self, bytes: &[u8]) -> Result<PrecheckResponse, LedgerError> {
        codec::decode(bytes)
    }

    fn map_status(&self, response: &PrecheckResponse) -> Status {
        response.status
    }

    fn determine_status(&mut self, status: Status, client: &Client, _response: &PrecheckResponse) -> Result<ExecutionState, LedgerError> {
        if status != Status::TransactionExpired {
            return Ok(classify(status));
        }
        let regenerate = self
            .regenerate_transaction_id
            .or_else(|| client.regenerate_transaction_id())
            .unwrap_or(DEFAULT_REGENERATE_TRANSACTION_ID);
        if !regenerate {
            return Ok(ExecutionState::RequestError);
        }
        self.regenerate_transaction_id_for_retry(client)?;
        Ok(ExecutionState::Retry)
    }

    fn map_response(&self, _response: PrecheckResponse, node_account_id: AccountId, envelope_index: usize) -> Result<TransactionResponse, LedgerError> {
        let transaction_id = self
            .transaction_id
            .ok_or_else(|| LedgerError::illegal_state("executed transaction has no transaction id"))?;
        let built = self
            .envelopes
            .get(envelope_index)
            .and_then(|envelope| envelope.built.as_ref())
            .ok_or_else(|| LedgerError::illegal_state("submitted envelope was not built"))?;
        Ok(TransactionResponse { node_id: node_account_id, transaction_id, hash: transaction_hash(built), validate_status: true })
    }

    fn request_id(&self) -> Option<TransactionId> {
        self.transaction_id
    }
}
