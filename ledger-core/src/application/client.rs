use crate::domain::node::NodeBackoffConfig;
use crate::domain::signing::{signer_fn, PublicKey, Signer, SignerFn};
use crate::foundation::{
    AccountId, LedgerError, DEFAULT_GRPC_DEADLINE, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_BACKOFF, DEFAULT_MAX_TRANSACTION_FEE,
    DEFAULT_MIN_BACKOFF, DEFAULT_REGENERATE_TRANSACTION_ID, DEFAULT_REQUEST_TIMEOUT,
};
use crate::infrastructure::config::{ClientConfig, NodeEntry};
use crate::infrastructure::keys::LocalSigner;
use crate::infrastructure::network::Network;
use crate::infrastructure::rpc::{LoggedChannel, NodeChannel};
use log::info;
use std::sync::Arc;
use std::time::Duration;

/// Account that pays for requests, with the key that signs for it.
#[derive(Clone)]
pub struct Operator {
    pub account_id: AccountId,
    signer: Arc<dyn Signer>,
}

impl Operator {
    pub fn new(account_id: AccountId, signer: Arc<dyn Signer>) -> Self {
        Self { account_id, signer }
    }

    pub fn public_key(&self) -> PublicKey {
        self.signer.public_key()
    }

    pub fn signer_fn(&self) -> SignerFn {
        signer_fn(self.signer.clone())
    }
}

impl std::fmt::Debug for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operator").field("account_id", &self.account_id).field("public_key", &self.public_key()).finish()
    }
}

/// Shared execution context: the network view, the operator and client-level
/// execution defaults. Unset values fall back to the crate defaults.
#[derive(Clone, Default)]
pub struct Client {
    network: Arc<Network>,
    operator: Option<Operator>,
    max_attempts: Option<u32>,
    min_backoff: Option<Duration>,
    max_backoff: Option<Duration>,
    grpc_deadline: Option<Duration>,
    request_timeout: Option<Duration>,
    regenerate_transaction_id: Option<bool>,
    max_transaction_fee: Option<u64>,
}

impl Client {
    pub fn for_network(network: Network) -> Self {
        Self { network: Arc::new(network), ..Self::default() }
    }

    /// Builds a client from validated configuration. `connect` opens the
    /// channel for each configured node address.
    pub fn from_config<F>(config: &ClientConfig, connect: F) -> Result<Self, LedgerError>
    where
        F: Fn(&NodeEntry) -> Result<Arc<dyn NodeChannel>, LedgerError>,
    {
        config.validate().map_err(|errors| LedgerError::ConfigError(format!("validation failed: {:?}", errors)))?;

        let mut network = Network::default();
        let backoff: NodeBackoffConfig = config.node_backoff;
        for entry in &config.network {
            let account_id: AccountId = entry.account_id.parse()?;
            let channel: Arc<dyn NodeChannel> = Arc::new(LoggedChannel::new(connect(entry)?, &entry.address));
            network.add_node(account_id, &entry.address, channel, backoff);
        }
        let network = network.with_max_nodes_per_request(config.execution.max_nodes_per_request);

        let execution = &config.execution;
        let mut client = Self::for_network(network);
        client.max_attempts = Some(execution.max_attempts);
        client.min_backoff = Some(execution.min_backoff());
        client.max_backoff = Some(execution.max_backoff());
        client.grpc_deadline = Some(execution.grpc_deadline());
        client.request_timeout = Some(execution.request_timeout());
        client.regenerate_transaction_id = Some(execution.regenerate_transaction_id);
        client.max_transaction_fee = Some(execution.default_max_transaction_fee);

        if let Some(operator) = config.operator.as_ref() {
            let account_id: AccountId = operator.account_id.parse()?;
            let signer = LocalSigner::from_hex(operator.key_scheme.parse()?, &operator.private_key_hex)?;
            client.operator = Some(Operator::new(account_id, Arc::new(signer)));
        }

        info!(
            "client configured nodes={} operator={}",
            client.network.nodes().len(),
            client.operator.as_ref().map(|op| op.account_id.to_string()).unwrap_or_else(|| "none".to_string())
        );
        Ok(client)
    }

    pub fn with_operator(mut self, account_id: AccountId, signer: Arc<dyn Signer>) -> Self {
        self.operator = Some(Operator::new(account_id, signer));
        self
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn operator(&self) -> Option<&Operator> {
        self.operator.as_ref()
    }

    pub fn operator_account_id(&self) -> Option<AccountId> {
        self.operator.as_ref().map(|op| op.account_id)
    }

    pub fn set_max_attempts(&mut self, attempts: u32) -> &mut Self {
        self.max_attempts = Some(attempts);
        self
    }

    pub fn set_min_backoff(&mut self, backoff: Duration) -> Result<&mut Self, LedgerError> {
        if backoff > self.max_backoff.unwrap_or(DEFAULT_MAX_BACKOFF) {
            return Err(LedgerError::InvalidArgument("minimum backoff would be larger than maximum backoff".to_string()));
        }
        self.min_backoff = Some(backoff);
        Ok(self)
    }

    pub fn set_max_backoff(&mut self, backoff: Duration) -> Result<&mut Self, LedgerError> {
        if backoff < self.min_backoff.unwrap_or(DEFAULT_MIN_BACKOFF) {
            return Err(LedgerError::InvalidArgument("maximum backoff would be smaller than minimum backoff".to_string()));
        }
        self.max_backoff = Some(backoff);
        Ok(self)
    }

    pub fn set_grpc_deadline(&mut self, deadline: Duration) -> &mut Self {
        self.grpc_deadline = Some(deadline);
        self
    }

    pub fn set_request_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn set_regenerate_transaction_id(&mut self, regenerate: bool) -> &mut Self {
        self.regenerate_transaction_id = Some(regenerate);
        self
    }

    pub fn set_max_transaction_fee(&mut self, fee: u64) -> &mut Self {
        self.max_transaction_fee = Some(fee);
        self
    }

    pub fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    pub fn min_backoff(&self) -> Option<Duration> {
        self.min_backoff
    }

    pub fn max_backoff(&self) -> Option<Duration> {
        self.max_backoff
    }

    pub fn grpc_deadline(&self) -> Option<Duration> {
        self.grpc_deadline
    }

    pub fn regenerate_transaction_id(&self) -> Option<bool> {
        self.regenerate_transaction_id
    }

    pub fn max_transaction_fee(&self) -> Option<u64> {
        self.max_transaction_fee
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("nodes", &self.network.nodes().len())
            .field("operator", &self.operator)
            .field("max_attempts", &self.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS))
            .field("grpc_deadline", &self.grpc_deadline.unwrap_or(DEFAULT_GRPC_DEADLINE))
            .field("regenerate_transaction_id", &self.regenerate_transaction_id.unwrap_or(DEFAULT_REGENERATE_TRANSACTION_ID))
            .field("max_transaction_fee", &self.max_transaction_fee.unwrap_or(DEFAULT_MAX_TRANSACTION_FEE))
            .finish()
    }
}
