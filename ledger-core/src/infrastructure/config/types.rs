use crate::domain::node::NodeBackoffConfig;
use crate::foundation::{
    DEFAULT_GRPC_DEADLINE, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_BACKOFF, DEFAULT_MAX_TRANSACTION_FEE, DEFAULT_MIN_BACKOFF,
    DEFAULT_REGENERATE_TRANSACTION_ID, DEFAULT_REQUEST_TIMEOUT,
};
use figment::value::{Dict, Map};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client configuration: network, operator, execution defaults, logging.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub network: Vec<NodeEntry>,
    #[serde(default)]
    pub operator: Option<OperatorConfig>,
    #[serde(default)]
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub node_backoff: NodeBackoffConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Named override sets, applied with `load_config_from_file_with_profile`.
    #[serde(default, skip_serializing)]
    pub profiles: Option<Map<String, Dict>>,
}

/// One node address. Several entries may share an account id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeEntry {
    pub account_id: String,
    pub address: String,
}

/// Account that pays for requests and signs them by default.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct OperatorConfig {
    pub account_id: String,
    #[serde(default = "default_key_scheme")]
    pub key_scheme: String,
    #[serde(default)]
    pub private_key_hex: String,
}

fn default_key_scheme() -> String {
    "ed25519".to_string()
}

impl std::fmt::Debug for OperatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperatorConfig")
            .field("account_id", &self.account_id)
            .field("key_scheme", &self.key_scheme)
            .field("private_key_hex", &"[REDACTED]")
            .finish()
    }
}

/// Client-level execution defaults. Request-level settings override these.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Starting call-level backoff (milliseconds).
    #[serde(default = "default_min_backoff_ms")]
    pub min_backoff_ms: u64,
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
    /// Deadline of one submission to one node (milliseconds).
    #[serde(default = "default_grpc_deadline_ms")]
    pub grpc_deadline_ms: u64,
    /// Overall budget of one `execute` call (milliseconds).
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_regenerate_transaction_id")]
    pub regenerate_transaction_id: bool,
    #[serde(default = "default_max_transaction_fee")]
    pub default_max_transaction_fee: u64,
    /// Node accounts a request is frozen against; a third of the network when unset.
    #[serde(default)]
    pub max_nodes_per_request: Option<usize>,
}

const fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

const fn default_min_backoff_ms() -> u64 {
    DEFAULT_MIN_BACKOFF.as_millis() as u64
}

const fn default_max_backoff_ms() -> u64 {
    DEFAULT_MAX_BACKOFF.as_millis() as u64
}

const fn default_grpc_deadline_ms() -> u64 {
    DEFAULT_GRPC_DEADLINE.as_millis() as u64
}

const fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT.as_millis() as u64
}

const fn default_regenerate_transaction_id() -> bool {
    DEFAULT_REGENERATE_TRANSACTION_ID
}

const fn default_max_transaction_fee() -> u64 {
    DEFAULT_MAX_TRANSACTION_FEE
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            min_backoff_ms: default_min_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            grpc_deadline_ms: default_grpc_deadline_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            regenerate_transaction_id: default_regenerate_transaction_id(),
            default_max_transaction_fee: default_max_transaction_fee(),
            max_nodes_per_request: None,
        }
    }
}

impl ExecutionConfig {
    pub fn min_backoff(&self) -> Duration {
        Duration::from_millis(self.min_backoff_ms)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }

    pub fn grpc_deadline(&self) -> Duration {
        Duration::from_millis(self.grpc_deadline_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Directory for rolling log files; console only when unset.
    #[serde(default)]
    pub log_dir: Option<String>,
    /// `module=level` or `root=level` entries.
    #[serde(default)]
    pub filters: Vec<String>,
}
