use crate::domain::node::{NodeBackoff, NodeBackoffConfig, NodeHealth};
use crate::foundation::AccountId;
use crate::infrastructure::rpc::NodeChannel;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Client-side proxy for one address of one logical node.
///
/// A node account may be reachable through several proxies; each keeps its
/// own backoff clock.
pub struct Node {
    account_id: AccountId,
    address: String,
    channel: Arc<dyn NodeChannel>,
    backoff: NodeBackoff,
}

impl Node {
    pub fn new(account_id: AccountId, address: impl Into<String>, channel: Arc<dyn NodeChannel>, backoff: NodeBackoffConfig) -> Self {
        Self { account_id, address: address.into(), channel, backoff: NodeBackoff::new(backoff) }
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn channel(&self) -> &dyn NodeChannel {
        self.channel.as_ref()
    }

    pub fn backoff(&self) -> &NodeBackoff {
        &self.backoff
    }

    pub fn is_connected(&self, deadline: Instant) -> bool {
        self.channel.is_connected(deadline)
    }

    pub fn increase_backoff(&self) {
        self.backoff.increase();
    }

    pub fn decrease_backoff(&self) {
        self.backoff.decrease();
    }
}

impl NodeHealth for Node {
    /// Healthy when the channel is not flagged failed and no backoff remains.
    fn is_healthy(&self) -> bool {
        !self.channel.is_failed() && !self.backoff.is_backing_off()
    }

    fn remaining_backoff(&self) -> Duration {
        self.backoff.remaining()
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("account_id", &self.account_id)
            .field("address", &self.address)
            .field("backoff_ms", &self.backoff.current().as_millis())
            .finish()
    }
}
