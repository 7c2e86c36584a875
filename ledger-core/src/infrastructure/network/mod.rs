//! Client view of the node network.

pub mod node;

pub use node::Node;

use crate::domain::node::{NodeBackoffConfig, NodeHealth};
use crate::foundation::{AccountId, LedgerError};
use crate::infrastructure::rpc::NodeChannel;
use log::{debug, info};
use rand::seq::SliceRandom;
use std::sync::Arc;
use std::time::Duration;

/// A node proxy chosen for one call, paired with the envelope it must carry.
#[derive(Clone, Debug)]
pub struct ResolvedNode {
    pub node: Arc<Node>,
    /// Position of the node's envelope in the request's node list.
    pub envelope_index: usize,
}

impl NodeHealth for ResolvedNode {
    fn is_healthy(&self) -> bool {
        self.node.is_healthy()
    }

    fn remaining_backoff(&self) -> Duration {
        self.node.remaining_backoff()
    }
}

#[derive(Default)]
pub struct Network {
    nodes: Vec<Arc<Node>>,
    max_nodes_per_request: Option<usize>,
}

impl Network {
    pub fn new(nodes: Vec<Arc<Node>>) -> Self {
        Self { nodes, max_nodes_per_request: None }
    }

    pub fn with_max_nodes_per_request(mut self, max: Option<usize>) -> Self {
        self.max_nodes_per_request = max.filter(|max| *max > 0);
        self
    }

    pub fn add_node(&mut self, account_id: AccountId, address: &str, channel: Arc<dyn NodeChannel>, backoff: NodeBackoffConfig) {
        info!("network node added account_id={} address={}", account_id, address);
        self.nodes.push(Arc::new(Node::new(account_id, address, channel, backoff)));
    }

    pub fn nodes(&self) -> &[Arc<Node>] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Distinct node accounts, in insertion order.
    pub fn node_account_ids(&self) -> Vec<AccountId> {
        let mut ids: Vec<AccountId> = Vec::new();
        for node in &self.nodes {
            if !ids.contains(&node.account_id()) {
                ids.push(node.account_id());
            }
        }
        ids
    }

    pub fn proxies_for(&self, account_id: AccountId) -> Vec<Arc<Node>> {
        self.nodes.iter().filter(|node| node.account_id() == account_id).cloned().collect()
    }

    /// Node accounts a new request should be frozen against.
    ///
    /// Takes `max_nodes_per_request` accounts, or a third of the network
    /// (rounded up) when unset. Healthy accounts come first in random order,
    /// then the rest by how soon their backoff ends.
    pub fn node_account_ids_for_execute(&self) -> Vec<AccountId> {
        let ids = self.node_account_ids();
        let count = self.max_nodes_per_request.unwrap_or_else(|| ids.len().div_ceil(3)).min(ids.len());

        let mut healthy = Vec::new();
        let mut unhealthy = Vec::new();
        for id in ids {
            let proxies = self.proxies_for(id);
            if proxies.iter().any(|node| node.is_healthy()) {
                healthy.push(id);
            } else {
                let remaining = proxies.iter().map(|node| node.remaining_backoff()).min().unwrap_or_default();
                unhealthy.push((id, remaining));
            }
        }
        healthy.shuffle(&mut rand::thread_rng());
        unhealthy.sort_by_key(|(_, remaining)| *remaining);

        let selected: Vec<AccountId> =
            healthy.into_iter().chain(unhealthy.into_iter().map(|(id, _)| id)).take(count).collect();
        debug!("network nodes for execute count={} selected={:?}", count, selected);
        selected
    }

    /// Maps a request's node list to the proxies an execution may use.
    ///
    /// A single account uses every proxy of that account. Several accounts use
    /// one random proxy each.
    pub fn resolve(&self, node_account_ids: &[AccountId]) -> Result<Vec<ResolvedNode>, LedgerError> {
        let mut resolved = Vec::with_capacity(node_account_ids.len());
        let single = node_account_ids.len() == 1;
        for (envelope_index, id) in node_account_ids.iter().enumerate() {
            let proxies = self.proxies_for(*id);
            if proxies.is_empty() {
                return Err(LedgerError::illegal_state(format!(
                    "node account id {} did not map to a valid node in the client network",
                    id
                )));
            }
            if single {
                resolved.extend(proxies.into_iter().map(|node| ResolvedNode { node, envelope_index }));
            } else if let Some(node) = proxies.choose(&mut rand::thread_rng()) {
                resolved.push(ResolvedNode { node: node.clone(), envelope_index });
            }
        }
        Ok(resolved)
    }
}
