use crate::foundation::util::time::{doubled_capped, remaining_until};
use crate::foundation::{DEFAULT_MAX_NODE_BACKOFF, DEFAULT_MIN_NODE_BACKOFF};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct NodeBackoffConfig {
    /// Backoff applied after the first failure (milliseconds).
    #[serde(default = "default_min_backoff_ms")]
    pub min_backoff_ms: u64,
    /// Ceiling for the doubled backoff (milliseconds).
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

const fn default_min_backoff_ms() -> u64 {
    DEFAULT_MIN_NODE_BACKOFF.as_millis() as u64
}

const fn default_max_backoff_ms() -> u64 {
    DEFAULT_MAX_NODE_BACKOFF.as_millis() as u64
}

impl Default for NodeBackoffConfig {
    fn default() -> Self {
        Self { min_backoff_ms: default_min_backoff_ms(), max_backoff_ms: default_max_backoff_ms() }
    }
}

impl NodeBackoffConfig {
    pub fn new(min: Duration, max: Duration) -> Self {
        Self { min_backoff_ms: min.as_millis() as u64, max_backoff_ms: max.as_millis() as u64 }
    }

    pub fn min_backoff(&self) -> Duration {
        Duration::from_millis(self.min_backoff_ms)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms.max(self.min_backoff_ms))
    }
}

/// Exponential backoff clock for one node proxy.
///
/// Shared by every call that targets the node, so all updates go through the
/// internal lock.
pub struct NodeBackoff {
    cfg: NodeBackoffConfig,
    state: parking_lot::Mutex<State>,
}

#[derive(Debug)]
struct State {
    current: Duration,
    readmit_at: Option<Instant>,
    bad_responses: u32,
}

impl NodeBackoff {
    pub fn new(cfg: NodeBackoffConfig) -> Self {
        let current = cfg.min_backoff();
        Self { cfg, state: parking_lot::Mutex::new(State { current, readmit_at: None, bad_responses: 0 }) }
    }

    pub fn config(&self) -> NodeBackoffConfig {
        self.cfg
    }

    /// Records a failure: the node sits out for the current backoff, which then doubles.
    pub fn increase(&self) {
        let now = Instant::now();
        let mut guard = self.state.lock();
        guard.bad_responses = guard.bad_responses.saturating_add(1);
        guard.readmit_at = Some(now + guard.current);
        let next = doubled_capped(guard.current, self.cfg.max_backoff());
        debug!(
            "node backoff increased bad_responses={} readmit_in_ms={} next_backoff_ms={}",
            guard.bad_responses,
            guard.current.as_millis(),
            next.as_millis()
        );
        guard.current = next;
    }

    /// Records a transport-level success: the backoff halves toward the minimum.
    pub fn decrease(&self) {
        let mut guard = self.state.lock();
        let next = (guard.current / 2).max(self.cfg.min_backoff());
        if next != guard.current {
            trace!("node backoff decreased from_ms={} to_ms={}", guard.current.as_millis(), next.as_millis());
        }
        guard.current = next;
    }

    pub fn current(&self) -> Duration {
        self.state.lock().current
    }

    pub fn bad_responses(&self) -> u32 {
        self.state.lock().bad_responses
    }

    pub fn remaining(&self) -> Duration {
        let guard = self.state.lock();
        guard.readmit_at.map(remaining_until).unwrap_or(Duration::ZERO)
    }

    pub fn is_backing_off(&self) -> bool {
        !self.remaining().is_zero()
    }
}
