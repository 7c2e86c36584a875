use ledger_core::domain::node::{select_node, NodeHealth};
use std::time::Duration;

struct StubNode {
    healthy: bool,
    remaining: Duration,
}

impl NodeHealth for StubNode {
    fn is_healthy(&self) -> bool {
        self.healthy
    }

    fn remaining_backoff(&self) -> Duration {
        self.remaining
    }
}

fn backing_off(ms: u64) -> StubNode {
    StubNode { healthy: false, remaining: Duration::from_millis(ms) }
}

fn healthy() -> StubNode {
    StubNode { healthy: true, remaining: Duration::ZERO }
}

#[test]
fn test_select_node_when_middle_healthy_then_picked_until_it_backs_off_too() {
    let mut nodes = [backing_off(500), healthy(), backing_off(100)];
    assert_eq!(select_node(&nodes, 0), Some(1));

    nodes[1] = backing_off(300);
    assert_eq!(select_node(&nodes, 0), Some(2));
}

#[test]
fn test_select_node_when_all_backing_off_then_soonest_readmitted() {
    let nodes = [backing_off(500), backing_off(100)];
    assert_eq!(select_node(&nodes, 0), Some(1));
    assert_eq!(select_node(&nodes, 1), Some(1));
}

#[test]
fn test_select_node_when_healthy_then_round_robin_by_attempt() {
    let nodes = [healthy(), healthy(), healthy()];
    let picks: Vec<_> = (0..6).map(|attempt| select_node(&nodes, attempt)).collect();
    assert_eq!(picks, vec![Some(0), Some(1), Some(2), Some(0), Some(1), Some(2)]);
}

#[test]
fn test_select_node_when_start_backing_off_then_next_healthy_in_scan() {
    let nodes = [healthy(), backing_off(50), healthy()];
    assert_eq!(select_node(&nodes, 1), Some(2));
}
