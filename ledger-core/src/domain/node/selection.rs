use std::sync::Arc;
use std::time::Duration;

/// Health view of a node proxy, as seen by the selector.
pub trait NodeHealth {
    fn is_healthy(&self) -> bool;
    fn remaining_backoff(&self) -> Duration;
}

impl<T: NodeHealth + ?Sized> NodeHealth for Arc<T> {
    fn is_healthy(&self) -> bool {
        (**self).is_healthy()
    }

    fn remaining_backoff(&self) -> Duration {
        (**self).remaining_backoff()
    }
}

/// Picks the node for `attempt`.
///
/// Scans once around the list starting at `attempt % len` and returns the first
/// healthy node. When none is healthy, returns the node whose backoff expires
/// soonest; ties go to the earlier node in scan order. `None` only for an empty list.
pub fn select_node<N: NodeHealth>(nodes: &[N], attempt: u32) -> Option<usize> {
    if nodes.is_empty() {
        return None;
    }
    let len = nodes.len();
    let start = attempt as usize % len;
    let mut candidate: Option<(usize, Duration)> = None;
    for offset in 0..len {
        let index = (start + offset) % len;
        let node = &nodes[index];
        if node.is_healthy() {
            return Some(index);
        }
        let remaining = node.remaining_backoff();
        match candidate {
            Some((_, best)) if remaining >= best => {}
            _ => candidate = Some((index, remaining)),
        }
    }
    candidate.map(|(index, _)| index)
}
