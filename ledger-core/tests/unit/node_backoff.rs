use ledger_core::domain::node::{NodeBackoff, NodeBackoffConfig};
use proptest::prelude::*;
use std::time::Duration;

proptest! {
    #[test]
    fn test_backoff_after_k_failures_is_min_doubled_k_times_capped(k in 0u32..24) {
        let backoff = NodeBackoff::new(NodeBackoffConfig::new(Duration::from_millis(250), Duration::from_millis(8000)));
        for _ in 0..k {
            backoff.increase();
        }
        let expected = 250u64.saturating_mul(1u64 << k.min(40)).min(8000);
        prop_assert_eq!(backoff.current(), Duration::from_millis(expected));
        prop_assert_eq!(backoff.bad_responses(), k);
    }

    #[test]
    fn test_backoff_never_leaves_configured_range(ops in proptest::collection::vec(any::<bool>(), 0..64)) {
        let backoff = NodeBackoff::new(NodeBackoffConfig::new(Duration::from_millis(250), Duration::from_millis(8000)));
        for increase in ops {
            if increase { backoff.increase() } else { backoff.decrease() }
            prop_assert!(backoff.current() >= Duration::from_millis(250));
            prop_assert!(backoff.current() <= Duration::from_millis(8000));
        }
    }
}

#[test]
fn test_backoff_when_fresh_then_not_backing_off() {
    let backoff = NodeBackoff::new(NodeBackoffConfig::default());
    assert!(!backoff.is_backing_off());
    assert_eq!(backoff.remaining(), Duration::ZERO);
}
