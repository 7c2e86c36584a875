#![allow(dead_code)]

use std::time::Duration;

pub const TEST_OPERATOR_NUM: u64 = 1001;
pub const TEST_OPERATOR_SEED: [u8; 32] = [0x11; 32];
pub const TEST_NODE_NUMS: [u64; 3] = [3, 4, 5];
pub const TEST_VALID_START_SECS: u64 = 1_700_000_000;
pub const TEST_MEMO: &str = "ledger-core tests";

/// Small enough that backoff sleeps do not slow the suite down.
pub const TEST_MIN_BACKOFF: Duration = Duration::from_millis(1);
pub const TEST_MAX_BACKOFF: Duration = Duration::from_millis(8);
