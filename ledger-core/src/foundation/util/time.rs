use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Returns the current wall-clock timestamp in nanoseconds since the Unix epoch.
/// A clock set before the epoch reads as zero.
pub fn now_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|now| now.as_secs().saturating_mul(1_000_000_000).saturating_add(u64::from(now.subsec_nanos())))
        .unwrap_or(0)
}

/// Time left until `deadline`, zero once it has passed.
pub fn remaining_until(deadline: Instant) -> Duration {
    deadline.saturating_duration_since(Instant::now())
}

/// Doubles `current`, clamped to `max`.
pub fn doubled_capped(current: Duration, max: Duration) -> Duration {
    current.checked_mul(2).map(|next| next.min(max)).unwrap_or(max)
}
