//! Execution classification of node status codes.

pub use crate::foundation::Status;

/// What the execution loop does with a domain status.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExecutionState {
    /// Map the response and return it.
    Success,
    /// Node-local problem; move on to another node.
    ServerError,
    /// Not ready yet; sleep the call-level backoff and try again.
    Retry,
    /// Rejected; surface as a precheck failure.
    RequestError,
}

/// Default classification shared by every request kind.
pub fn classify(status: Status) -> ExecutionState {
    match status {
        Status::PlatformTransactionNotCreated | Status::PlatformNotActive | Status::Busy => ExecutionState::ServerError,
        Status::Ok => ExecutionState::Success,
        _ => ExecutionState::RequestError,
    }
}
