//! Transport seam between the execution engine and one node.

use std::fmt;
use std::time::Instant;

pub mod logged;
pub mod mock;

pub use logged::LoggedChannel;
pub use mock::MockChannel;

/// Remote procedure a request is routed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    SubmitTransaction,
    GetReceipt,
}

impl Method {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SubmitTransaction => "submit_transaction",
            Self::GetReceipt => "get_receipt",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport-level failure of one submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportCode {
    Unavailable,
    ResourceExhausted,
    Internal,
    DeadlineExceeded,
    Other(String),
}

impl TransportCode {
    /// Transient failures are absorbed by the engine: the node backs off and
    /// the next attempt moves on.
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for TransportCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => f.write_str("UNAVAILABLE"),
            Self::ResourceExhausted => f.write_str("RESOURCE_EXHAUSTED"),
            Self::Internal => f.write_str("INTERNAL"),
            Self::DeadlineExceeded => f.write_str("DEADLINE_EXCEEDED"),
            Self::Other(details) => write!(f, "OTHER({})", details),
        }
    }
}

/// An already-open bidirectional channel to one node.
///
/// Implementations must be safe to share across concurrent calls.
pub trait NodeChannel: Send + Sync {
    /// Sends opaque request bytes and returns opaque response bytes.
    fn submit(&self, method: Method, request: &[u8], deadline: Instant) -> Result<Vec<u8>, TransportCode>;

    /// Whether the channel can carry a request before `deadline`.
    fn is_connected(&self, deadline: Instant) -> bool;

    /// Explicit failure flag, read without waiting. Polls the connection with
    /// an already-expired deadline unless the channel tracks its own state.
    fn is_failed(&self) -> bool {
        !self.is_connected(Instant::now())
    }
}
