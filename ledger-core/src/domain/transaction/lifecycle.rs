use crate::foundation::LedgerError;
use log::{debug, warn};
use std::fmt;

/// Lifecycle of a signed request.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum RequestState {
    #[default]
    Unconfigured,
    Frozen,
    Signed,
    Built,
    Executed,
    Failed,
}

const VALID_TRANSITIONS: &[(RequestState, RequestState)] = &[
    (RequestState::Unconfigured, RequestState::Frozen),
    (RequestState::Frozen, RequestState::Signed),
    (RequestState::Frozen, RequestState::Built),
    (RequestState::Signed, RequestState::Built),
    (RequestState::Built, RequestState::Signed),
    // Request id regeneration replaces every envelope.
    (RequestState::Signed, RequestState::Frozen),
    (RequestState::Built, RequestState::Frozen),
    (RequestState::Frozen, RequestState::Executed),
    (RequestState::Signed, RequestState::Executed),
    (RequestState::Built, RequestState::Executed),
    (RequestState::Frozen, RequestState::Failed),
    (RequestState::Signed, RequestState::Failed),
    (RequestState::Built, RequestState::Failed),
    // A finished request may be signed, serialized and submitted again.
    (RequestState::Executed, RequestState::Signed),
    (RequestState::Executed, RequestState::Built),
    (RequestState::Executed, RequestState::Frozen),
    (RequestState::Executed, RequestState::Failed),
    (RequestState::Failed, RequestState::Signed),
    (RequestState::Failed, RequestState::Built),
    (RequestState::Failed, RequestState::Frozen),
    (RequestState::Failed, RequestState::Executed),
];

impl RequestState {
    /// True once the node list and request id are fixed.
    pub fn is_frozen(&self) -> bool {
        !matches!(self, RequestState::Unconfigured)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestState::Executed | RequestState::Failed)
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

pub fn is_valid_transition(from: RequestState, to: RequestState) -> bool {
    from == to || VALID_TRANSITIONS.contains(&(from, to))
}

pub fn ensure_valid_transition(from: RequestState, to: RequestState) -> Result<(), LedgerError> {
    if is_valid_transition(from, to) {
        if from != to {
            debug!("request state transition from={} to={}", from, to);
        }
        return Ok(());
    }
    warn!("invalid request state transition from={} to={}", from, to);
    Err(LedgerError::IllegalState(format!("request cannot move from {} to {}", from, to)))
}
