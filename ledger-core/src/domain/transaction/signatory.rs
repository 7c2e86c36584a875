use crate::domain::signing::{PublicKey, SignerFn};
use std::fmt;

/// How a registered key contributes signatures.
#[derive(Clone)]
pub enum SignatoryState {
    /// Signer registered; not yet applied to every envelope.
    Pending(SignerFn),
    /// Signer applied to every envelope. Kept so signatures can be replayed
    /// after the request id is regenerated.
    AppliedBySigner(SignerFn),
    /// Signature bytes were supplied directly; there is nothing to replay.
    AppliedExternally,
}

impl SignatoryState {
    pub fn signer(&self) -> Option<&SignerFn> {
        match self {
            Self::Pending(signer) | Self::AppliedBySigner(signer) => Some(signer),
            Self::AppliedExternally => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Pending(_) => "pending",
            Self::AppliedBySigner(_) => "applied_by_signer",
            Self::AppliedExternally => "applied_externally",
        }
    }
}

impl fmt::Debug for SignatoryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug)]
pub struct Signatory {
    pub public_key: PublicKey,
    pub state: SignatoryState,
}

/// Registered keys of one request, in registration order. A key appears at most once.
#[derive(Clone, Debug, Default)]
pub struct Signatories {
    entries: Vec<Signatory>,
}

impl Signatories {
    pub fn contains(&self, key: &PublicKey) -> bool {
        self.entries.iter().any(|entry| &entry.public_key == key)
    }

    /// Registers a signer. Returns `false` when the key is already present.
    pub fn insert_signer(&mut self, public_key: PublicKey, signer: SignerFn) -> bool {
        if self.contains(&public_key) {
            return false;
        }
        self.entries.push(Signatory { public_key, state: SignatoryState::Pending(signer) });
        true
    }

    /// Registers a key whose signature is already in the envelopes.
    pub fn insert_external(&mut self, public_key: PublicKey) -> bool {
        if self.contains(&public_key) {
            return false;
        }
        self.entries.push(Signatory { public_key, state: SignatoryState::AppliedExternally });
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &Signatory> {
        self.entries.iter()
    }

    /// Keys that hold a signer closure, with that closure.
    pub fn signers(&self) -> impl Iterator<Item = (&PublicKey, &SignerFn)> {
        self.entries.iter().filter_map(|entry| entry.state.signer().map(|signer| (&entry.public_key, signer)))
    }

    pub fn mark_all_applied(&mut self) {
        for entry in &mut self.entries {
            if let SignatoryState::Pending(signer) = &entry.state {
                entry.state = SignatoryState::AppliedBySigner(signer.clone());
            }
        }
    }

    /// Prepares for rebuilt envelopes: signers go back to pending and externally
    /// applied keys are dropped, returning how many were dropped.
    pub fn reset_for_rebuild(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| !matches!(entry.state, SignatoryState::AppliedExternally));
        for entry in &mut self.entries {
            if let SignatoryState::AppliedBySigner(signer) = &entry.state {
                entry.state = SignatoryState::Pending(signer.clone());
            }
        }
        before - self.entries.len()
    }

    pub fn has_pending(&self) -> bool {
        self.entries.iter().any(|entry| matches!(entry.state, SignatoryState::Pending(_)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
