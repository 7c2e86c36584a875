use crate::foundation::constants::{NANOS_PER_SECOND, TRANSACTION_HASH_SIZE};
use crate::foundation::util::time::now_nanos;
use crate::foundation::LedgerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

pub type Hash48 = [u8; TRANSACTION_HASH_SIZE];

macro_rules! define_hash_type {
    ($name:ident, $len:expr) => {
        #[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
        pub struct $name([u8; $len]);

        impl $name {
            pub const fn new(value: [u8; $len]) -> Self {
                Self(value)
            }

            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            pub fn ct_eq(&self, other: &Self) -> bool {
                use subtle::ConstantTimeEq;
                bool::from(self.0.as_ref().ct_eq(other.0.as_ref()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                for byte in self.0 {
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl FromStr for $name {
            type Err = LedgerError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                let stripped = trimmed.strip_prefix("0x").unwrap_or(trimmed);
                let bytes = hex::decode(stripped)?;
                let array: [u8; $len] = bytes.as_slice().try_into().map_err(|_| {
                    LedgerError::ParseError(format!("expected {} bytes for {}, got {}", $len, stringify!($name), bytes.len()))
                })?;
                Ok(Self(array))
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl Deref for $name {
            type Target = [u8; $len];
            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(value: [u8; $len]) -> Self {
                Self(value)
            }
        }
    };
}

define_hash_type!(TransactionHash, TRANSACTION_HASH_SIZE);

/// Ledger entity identifier in `shard.realm.num` form.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Ord, Deserialize, Serialize)]
pub struct AccountId {
    pub shard: u64,
    pub realm: u64,
    pub num: u64,
}

impl AccountId {
    pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
        Self { shard, realm, num }
    }

    pub const fn from_num(num: u64) -> Self {
        Self { shard: 0, realm: 0, num }
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

impl FromStr for AccountId {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('.').collect();
        let [shard, realm, num] = parts.as_slice() else {
            return Err(LedgerError::ParseError(format!("entity id must be shard.realm.num: got '{}'", s)));
        };
        let parse = |part: &str| part.parse::<u64>().map_err(|err| LedgerError::ParseError(format!("entity id '{}': {}", s, err)));
        Ok(Self { shard: parse(shard)?, realm: parse(realm)?, num: parse(num)? })
    }
}

/// Seconds + nanos since the unix epoch.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Ord, Deserialize, Serialize)]
pub struct Timestamp {
    pub seconds: u64,
    pub nanos: u32,
}

impl Timestamp {
    pub const fn new(seconds: u64, nanos: u32) -> Self {
        Self { seconds, nanos }
    }

    pub fn from_nanos(total: u64) -> Self {
        Self { seconds: total / NANOS_PER_SECOND, nanos: (total % NANOS_PER_SECOND) as u32 }
    }

    pub fn now() -> Self {
        Self::from_nanos(now_nanos())
    }

    pub fn as_nanos(&self) -> u64 {
        self.seconds.saturating_mul(NANOS_PER_SECOND).saturating_add(u64::from(self.nanos))
    }

    pub fn plus_nanos(&self, nanos: u64) -> Self {
        Self::from_nanos(self.as_nanos().saturating_add(nanos))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.seconds, self.nanos)
    }
}

impl FromStr for Timestamp {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (seconds, nanos) = s
            .split_once('.')
            .ok_or_else(|| LedgerError::ParseError(format!("timestamp must be seconds.nanos: got '{}'", s)))?;
        let seconds = seconds.parse::<u64>().map_err(|err| LedgerError::ParseError(format!("timestamp seconds '{}': {}", s, err)))?;
        let nanos = nanos.parse::<u32>().map_err(|err| LedgerError::ParseError(format!("timestamp nanos '{}': {}", s, err)))?;
        if u64::from(nanos) >= NANOS_PER_SECOND {
            return Err(LedgerError::ParseError(format!("timestamp nanos out of range: '{}'", s)));
        }
        Ok(Self { seconds, nanos })
    }
}

/// Identity of one logical request: payer account + valid-start timestamp.
///
/// Shared by every per-node envelope of the request and by every retry, so the
/// network can deduplicate and receipts can be re-queried idempotently.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Deserialize, Serialize)]
pub struct TransactionId {
    pub account_id: AccountId,
    pub valid_start: Timestamp,
    pub scheduled: bool,
    pub nonce: u32,
}

impl TransactionId {
    pub fn with_valid_start(account_id: AccountId, valid_start: Timestamp) -> Self {
        Self { account_id, valid_start, scheduled: false, nonce: 0 }
    }

    /// Fresh id for `account_id` starting now.
    pub fn generate(account_id: AccountId) -> Self {
        Self::with_valid_start(account_id, Timestamp::now())
    }

    pub fn with_scheduled(mut self, scheduled: bool) -> Self {
        self.scheduled = scheduled;
        self
    }

    pub fn with_nonce(mut self, nonce: u32) -> Self {
        self.nonce = nonce;
        self
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.account_id, self.valid_start)?;
        if self.scheduled {
            f.write_str("?scheduled")?;
        }
        if self.nonce != 0 {
            write!(f, "/{}", self.nonce)?;
        }
        Ok(())
    }
}

impl FromStr for TransactionId {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rest = s.trim();
        let mut nonce = 0;
        if let Some((head, tail)) = rest.rsplit_once('/') {
            nonce = tail.parse::<u32>().map_err(|err| LedgerError::ParseError(format!("transaction id nonce '{}': {}", s, err)))?;
            rest = head;
        }
        let mut scheduled = false;
        if let Some(head) = rest.strip_suffix("?scheduled") {
            scheduled = true;
            rest = head;
        }
        let (account, start) = rest
            .split_once('@')
            .ok_or_else(|| LedgerError::ParseError(format!("transaction id must be account@seconds.nanos: got '{}'", s)))?;
        Ok(Self { account_id: account.parse()?, valid_start: start.parse()?, scheduled, nonce })
    }
}
