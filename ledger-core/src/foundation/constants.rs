//! System-wide constants and hard-coded execution defaults.

use std::time::Duration;

/// Nanoseconds per second (10^9).
pub const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Attempts made by one `execute` call when neither the request nor the client overrides it.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Starting value of the call-level backoff that paces `SERVER_ERROR`/`RETRY` cycles.
pub const DEFAULT_MIN_BACKOFF: Duration = Duration::from_millis(250);

/// Ceiling of the call-level backoff.
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(8);

/// Deadline applied to a single submission to a single node.
pub const DEFAULT_GRPC_DEADLINE: Duration = Duration::from_secs(10);

/// Overall wall-clock budget of one `execute` call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Initial per-node backoff applied after the first failure against a node.
pub const DEFAULT_MIN_NODE_BACKOFF: Duration = Duration::from_millis(250);

/// Ceiling of the per-node backoff.
pub const DEFAULT_MAX_NODE_BACKOFF: Duration = Duration::from_secs(8);

/// Fee ceiling (tinybars) applied when neither the request nor the client sets one.
pub const DEFAULT_MAX_TRANSACTION_FEE: u64 = 200_000_000;

/// How long a request stays valid after its valid-start timestamp.
pub const DEFAULT_TRANSACTION_VALID_DURATION: Duration = Duration::from_secs(120);

/// Whether an expired request id is regenerated and the request retried.
pub const DEFAULT_REGENERATE_TRANSACTION_ID: bool = true;

/// Maximum number of chunks a chunked request may be split into.
pub const DEFAULT_MAX_CHUNKS: u32 = 20;

/// Default chunk size for file append payloads (bytes).
pub const DEFAULT_FILE_APPEND_CHUNK_SIZE: usize = 4096;

/// Default chunk size for topic message payloads (bytes).
pub const DEFAULT_TOPIC_MESSAGE_CHUNK_SIZE: usize = 1024;

/// Maximum memo length in bytes.
pub const MAX_MEMO_LENGTH: usize = 100;

/// SHA-384 digest size in bytes (used for transaction hashes).
pub const TRANSACTION_HASH_SIZE: usize = 48;

/// Ed25519 public key size in bytes.
pub const ED25519_PUBLIC_KEY_SIZE: usize = 32;

/// Compressed secp256k1 public key size in bytes.
pub const ECDSA_PUBLIC_KEY_SIZE: usize = 33;

/// Signature size for both supported schemes (64 bytes).
pub const SIGNATURE_SIZE: usize = 64;

/// Private key / seed size for both supported schemes.
pub const PRIVATE_KEY_SIZE: usize = 32;
