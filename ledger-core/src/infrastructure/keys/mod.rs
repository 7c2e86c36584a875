//! In-process signing keys.

pub mod local_signer;
pub mod panic_guard;
pub mod secret;

pub use local_signer::LocalSigner;
pub use panic_guard::SecretPanicGuard;
pub use secret::SecretBytes;
