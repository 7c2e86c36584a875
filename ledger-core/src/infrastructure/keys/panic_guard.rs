//! Panic-safe secret cleanup.

use crate::foundation::LedgerError;
use zeroize::Zeroize;

/// Owns secret material for the span of one key operation and zeroizes it on
/// every exit path, including early returns and unwinding.
pub struct SecretPanicGuard<T: Zeroize> {
    secret: Option<T>,
}

impl<T: Zeroize> SecretPanicGuard<T> {
    pub fn new(secret: T) -> Self {
        Self { secret: Some(secret) }
    }

    pub fn get(&self) -> Result<&T, LedgerError> {
        self.secret.as_ref().ok_or_else(taken)
    }

    pub fn take(&mut self) -> Result<T, LedgerError> {
        self.secret.take().ok_or_else(taken)
    }
}

fn taken() -> LedgerError {
    LedgerError::illegal_state("secret already taken")
}

impl<T: Zeroize> Drop for SecretPanicGuard<T> {
    fn drop(&mut self) {
        if let Some(secret) = &mut self.secret {
            secret.zeroize();
        }
    }
}
