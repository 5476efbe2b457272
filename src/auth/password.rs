//! Shared-credential verification.

use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

/// Compare a supplied password against the configured credential.
///
/// Runs in time independent of where the first mismatch occurs.
#[must_use]
pub fn verify(candidate: &str, configured: &SecretString) -> bool {
    constant_time_eq(
        candidate.as_bytes(),
        configured.expose_secret().as_bytes(),
    )
}

/// Constant-time byte comparison via the `subtle` crate. Slices of different
/// length compare unequal without an early exit on content.
pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_password_verifies() {
        let configured = SecretString::from("hunter2".to_string());
        assert!(verify("hunter2", &configured));
    }

    #[test]
    fn wrong_password_is_rejected() {
        let configured = SecretString::from("hunter2".to_string());
        assert!(!verify("hunter3", &configured));
        assert!(!verify("hunter", &configured));
        assert!(!verify("", &configured));
        assert!(!verify("hunter2 ", &configured));
    }
}
