//! TOTP engine: RFC 6238 with SHA-1, 6 digits, 30-second step, compatible
//! with common authenticator apps.
//!
//! Digits and step are embedded in the provisioning URI shown at enrollment;
//! changing either afterwards invalidates every configured authenticator, so
//! they are fixed constants here, not configuration.

use anyhow::{anyhow, Result};
use regex::Regex;
use std::time::{SystemTime, UNIX_EPOCH};
use totp_rs::{Algorithm, Secret, TOTP};
use tracing::warn;

pub const TOTP_DIGITS: usize = 6;
pub const TOTP_STEP_SECONDS: u64 = 30;
/// Accepted clock drift, in steps, in each direction.
pub const TOTP_WINDOW_STEPS: u8 = 2;

/// Material handed to the user exactly once at enrollment.
#[derive(Debug)]
pub struct EnrollmentSecret {
    /// Base32-encoded seed, for manual entry.
    pub secret: String,
    /// otpauth:// URI for QR rendering by the client.
    pub provisioning_uri: String,
}

#[derive(Clone)]
pub struct TotpEngine {
    issuer: String,
}

impl TotpEngine {
    #[must_use]
    pub fn new(issuer: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
        }
    }

    /// Generate a fresh 160-bit seed and the provisioning URI embedding it.
    ///
    /// # Errors
    /// Returns an error if the generated seed is rejected by the TOTP
    /// construction.
    pub fn generate_secret(&self, account: &str) -> Result<EnrollmentSecret> {
        let secret = Secret::generate_secret();
        let encoded = secret.to_encoded().to_string();
        let totp = self.build(&encoded, account)?;

        Ok(EnrollmentSecret {
            secret: totp.get_secret_base32(),
            provisioning_uri: totp.get_url(),
        })
    }

    /// Code for the time step containing `time` (seconds since epoch).
    ///
    /// # Errors
    /// Returns an error if the stored seed cannot be decoded.
    pub fn code_at(&self, secret_base32: &str, time: u64) -> Result<String> {
        Ok(self.build(secret_base32, "operator")?.generate(time))
    }

    /// Verify a candidate code at `time`, tolerating `TOTP_WINDOW_STEPS`
    /// steps of drift in each direction.
    ///
    /// Candidates that are not exactly six digits are rejected before any
    /// code is computed. A seed that fails to decode logs and rejects rather
    /// than erroring; the code space is public and time-bounded, so nothing
    /// is leaked by the uniform `false`.
    #[must_use]
    pub fn verify_at(&self, secret_base32: &str, candidate: &str, time: u64) -> bool {
        if !well_formed(candidate) {
            return false;
        }

        match self.build(secret_base32, "operator") {
            Ok(totp) => totp.check(candidate, time),
            Err(error) => {
                warn!("TOTP verification failed to load seed: {error}");
                false
            }
        }
    }

    /// Verify against the current wall clock.
    #[must_use]
    pub fn verify_now(&self, secret_base32: &str, candidate: &str) -> bool {
        self.verify_at(secret_base32, candidate, unix_now())
    }

    fn build(&self, secret_base32: &str, account: &str) -> Result<TOTP> {
        TOTP::new(
            Algorithm::SHA1,
            TOTP_DIGITS,
            TOTP_WINDOW_STEPS,
            TOTP_STEP_SECONDS,
            Secret::Encoded(secret_base32.to_string())
                .to_bytes()
                .map_err(|e| anyhow!("Invalid TOTP secret: {e:?}"))?,
            Some(self.issuer.clone()),
            account.to_string(),
        )
        .map_err(|e| anyhow!("Failed to create TOTP: {e}"))
    }
}

/// Exactly six ASCII digits, checked before any HMAC work.
fn well_formed(candidate: &str) -> bool {
    Regex::new(r"^[0-9]{6}$").map_or(false, |re| re.is_match(candidate))
}

pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: u64 = 1_700_000_010;

    fn engine() -> TotpEngine {
        TotpEngine::new("opsboard-test")
    }

    #[test]
    fn generated_secret_has_provisioning_uri() {
        let material = engine().generate_secret("operator").unwrap();
        assert!(material.provisioning_uri.starts_with("otpauth://totp/"));
        assert!(material
            .provisioning_uri
            .contains(&format!("secret={}", material.secret)));
        assert!(material.provisioning_uri.contains("issuer=opsboard-test"));
    }

    #[test]
    fn round_trip_verifies() {
        let engine = engine();
        let material = engine.generate_secret("operator").unwrap();
        let code = engine.code_at(&material.secret, T0).unwrap();

        assert_eq!(code.len(), TOTP_DIGITS);
        assert!(engine.verify_at(&material.secret, &code, T0));
    }

    #[test]
    fn window_tolerates_two_steps_not_three() {
        let engine = engine();
        let material = engine.generate_secret("operator").unwrap();
        let code = engine.code_at(&material.secret, T0).unwrap();

        assert!(engine.verify_at(&material.secret, &code, T0 + 2 * TOTP_STEP_SECONDS));
        assert!(engine.verify_at(&material.secret, &code, T0.saturating_sub(2 * TOTP_STEP_SECONDS)));
        assert!(!engine.verify_at(&material.secret, &code, T0 + 3 * TOTP_STEP_SECONDS));
    }

    #[test]
    fn malformed_candidates_fail_fast() {
        let engine = engine();
        let material = engine.generate_secret("operator").unwrap();

        for candidate in ["", "12345", "1234567", "12345a", "12 456", "一二三四五六"] {
            assert!(!engine.verify_at(&material.secret, candidate, T0));
        }
    }

    #[test]
    fn undecodable_seed_rejects() {
        assert!(!engine().verify_at("not base32!!", "123456", T0));
    }
}
