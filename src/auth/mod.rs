//! Authentication for the single shared credential, with an optional TOTP
//! second factor and one-time backup codes.
//!
//! There is exactly one principal. The password comes from configuration and
//! never touches the state store; the second-factor record is the only
//! persisted credential material and exists iff enrollment has completed.

pub mod backup;
pub mod enroll;
pub mod password;
pub mod session;
pub mod totp;

use crate::store::StoreError;
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

pub use enroll::EnrollmentMaterial;
pub use session::Admission;
pub use totp::TotpEngine;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid password")]
    InvalidPassword,
    #[error("second factor token required")]
    TokenRequired,
    #[error("invalid second factor token")]
    InvalidToken,
    #[error("second factor already enrolled")]
    AlreadyEnrolled,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    /// Wire-level reason code for the user-facing rejections.
    #[must_use]
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            Self::InvalidPassword => Some("invalid_password"),
            Self::TokenRequired => Some("token_required"),
            Self::InvalidToken => Some("invalid_token"),
            Self::AlreadyEnrolled => Some("already_enrolled"),
            Self::Store(_) | Self::Internal(_) => None,
        }
    }
}

/// Persisted second-factor enrollment. Present iff enrollment completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondFactorRecord {
    /// Base32-encoded TOTP seed.
    pub secret: String,
    /// Remaining single-use backup codes, stored normalized (uppercase).
    pub backup_codes: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Process-wide authentication configuration.
pub struct AuthConfig {
    access_password: SecretString,
    totp: TotpEngine,
}

impl AuthConfig {
    #[must_use]
    pub fn new(access_password: SecretString, totp: TotpEngine) -> Self {
        Self {
            access_password,
            totp,
        }
    }

    #[must_use]
    pub fn access_password(&self) -> &SecretString {
        &self.access_password
    }

    #[must_use]
    pub fn totp(&self) -> &TotpEngine {
        &self.totp
    }
}
