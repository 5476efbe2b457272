//! One-shot second-factor enrollment.
//!
//! Gated by the password alone: no second factor exists yet to ask for.
//! The returned material is the only moment the raw secret and the backup
//! codes are ever disclosed; afterwards the system only reports presence.

use crate::{
    auth::{backup, password, AuthConfig, AuthError, SecondFactorRecord},
    store::Store,
};
use chrono::Utc;
use tracing::info;

/// Account label embedded in the provisioning URI.
const TOTP_ACCOUNT: &str = "operator";

/// Disclosed to the caller exactly once.
#[derive(Debug)]
pub struct EnrollmentMaterial {
    pub secret: String,
    pub provisioning_uri: String,
    pub backup_codes: Vec<String>,
}

/// Enroll the second factor: verify the password, refuse if already
/// enrolled, then persist secret and backup codes as one record.
///
/// # Errors
/// `InvalidPassword` if the credential does not match, `AlreadyEnrolled` if
/// a record exists (also when one appears concurrently), storage errors
/// as-is.
pub async fn enroll(
    store: &Store,
    config: &AuthConfig,
    candidate: &str,
) -> Result<EnrollmentMaterial, AuthError> {
    if !password::verify(candidate, config.access_password()) {
        return Err(AuthError::InvalidPassword);
    }

    if store.second_factor.read().await?.is_some() {
        return Err(AuthError::AlreadyEnrolled);
    }

    // Generate everything before touching the store: the record is persisted
    // complete or not at all.
    let secret = config.totp().generate_secret(TOTP_ACCOUNT)?;
    let backup_codes = backup::issue(backup::BACKUP_CODE_COUNT);

    let record = SecondFactorRecord {
        secret: secret.secret.clone(),
        backup_codes: backup_codes.clone(),
        created_at: Utc::now(),
    };

    // The emptiness re-check runs under the domain lock, so two concurrent
    // enrollments cannot both create a record.
    let (_, inserted) = store
        .second_factor
        .update(|slot| {
            if slot.is_some() {
                false
            } else {
                *slot = Some(record.clone());
                true
            }
        })
        .await?;

    if !inserted {
        return Err(AuthError::AlreadyEnrolled);
    }

    info!("Second factor enrolled");

    Ok(EnrollmentMaterial {
        secret: secret.secret,
        provisioning_uri: secret.provisioning_uri,
        backup_codes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TotpEngine;
    use secrecy::SecretString;

    fn config() -> AuthConfig {
        AuthConfig::new(
            SecretString::from("hunter2".to_string()),
            TotpEngine::new("opsboard-test"),
        )
    }

    #[tokio::test]
    async fn enrollment_persists_combined_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).await.unwrap();

        let material = enroll(&store, &config(), "hunter2").await.unwrap();
        assert_eq!(material.backup_codes.len(), backup::BACKUP_CODE_COUNT);
        assert!(material.provisioning_uri.contains(&material.secret));

        let record = store.second_factor.read().await.unwrap().unwrap();
        assert_eq!(record.secret, material.secret);
        assert_eq!(record.backup_codes, material.backup_codes);
    }

    #[tokio::test]
    async fn wrong_password_fails_closed() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).await.unwrap();

        let err = enroll(&store, &config(), "letmein").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidPassword));
        assert!(store.second_factor.read().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn enrollment_is_one_shot() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).await.unwrap();
        let config = config();

        let first = enroll(&store, &config, "hunter2").await.unwrap();
        let err = enroll(&store, &config, "hunter2").await.unwrap_err();
        assert!(matches!(err, AuthError::AlreadyEnrolled));

        // The stored secret is untouched by the refused second attempt.
        let record = store.second_factor.read().await.unwrap().unwrap();
        assert_eq!(record.secret, first.secret);
    }
}
