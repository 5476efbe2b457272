//! Login state machine for the single shared credential.
//!
//! Every attempt is independent: no lockout counter, no rate limiting, no
//! state carried between calls. A login either fully admits or fully
//! rejects; nothing half-authenticated is ever persisted.

use crate::{
    auth::{backup, password, totp, AuthConfig, AuthError},
    store::Store,
};
use serde::Serialize;
use utoipa::ToSchema;

/// Outcome of an admitted login. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Admission {
    pub admitted: bool,
    pub second_factor_required: bool,
    pub used_backup_code: bool,
}

/// Run one login attempt against the current wall clock.
///
/// # Errors
/// `InvalidPassword`, `TokenRequired` or `InvalidToken` for the expected
/// rejections; storage errors propagate as-is.
pub async fn login(
    store: &Store,
    config: &AuthConfig,
    password: &str,
    token: Option<&str>,
) -> Result<Admission, AuthError> {
    login_at(store, config, password, token, totp::unix_now()).await
}

/// Same as [`login`], with the verification time supplied by the caller.
pub async fn login_at(
    store: &Store,
    config: &AuthConfig,
    candidate: &str,
    token: Option<&str>,
    now: u64,
) -> Result<Admission, AuthError> {
    if !password::verify(candidate, config.access_password()) {
        return Err(AuthError::InvalidPassword);
    }

    let Some(record) = store.second_factor.read().await? else {
        // Password-only mode: a deliberate system state, not a fallback.
        // Any supplied token is ignored.
        return Ok(Admission {
            admitted: true,
            second_factor_required: false,
            used_backup_code: false,
        });
    };

    let Some(token) = token else {
        return Err(AuthError::TokenRequired);
    };

    if config.totp().verify_at(&record.secret, token, now) {
        return Ok(Admission {
            admitted: true,
            second_factor_required: true,
            used_backup_code: false,
        });
    }

    // Re-load under the domain lock so the removal and its persistence are
    // atomic: two logins racing on the same backup code cannot both win.
    let (_, consumed) = store
        .second_factor
        .update(|slot| {
            slot.as_mut()
                .map_or(false, |record| backup::consume(record, token))
        })
        .await?;

    if consumed {
        return Ok(Admission {
            admitted: true,
            second_factor_required: true,
            used_backup_code: true,
        });
    }

    Err(AuthError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{enroll, TotpEngine};
    use secrecy::SecretString;

    const NOW: u64 = 1_700_000_010;

    fn config() -> AuthConfig {
        AuthConfig::new(
            SecretString::from("hunter2".to_string()),
            TotpEngine::new("opsboard-test"),
        )
    }

    async fn open_store(dir: &tempfile::TempDir) -> Store {
        Store::open(dir.path()).await.unwrap()
    }

    #[tokio::test]
    async fn wrong_password_rejects_regardless_of_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;
        let config = config();

        for token in [None, Some("123456")] {
            let err = login_at(&store, &config, "letmein", token, NOW)
                .await
                .unwrap_err();
            assert!(matches!(err, AuthError::InvalidPassword));
        }
    }

    #[tokio::test]
    async fn password_only_mode_admits_and_ignores_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;
        let config = config();

        let admission = login_at(&store, &config, "hunter2", Some("000000"), NOW)
            .await
            .unwrap();
        assert_eq!(
            admission,
            Admission {
                admitted: true,
                second_factor_required: false,
                used_backup_code: false,
            }
        );
    }

    #[tokio::test]
    async fn enrolled_without_token_requires_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;
        let config = config();
        enroll::enroll(&store, &config, "hunter2").await.unwrap();

        let err = login_at(&store, &config, "hunter2", None, NOW)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::TokenRequired));
    }

    #[tokio::test]
    async fn totp_token_admits() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;
        let config = config();
        let material = enroll::enroll(&store, &config, "hunter2").await.unwrap();

        let code = config.totp().code_at(&material.secret, NOW).unwrap();
        let admission = login_at(&store, &config, "hunter2", Some(&code), NOW)
            .await
            .unwrap();
        assert_eq!(
            admission,
            Admission {
                admitted: true,
                second_factor_required: true,
                used_backup_code: false,
            }
        );
    }

    #[tokio::test]
    async fn backup_code_admits_once_and_is_consumed() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;
        let config = config();
        let material = enroll::enroll(&store, &config, "hunter2").await.unwrap();
        let code = material.backup_codes[0].clone();

        let admission = login_at(&store, &config, "hunter2", Some(&code), NOW)
            .await
            .unwrap();
        assert!(admission.used_backup_code);

        let record = store.second_factor.read().await.unwrap().unwrap();
        assert_eq!(record.backup_codes.len(), material.backup_codes.len() - 1);

        // Second use of the same code is rejected.
        let err = login_at(&store, &config, "hunter2", Some(&code), NOW)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn garbage_token_rejects() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;
        let config = config();
        enroll::enroll(&store, &config, "hunter2").await.unwrap();

        let err = login_at(&store, &config, "hunter2", Some("000000"), NOW)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }
}
