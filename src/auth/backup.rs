//! Single-use backup codes, substitutable for a TOTP code when the
//! authenticator device is unavailable.

use crate::auth::{password::constant_time_eq, SecondFactorRecord};
use rand::Rng;

pub const BACKUP_CODE_COUNT: usize = 10;
const BACKUP_CODE_LEN: usize = 8;
// No 0, O, 1, I to avoid confusion when typed by hand.
const BACKUP_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Generate `count` codes, unique within the batch.
#[must_use]
pub fn issue(count: usize) -> Vec<String> {
    let mut rng = rand::rngs::OsRng;
    let mut codes: Vec<String> = Vec::with_capacity(count);

    while codes.len() < count {
        let code: String = (0..BACKUP_CODE_LEN)
            .map(|_| {
                let idx = rng.gen_range(0..BACKUP_CODE_ALPHABET.len());
                BACKUP_CODE_ALPHABET[idx] as char
            })
            .collect();
        if !codes.contains(&code) {
            codes.push(code);
        }
    }

    codes
}

/// Strip separators and uppercase, so `abcd-efgh` matches `ABCDEFGH`.
#[must_use]
pub fn normalize(input: &str) -> String {
    input
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|ch| ch.to_ascii_uppercase())
        .collect()
}

/// Match `candidate` against the remaining codes; on a hit, remove it.
///
/// Callers run this inside the second-factor domain's `update` so that the
/// removal and its persistence are atomic with respect to concurrent logins.
pub fn consume(record: &mut SecondFactorRecord, candidate: &str) -> bool {
    let normalized = normalize(candidate);

    match record
        .backup_codes
        .iter()
        .position(|code| constant_time_eq(code.as_bytes(), normalized.as_bytes()))
    {
        Some(index) => {
            record.backup_codes.remove(index);
            true
        }
        None => false,
    }
}
