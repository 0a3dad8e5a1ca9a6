//! Trademark claims notice ids.
//!
//! A TCNID is eight hex checksum characters followed by nineteen decimal digits. The checksum is
//! the CRC32 of the label, the notice expiration in epoch seconds and the digits, concatenated.

use chrono::{DateTime, Utc};
use std::borrow::Cow;

const CHECKSUM_LEN: usize = 8;
const DIGITS_LEN: usize = 19;

#[reg_derive::reg_error]
pub enum TcnidError {
    #[error("Malformed TCNID{}: {message}", format_context(.context))]
    Malformed { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("TCNID checksum mismatch{}: expected {expected}", format_context(.context))]
    Checksum { expected: String, context: Option<Cow<'static, str>> },
}

/// Checks `tcn_id` is well formed and that its checksum binds it to `label` and `expiration`.
///
/// # Errors
/// [`TcnidError::Malformed`] for a bad shape, [`TcnidError::Checksum`] for a mismatching checksum.
pub fn validate(tcn_id: &str, label: &str, expiration: DateTime<Utc>) -> Result<(), TcnidError> {
    let (checksum, digits) = split(tcn_id)?;
    let expected = checksum_for(label, expiration, digits);
    if checksum.eq_ignore_ascii_case(&expected) {
        Ok(())
    } else {
        Err(TcnidError::Checksum { expected, context: None })
    }
}

/// Builds a TCNID for `label` from nineteen `digits`.
///
/// # Errors
/// [`TcnidError::Malformed`] when `digits` is not nineteen decimal digits.
pub fn generate(label: &str, expiration: DateTime<Utc>, digits: &str) -> Result<String, TcnidError> {
    if digits.len() != DIGITS_LEN || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TcnidError::Malformed {
            message: format!("expected {DIGITS_LEN} digits, got '{digits}'").into(),
            context: None,
        });
    }
    Ok(format!("{}{digits}", checksum_for(label, expiration, digits)))
}

fn split(tcn_id: &str) -> Result<(&str, &str), TcnidError> {
    if tcn_id.len() != CHECKSUM_LEN + DIGITS_LEN || !tcn_id.is_ascii() {
        return Err(TcnidError::Malformed {
            message: format!("expected {} characters", CHECKSUM_LEN + DIGITS_LEN).into(),
            context: None,
        });
    }
    let (checksum, digits) = tcn_id.split_at(CHECKSUM_LEN);
    if !checksum.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(TcnidError::Malformed { message: "checksum is not hex".into(), context: None });
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TcnidError::Malformed { message: "notice id is not decimal".into(), context: None });
    }
    Ok((checksum, digits))
}

fn checksum_for(label: &str, expiration: DateTime<Utc>, digits: &str) -> String {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(label.as_bytes());
    hasher.update(expiration.timestamp().to_string().as_bytes());
    hasher.update(digits.as_bytes());
    format!("{:08x}", hasher.finalize())
}
