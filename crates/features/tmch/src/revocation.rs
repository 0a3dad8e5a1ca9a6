//! Revocation data published by the clearinghouse.
//!
//! Two lists exist: the certificate revocation list, signed by the trust root of one CA mode,
//! and the signed mark revocation list (SMDRL), a CSV of revoked mark ids.

use crate::bytes_as_base64;
use crate::error::{TmchError, TmchErrorExt};
use chrono::{DateTime, Utc};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a certificate was revoked (RFC 5280 reason codes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RevocationReason {
    Unspecified,
    KeyCompromise,
    CaCompromise,
    AffiliationChanged,
    Superseded,
    CessationOfOperation,
    CertificateHold,
    RemoveFromCrl,
    PrivilegeWithdrawn,
    AaCompromise,
}

impl RevocationReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unspecified => "UNSPECIFIED",
            Self::KeyCompromise => "KEY_COMPROMISE",
            Self::CaCompromise => "CA_COMPROMISE",
            Self::AffiliationChanged => "AFFILIATION_CHANGED",
            Self::Superseded => "SUPERSEDED",
            Self::CessationOfOperation => "CESSATION_OF_OPERATION",
            Self::CertificateHold => "CERTIFICATE_HOLD",
            Self::RemoveFromCrl => "REMOVE_FROM_CRL",
            Self::PrivilegeWithdrawn => "PRIVILEGE_WITHDRAWN",
            Self::AaCompromise => "AA_COMPROMISE",
        }
    }
}

impl fmt::Display for RevocationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevokedCertificate {
    pub serial: u64,
    pub revoked_at: DateTime<Utc>,
    pub reason: RevocationReason,
}

/// Signed payload of a certificate revocation list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CrlData {
    pub this_update: DateTime<Utc>,
    pub revoked: Vec<RevokedCertificate>,
}

/// A CRL as distributed: payload plus the root's signature over its postcard encoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedCrl {
    pub data: CrlData,
    #[serde(with = "bytes_as_base64")]
    pub signature: Vec<u8>,
}

impl SignedCrl {
    /// # Errors
    /// [`TmchError::Json`] for malformed input.
    pub fn from_json(json: &str) -> Result<Self, TmchError> {
        serde_json::from_str(json).context("certificate revocation list")
    }

    /// # Errors
    /// [`TmchError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, TmchError> {
        serde_json::to_string_pretty(self).map_err(TmchError::from)
    }

    /// Checks the list was signed by `root` and indexes it by serial.
    ///
    /// # Errors
    /// [`TmchError::SignatureMismatch`] when the list was signed by another root.
    pub fn verify(self, root: &VerifyingKey) -> Result<CertificateRevocationList, TmchError> {
        let signature = Signature::from_slice(&self.signature).context("CRL signature")?;
        let bytes = postcard::to_stdvec(&self.data).context("CRL payload")?;
        root.verify(&bytes, &signature).map_err(|e| TmchError::SignatureMismatch {
            message: e.to_string().into(),
            context: Some("certificate revocation list".into()),
        })?;

        Ok(CertificateRevocationList {
            this_update: Some(self.data.this_update),
            entries: self.data.revoked.into_iter().map(|r| (r.serial, r)).collect(),
        })
    }
}

/// A verified CRL, indexed by certificate serial.
#[derive(Debug, Clone, Default)]
pub struct CertificateRevocationList {
    this_update: Option<DateTime<Utc>>,
    entries: FxHashMap<u64, RevokedCertificate>,
}

impl CertificateRevocationList {
    /// Revocation in effect for `serial` at `now`.
    #[must_use]
    pub fn revocation(&self, serial: u64, now: DateTime<Utc>) -> Option<&RevokedCertificate> {
        self.entries.get(&serial).filter(|r| r.revoked_at <= now)
    }

    #[must_use]
    pub const fn this_update(&self) -> Option<DateTime<Utc>> {
        self.this_update
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Revoked signed mark ids with their revocation times.
#[derive(Debug, Clone, Default)]
pub struct SmdRevocationList {
    creation_time: Option<DateTime<Utc>>,
    revoked: FxHashMap<String, DateTime<Utc>>,
}

impl SmdRevocationList {
    /// Parses the SMDRL CSV:
    ///
    /// ```text
    /// 1,2013-11-24T23:15:37.4Z
    /// smd-id,insertion-datetime
    /// 0000001681375789102250-65535,2013-08-09T12:00:00.0Z
    /// ```
    ///
    /// # Errors
    /// [`TmchError::RevocationList`] on a bad header, column line or row.
    pub fn parse(text: &str) -> Result<Self, TmchError> {
        let mut lines = text.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());

        let (_, header) = lines.next().ok_or_else(|| malformed(1, "empty list"))?;
        let creation_time = match header.split(',').map(str::trim).collect::<Vec<_>>()[..] {
            ["1", created] => parse_time(created, 1)?,
            _ => return Err(malformed(1, "expected header '1,<creation time>'")),
        };

        let (index, columns) = lines.next().ok_or_else(|| malformed(2, "missing column line"))?;
        if columns.trim() != "smd-id,insertion-datetime" {
            return Err(malformed(index + 1, "unexpected column line"));
        }

        let mut revoked = FxHashMap::default();
        for (index, row) in lines {
            let line = index + 1;
            let [id, inserted] = row.split(',').map(str::trim).collect::<Vec<_>>()[..] else {
                return Err(malformed(line, "expected 2 fields"));
            };
            if id.is_empty() {
                return Err(malformed(line, "empty smd id"));
            }
            revoked.insert(id.to_owned(), parse_time(inserted, line)?);
        }

        Ok(Self { creation_time: Some(creation_time), revoked })
    }

    /// Builds a list directly from entries.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = (String, DateTime<Utc>)>) -> Self {
        Self { creation_time: None, revoked: entries.into_iter().collect() }
    }

    /// Revocation time of `smd_id` if it is revoked as of `now`.
    #[must_use]
    pub fn revoked_at(&self, smd_id: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.revoked.get(smd_id).copied().filter(|t| *t <= now)
    }

    #[must_use]
    pub const fn creation_time(&self) -> Option<DateTime<Utc>> {
        self.creation_time
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.revoked.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.revoked.is_empty()
    }
}

fn malformed(line: usize, message: &'static str) -> TmchError {
    TmchError::RevocationList { line, message: message.into(), context: Some("smdrl".into()) }
}

fn parse_time(raw: &str, line: usize) -> Result<DateTime<Utc>, TmchError> {
    DateTime::parse_from_rfc3339(raw).map(|t| t.with_timezone(&Utc)).map_err(|e| {
        TmchError::RevocationList {
            line,
            message: format!("bad timestamp '{raw}': {e}").into(),
            context: Some("smdrl".into()),
        }
    })
}
