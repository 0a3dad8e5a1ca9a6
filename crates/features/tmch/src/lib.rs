//! # Trademark Clearinghouse
//!
//! Verification of signed mark data (SMD) presented as sunrise evidence, plus the revocation
//! lists and claims notice ids the clearinghouse publishes.
//!
//! ## Trust chain
//!
//! Every SMD embeds the certificate of the clearinghouse agent that signed it. The certificate is
//! signed by one of two trust roots, chosen by [`TmchCaMode`]: production or pilot. Verification
//! ([`verifier`]) walks the chain top-down: root signs certificate, certificate key signs mark.
//! All signatures are Ed25519 over the postcard encoding of the signed payload.
//!
//! ## Encoding
//!
//! An encoded SMD is base64 JSON, optionally wrapped in an armor block:
//!
//! ```text
//! Marks: Example One
//! -----BEGIN ENCODED SMD-----
//! eyJkYXRhIjp7...
//! -----END ENCODED SMD-----
//! ```
//!
//! Issuing marks and certificates (test fixtures, tooling) is gated behind the `issuance`
//! feature.

mod error;
#[cfg(feature = "issuance")]
pub mod issuance;
pub mod revocation;
pub mod tcnid;
pub mod verifier;

pub use crate::error::{TmchError, TmchErrorExt};
pub use crate::revocation::{
    CertificateRevocationList, CrlData, RevocationReason, RevokedCertificate, SignedCrl,
    SmdRevocationList,
};
pub use crate::verifier::TmchVerifier;
pub use reg_domain::config::TmchCaMode;

use base64::{Engine as _, engine::general_purpose};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const ARMOR_BEGIN: &str = "-----BEGIN ENCODED SMD-----";
const ARMOR_END: &str = "-----END ENCODED SMD-----";

/// Certificate of a clearinghouse signing agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub data: CertificateData,
    /// Root signature over the postcard encoding of `data`.
    #[serde(with = "bytes_as_base64")]
    pub signature: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CertificateData {
    pub serial: u64,
    pub subject: String,
    /// Ed25519 public key of the agent.
    #[serde(with = "bytes_as_base64")]
    pub public_key: Vec<u8>,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
}

/// The trademark assertion carried by an SMD.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MarkData {
    /// SMD id, as listed on the SMDRL.
    pub id: String,
    pub mark_name: String,
    pub holder: String,
    /// Domain labels the mark entitles its holder to.
    pub labels: Vec<String>,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
}

impl MarkData {
    #[must_use]
    pub fn covers(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l.eq_ignore_ascii_case(label))
    }
}

/// Signed mark data: the mark, the agent signature over it, and the agent certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedMark {
    pub data: MarkData,
    #[serde(with = "bytes_as_base64")]
    pub signature: Vec<u8>,
    pub certificate: Certificate,
}

impl SignedMark {
    /// Reads an encoded SMD, armored or bare base64.
    ///
    /// # Errors
    /// [`TmchError::Encoding`] for broken armor, [`TmchError::Base64`] or [`TmchError::Json`]
    /// for undecodable content.
    pub fn decode(encoded: &str) -> Result<Self, TmchError> {
        let body: String = unarmor(encoded)?.split_whitespace().collect();
        if body.is_empty() {
            return Err(TmchError::Encoding { message: "no encoded data".into(), context: None });
        }
        let json = general_purpose::STANDARD.decode(body.as_bytes()).context("encoded SMD")?;
        serde_json::from_slice(&json).context("signed mark document")
    }

    /// Armored form, as placed in SMD files and EPP `encodedSignedMark` elements.
    ///
    /// # Errors
    /// [`TmchError::Json`] if serialization fails.
    pub fn encode(&self) -> Result<String, TmchError> {
        let json = serde_json::to_vec(self)?;
        let body = general_purpose::STANDARD.encode(json);

        let mut out = format!("Marks: {}\n{ARMOR_BEGIN}\n", self.data.mark_name);
        for chunk in body.as_bytes().chunks(72) {
            out.push_str(&String::from_utf8_lossy(chunk));
            out.push('\n');
        }
        out.push_str(ARMOR_END);
        out.push('\n');
        Ok(out)
    }
}

fn unarmor(encoded: &str) -> Result<&str, TmchError> {
    let Some(begin) = encoded.find(ARMOR_BEGIN) else {
        return if encoded.contains(ARMOR_END) { Err(unbalanced()) } else { Ok(encoded) };
    };
    // END must follow the whole BEGIN marker; the two share their dashes.
    let body_start = begin + ARMOR_BEGIN.len();
    let body = &encoded[body_start..];
    body.find(ARMOR_END).map(|end| &body[..end]).ok_or_else(unbalanced)
}

fn unbalanced() -> TmchError {
    TmchError::Encoding { message: "unbalanced encoded SMD armor".into(), context: None }
}

/// Helper module for transparently serializing byte buffers to Base64 strings.
#[allow(clippy::redundant_pub_crate)]
pub(crate) mod bytes_as_base64 {
    use base64::{Engine as _, engine::general_purpose};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub(crate) fn serialize<S: Serializer>(v: &Vec<u8>, s: S) -> Result<S::Ok, S::Error> {
        let mut buf = String::with_capacity((v.len() * 4).div_ceil(3));
        general_purpose::STANDARD_NO_PAD.encode_string(v, &mut buf);
        String::serialize(&buf, s)
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        match general_purpose::STANDARD_NO_PAD.decode(String::deserialize(d)?) {
            Ok(bytes) => Ok(bytes),
            Err(e) => Err(serde::de::Error::custom(format!("Invalid Base64: {e}"))),
        }
    }
}
