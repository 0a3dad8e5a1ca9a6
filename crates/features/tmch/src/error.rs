use crate::revocation::RevocationReason;
use chrono::{DateTime, Utc};
use std::borrow::Cow;

/// Errors raised while decoding or verifying signed marks and revocation data.
#[reg_derive::reg_error]
pub enum TmchError {
    /// The armor, base64 or document structure could not be read.
    #[error("Signed mark data is improperly encoded{}: {message}", format_context(.context))]
    Encoding { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A signature did not verify under the expected key.
    #[error("Signature does not match{}: {message}", format_context(.context))]
    SignatureMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid key or signature bytes{}: {source}", format_context(.context))]
    Key { source: ed25519_dalek::SignatureError, context: Option<Cow<'static, str>> },

    #[error("Certificate is not yet valid{}: valid from {not_before}", format_context(.context))]
    CertificateNotYetValid { not_before: DateTime<Utc>, context: Option<Cow<'static, str>> },

    #[error("Certificate has expired{}: valid until {not_after}", format_context(.context))]
    CertificateExpired { not_after: DateTime<Utc>, context: Option<Cow<'static, str>> },

    #[error(
        "Certificate has been revoked{}: serial {serial}, reason {reason}, at {revoked_at}",
        format_context(.context)
    )]
    CertificateRevoked {
        serial: u64,
        reason: RevocationReason,
        revoked_at: DateTime<Utc>,
        context: Option<Cow<'static, str>>,
    },

    #[error("Signed mark {id} has been revoked{} at {revoked_at}", format_context(.context))]
    MarkRevoked { id: String, revoked_at: DateTime<Utc>, context: Option<Cow<'static, str>> },

    /// The mark's own validity window excludes the verification time.
    #[error("Signed mark is not currently valid{}: {message}", format_context(.context))]
    MarkValidity { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Signed mark does not cover label '{label}'{}", format_context(.context))]
    LabelMismatch { label: String, context: Option<Cow<'static, str>> },

    /// A revocation list could not be parsed.
    #[error("Malformed revocation list{} at line {line}: {message}", format_context(.context))]
    RevocationList { line: usize, message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Base64 decoding failed{}: {source}", format_context(.context))]
    Base64 { source: base64::DecodeError, context: Option<Cow<'static, str>> },

    #[error("JSON error{}: {source}", format_context(.context))]
    Json { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Postcard serialization error{}: {source}", format_context(.context))]
    Postcard { source: postcard::Error, context: Option<Cow<'static, str>> },

    #[error("I/O error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Internal TMCH error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl TmchError {
    /// Whether the failure is in reading the data rather than in trusting it.
    #[must_use]
    pub const fn is_encoding(&self) -> bool {
        matches!(self, Self::Encoding { .. } | Self::Base64 { .. } | Self::Json { .. })
    }
}
