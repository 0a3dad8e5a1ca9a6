//! # Signed Mark Verification
//!
//! [`TmchVerifier`] holds only configuration: the trust root of its CA mode and the revocation
//! lists current at construction. Each call walks the same steps and stops at the first failure:
//!
//! 1. decode the encoded SMD,
//! 2. verify the certificate against the root, then the mark against the certificate key,
//! 3. check the certificate validity window,
//! 4. check the certificate against the CRL,
//! 5. check the SMDRL and the mark validity window,
//! 6. optionally, bind the mark to a label.

use crate::error::{TmchError, TmchErrorExt};
use crate::revocation::{CertificateRevocationList, SignedCrl, SmdRevocationList};
use crate::{Certificate, SignedMark};
use base64::{Engine as _, engine::general_purpose};
use chrono::{DateTime, Utc};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use reg_domain::config::{TmchCaMode, TmchConfig};
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct TmchVerifier {
    mode: TmchCaMode,
    root: VerifyingKey,
    crl: CertificateRevocationList,
    smdrl: SmdRevocationList,
}

impl TmchVerifier {
    /// A verifier trusting `root` with empty revocation lists.
    ///
    /// # Errors
    /// [`TmchError::Key`] if `root` is not a valid Ed25519 public key.
    pub fn new(mode: TmchCaMode, root: &[u8; 32]) -> Result<Self, TmchError> {
        Ok(Self {
            mode,
            root: VerifyingKey::from_bytes(root).context("trust root")?,
            crl: CertificateRevocationList::default(),
            smdrl: SmdRevocationList::default(),
        })
    }

    /// Builds a verifier for the configured mode, loading any configured revocation lists.
    ///
    /// # Errors
    /// Fails on an undecodable root key, unreadable list files, or a CRL not signed by the root.
    pub fn from_config(config: &TmchConfig) -> Result<Self, TmchError> {
        let encoded = match config.mode {
            TmchCaMode::Production => &config.production_root,
            TmchCaMode::Pilot => &config.pilot_root,
        };
        let bytes = general_purpose::STANDARD.decode(encoded.trim()).context("trust root")?;
        let root: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| TmchError::Encoding {
            message: format!("trust root must be 32 bytes, got {}", b.len()).into(),
            context: None,
        })?;
        let mut verifier = Self::new(config.mode, &root)?;

        if let Some(path) = &config.crl_path {
            let json = std::fs::read_to_string(path).context(format!("reading {}", path.display()))?;
            verifier = verifier.with_crl(SignedCrl::from_json(&json)?)?;
        }
        if let Some(path) = &config.smdrl_path {
            let csv = std::fs::read_to_string(path).context(format!("reading {}", path.display()))?;
            verifier = verifier.with_smdrl(SmdRevocationList::parse(&csv)?);
        }

        info!(
            mode = ?verifier.mode,
            crl = verifier.crl.len(),
            smdrl = verifier.smdrl.len(),
            "TMCH verifier ready"
        );
        Ok(verifier)
    }

    /// Installs a CRL after checking it was signed by this verifier's root.
    ///
    /// # Errors
    /// [`TmchError::SignatureMismatch`] for a CRL signed under another root.
    pub fn with_crl(mut self, crl: SignedCrl) -> Result<Self, TmchError> {
        self.crl = crl.verify(&self.root)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_smdrl(mut self, smdrl: SmdRevocationList) -> Self {
        self.smdrl = smdrl;
        self
    }

    #[must_use]
    pub const fn mode(&self) -> TmchCaMode {
        self.mode
    }

    /// Decodes and fully verifies an encoded SMD as of `now`.
    ///
    /// # Errors
    /// The first failing step's error; see the module docs for the order.
    pub fn verify(&self, encoded: &str, now: DateTime<Utc>) -> Result<SignedMark, TmchError> {
        let mark = SignedMark::decode(encoded)?;
        self.verify_mark(&mark, now)?;
        Ok(mark)
    }

    /// Like [`Self::verify`], and also requires the mark to cover `label`.
    ///
    /// # Errors
    /// As [`Self::verify`], then [`TmchError::LabelMismatch`].
    pub fn verify_for_label(
        &self,
        encoded: &str,
        label: &str,
        now: DateTime<Utc>,
    ) -> Result<SignedMark, TmchError> {
        let mark = self.verify(encoded, now)?;
        if !mark.data.covers(label) {
            return Err(TmchError::LabelMismatch { label: label.to_owned(), context: Some(mark.data.id.into()) });
        }
        Ok(mark)
    }

    /// Verifies an already decoded mark.
    ///
    /// # Errors
    /// As [`Self::verify`] minus decoding.
    pub fn verify_mark(&self, mark: &SignedMark, now: DateTime<Utc>) -> Result<(), TmchError> {
        let agent = self.verify_certificate(&mark.certificate)?;
        verify_signed(&agent, &mark.data, &mark.signature, "signed mark")?;

        check_certificate_window(&mark.certificate, now)?;
        if let Some(revoked) = self.crl.revocation(mark.certificate.data.serial, now) {
            return Err(TmchError::CertificateRevoked {
                serial: revoked.serial,
                reason: revoked.reason,
                revoked_at: revoked.revoked_at,
                context: Some(mark.certificate.data.subject.clone().into()),
            });
        }

        if let Some(revoked_at) = self.smdrl.revoked_at(&mark.data.id, now) {
            return Err(TmchError::MarkRevoked { id: mark.data.id.clone(), revoked_at, context: None });
        }
        if now < mark.data.not_before {
            return Err(TmchError::MarkValidity {
                message: format!("not valid before {}", mark.data.not_before).into(),
                context: Some(mark.data.id.clone().into()),
            });
        }
        if now > mark.data.not_after {
            return Err(TmchError::MarkValidity {
                message: format!("expired at {}", mark.data.not_after).into(),
                context: Some(mark.data.id.clone().into()),
            });
        }

        debug!(smd_id = %mark.data.id, serial = mark.certificate.data.serial, "Signed mark verified");
        Ok(())
    }

    fn verify_certificate(&self, certificate: &Certificate) -> Result<VerifyingKey, TmchError> {
        verify_signed(&self.root, &certificate.data, &certificate.signature, "certificate")?;

        let key: [u8; 32] = certificate.data.public_key.as_slice().try_into().map_err(|_| {
            TmchError::Encoding {
                message: "certificate key must be 32 bytes".into(),
                context: Some(certificate.data.subject.clone().into()),
            }
        })?;
        VerifyingKey::from_bytes(&key).context("certificate key")
    }
}

fn check_certificate_window(certificate: &Certificate, now: DateTime<Utc>) -> Result<(), TmchError> {
    let data = &certificate.data;
    if now < data.not_before {
        return Err(TmchError::CertificateNotYetValid {
            not_before: data.not_before,
            context: Some(data.subject.clone().into()),
        });
    }
    if now > data.not_after {
        return Err(TmchError::CertificateExpired {
            not_after: data.not_after,
            context: Some(data.subject.clone().into()),
        });
    }
    Ok(())
}

fn verify_signed<T: Serialize>(
    key: &VerifyingKey,
    payload: &T,
    signature: &[u8],
    what: &'static str,
) -> Result<(), TmchError> {
    let signature = Signature::from_slice(signature).context(what)?;
    let bytes = postcard::to_stdvec(payload).context(what)?;
    key.verify(&bytes, &signature).map_err(|e| TmchError::SignatureMismatch {
        message: e.to_string().into(),
        context: Some(what.into()),
    })
}
