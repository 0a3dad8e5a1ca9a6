//! # Signed Mark Issuance
//!
//! Signing routines for trust roots, agent certificates, marks and CRLs. Only built with the
//! `issuance` feature: verification never needs a private key.
//!
//! Seeds are drawn from the OS CSPRNG and wiped once the key is derived.

use crate::error::{TmchError, TmchErrorExt};
use crate::revocation::{CrlData, SignedCrl};
use crate::{Certificate, CertificateData, MarkData, SignedMark};
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use getrandom::fill;
use serde::Serialize;
use zeroize::Zeroize;

/// Creates a fresh Ed25519 keypair.
///
/// # Errors
/// [`TmchError::Internal`] if the system RNG is unavailable.
pub fn generate_keypair() -> Result<(SigningKey, VerifyingKey), TmchError> {
    let mut seed = [0u8; 32];
    fill(&mut seed).map_err(|e| TmchError::Internal {
        message: e.to_string().into(),
        context: Some("Failed to generate seed".into()),
    })?;

    let signing_key = SigningKey::from_bytes(&seed);
    let verifying_key = signing_key.verifying_key();
    seed.zeroize();

    Ok((signing_key, verifying_key))
}

/// Deterministic keypair from a fixed seed, for fixtures.
#[must_use]
pub fn keypair_from_seed(seed: &[u8; 32]) -> (SigningKey, VerifyingKey) {
    let signing_key = SigningKey::from_bytes(seed);
    let verifying_key = signing_key.verifying_key();
    (signing_key, verifying_key)
}

/// Signs `data` with a trust root key.
///
/// # Errors
/// [`TmchError::Postcard`] if the payload cannot be encoded.
pub fn issue_certificate(root: &SigningKey, data: CertificateData) -> Result<Certificate, TmchError> {
    let signature = sign(root, &data)?;
    Ok(Certificate { data, signature })
}

/// Signs `data` with an agent key and attaches the agent certificate.
///
/// # Errors
/// [`TmchError::Postcard`] if the payload cannot be encoded.
pub fn issue_mark(
    agent: &SigningKey,
    certificate: Certificate,
    data: MarkData,
) -> Result<SignedMark, TmchError> {
    let signature = sign(agent, &data)?;
    Ok(SignedMark { data, signature, certificate })
}

/// # Errors
/// [`TmchError::Postcard`] if the payload cannot be encoded.
pub fn issue_crl(root: &SigningKey, data: CrlData) -> Result<SignedCrl, TmchError> {
    let signature = sign(root, &data)?;
    Ok(SignedCrl { data, signature })
}

fn sign<T: Serialize>(key: &SigningKey, payload: &T) -> Result<Vec<u8>, TmchError> {
    let bytes = postcard::to_stdvec(payload).context("signing payload")?;
    Ok(key.sign(&bytes).to_bytes().to_vec())
}
