//! # Signature Verification
//!
//! Chain dispatch for attestation signatures. [`verify`] never panics and
//! never returns an error: decode failures, length mismatches and library
//! errors all collapse to `false`.
//!
//! Verification is a pure function of its four inputs; there is no clock or
//! network access.

use super::ecdsa;
use super::ed25519;
use super::entities::{Attestation, ChainTag, VerificationVerdict};
use super::errors::SignatureError;

/// Verify `signature` over `message` for `address` on `chain`.
pub fn verify(message: &str, address: &str, chain: ChainTag, signature: &str) -> bool {
    match verify_detailed(message, address, chain, signature) {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(%address, %chain, reason = %e, "signature rejected");
            false
        }
    }
}

/// Like [`verify`], but names the reason a signature was rejected.
pub fn verify_detailed(
    message: &str,
    address: &str,
    chain: ChainTag,
    signature: &str,
) -> Result<(), SignatureError> {
    match chain {
        ChainTag::Ethereum => ecdsa::verify_personal_message(message, address, signature),
        ChainTag::Solana => ed25519::verify_solana_message(message, address, signature),
    }
}

/// Verify one bundle entry into a verdict.
pub fn verify_attestation(attestation: &Attestation) -> VerificationVerdict {
    VerificationVerdict {
        address: attestation.address.clone(),
        chain: attestation.chain,
        valid: verify(
            &attestation.message,
            &attestation.address,
            attestation.chain,
            &attestation.signature,
        ),
    }
}
