//! # Consent Errors
//!
//! Error types for parsing, validation, bundling and signature verification.
//!
//! A failed cryptographic check is not an error to callers of
//! [`verify`](super::verifier::verify); [`SignatureError`] only names the
//! reason for logging and for [`verify_detailed`](super::verifier::verify_detailed).

use thiserror::Error;

use super::entities::ChainTag;

/// Structural failure while extracting fields from a pasted block.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A required label is absent or its value is empty
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// The `Chain:` value is not a supported chain
    #[error("Unknown chain: {0}")]
    UnknownChain(String),
}

/// Address or signature fails the chain-specific shape check.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("Invalid {chain} address: {address}")]
    InvalidAddress { chain: ChainTag, address: String },

    #[error("Invalid {chain} signature format")]
    InvalidSignatureFormat { chain: ChainTag },
}

/// Why a single pasted entry was rejected by the validation pipeline.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AttestationError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Format(#[from] FormatError),

    /// Normalized message does not carry the expected template lines
    #[error("Invalid message format for {chain}")]
    MessageMismatch { chain: ChainTag },
}

/// Errors from building or serializing a bundle.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BundleError {
    /// Entry `index` (1-based) failed validation; the batch was aborted
    #[error("Entry {index}: {source}")]
    InvalidEntry {
        index: usize,
        #[source]
        source: AttestationError,
    },

    /// The bundle to append to is not a valid attestation sequence
    #[error("Malformed existing bundle: {0}")]
    MalformedExistingBundle(String),

    /// Every supplied entry was blank
    #[error("No valid entries provided")]
    NoEntries,

    #[error("Bundle serialization failed: {0}")]
    Serialization(String),
}

/// Reasons a signature check failed.
///
/// Reference: secp256k1 checks follow EIP-2 and EIP-191.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// The signature or address could not be decoded
    #[error("Invalid signature format")]
    InvalidFormat,

    /// Decoded bytes have the wrong length
    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Signature has high S value (EIP-2 malleability protection)
    #[error("Malleable signature (high S value)")]
    MalleableSignature,

    /// Invalid recovery ID (v must be 0, 1, 27, or 28)
    #[error("Invalid recovery ID: {0}")]
    InvalidRecoveryId(u8),

    /// Failed to recover public key from signature
    #[error("Failed to recover public key")]
    RecoveryFailed,

    /// Address bytes are not a valid ed25519 point
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Signature doesn't match message/signer
    #[error("Signature verification failed")]
    VerificationFailed,

    /// Recovered signer does not match expected signer
    #[error("Signer mismatch: expected {expected}, got {actual}")]
    SignerMismatch { expected: String, actual: String },
}
