//! # Proof-of-Funds Consent Protocol
//!
//! Lets participants attest, per account, consent to inclusion in an
//! aggregate proof-of-funds bundle, and lets an organizer collect and
//! batch-verify those attestations.
//!
//! ## Architecture
//!
//! This crate follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Pure protocol and cryptographic logic, no I/O
//! - **Ports Layer** (`ports/`): Trait definitions for the inbound interface
//! - **Service Layer** (`service.rs`): Wires domain logic to ports
//!
//! ## Pipeline
//!
//! ```text
//! pasted block ─→ parser ─→ message::normalize ─→ format checks ─→ Bundle
//!                                                                    │
//!                                      verifier (secp256k1 | ed25519)┘
//! ```
//!
//! ## Security Notes
//!
//! - **Canonicalization**: only the `Issued At:` value of a pasted message is
//!   kept; every other line is re-rendered before verification
//! - **Malleability Prevention (EIP-2)**: Signatures with high S values are rejected
//!   (the browser signer tool's ethers-based check accepted them)
//! - **Replay**: timestamps are not checked for recency; a replayed signed
//!   message still verifies

pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use config::VerifierConfig;
pub use domain::bundle::{
    build_bundle, merge_and_build, parse_bundle, to_json, validate_entries, validate_entry,
    verify_all, verify_all_with,
};
pub use domain::ecdsa::{address_from_pubkey, hash_personal_message, keccak256};
pub use domain::entities::{
    Attestation, Bundle, BundleVerification, ChainTag, EcdsaSignature, EthAddress, Hash,
    MergeMode, VerificationVerdict, BUNDLE_ID,
};
pub use domain::errors::{AttestationError, BundleError, FormatError, ParseError, SignatureError};
pub use domain::format::{
    is_expected_message, is_valid_address, is_valid_signature_format, to_checksum_address,
};
pub use domain::message::{
    build as build_message, normalize as normalize_message, CanonicalMessage,
    CONFIRMATION_MESSAGE,
};
pub use domain::parser::{parse, render_attestation_block};
pub use domain::verifier::{verify, verify_attestation, verify_detailed};
pub use ports::inbound::ConsentBundleApi;
pub use service::ConsentService;
