//! # Domain Entities
//!
//! Core data structures for consent attestations and bundles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::ParseError;

/// 32-byte digest (keccak256 output).
pub type Hash = [u8; 32];

/// Raw 20-byte Ethereum account address.
pub type EthAddress = [u8; 20];

/// Fixed identifier carried by every attestation of this bundle.
pub const BUNDLE_ID: &str = "pof-group-2025-v1";

// =============================================================================
// Chain Tag
// =============================================================================

/// The blockchain an attestation belongs to.
///
/// Determines address encoding, signature encoding and the verification
/// algorithm. Matching on this enum is exhaustive everywhere, so adding a
/// chain is a compile-time-checked change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainTag {
    /// Ethereum mainnet (secp256k1, personal-sign recovery)
    Ethereum,
    /// Solana (ed25519)
    Solana,
}

impl ChainTag {
    /// Wire name used in pasted blocks and the interchange JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainTag::Ethereum => "ethereum",
            ChainTag::Solana => "solana",
        }
    }

    /// Capitalized name used in the greeting line of the consent message.
    pub fn display_name(&self) -> &'static str {
        match self {
            ChainTag::Ethereum => "Ethereum",
            ChainTag::Solana => "Solana",
        }
    }

    /// Value of the `Chain:` line inside the consent message.
    pub fn template_id(&self) -> &'static str {
        match self {
            ChainTag::Ethereum => "1",
            ChainTag::Solana => "solana",
        }
    }
}

impl fmt::Display for ChainTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChainTag {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("ethereum") {
            Ok(ChainTag::Ethereum)
        } else if s.eq_ignore_ascii_case("solana") {
            Ok(ChainTag::Solana)
        } else {
            Err(ParseError::UnknownChain(s.to_string()))
        }
    }
}

// =============================================================================
// ECDSA Types (secp256k1)
// =============================================================================

/// Decoded `personal_sign` signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EcdsaSignature {
    /// R component (32 bytes)
    pub r: [u8; 32],
    /// S component (32 bytes)
    pub s: [u8; 32],
    /// Recovery ID (0, 1, 27, or 28)
    pub v: u8,
}

// =============================================================================
// Attestation
// =============================================================================

/// One participant's signed consent for a single account.
///
/// This is also the element type of the interchange JSON, where the fields
/// appear as `address`, `chain`, `message`, `signature` and `bundleId`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attestation {
    /// Account address as pasted (hex for Ethereum, base-58 for Solana)
    pub address: String,
    /// Chain the account lives on
    pub chain: ChainTag,
    /// Signed consent message
    pub message: String,
    /// Signature as pasted (`0x`-hex for Ethereum, base-58 for Solana)
    pub signature: String,
    /// Always [`BUNDLE_ID`]
    pub bundle_id: String,
}

impl Attestation {
    /// Create an attestation tagged with the fixed bundle id.
    pub fn new(
        address: impl Into<String>,
        chain: ChainTag,
        message: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            chain,
            message: message.into(),
            signature: signature.into(),
            bundle_id: BUNDLE_ID.to_string(),
        }
    }
}

// =============================================================================
// Verification Results
// =============================================================================

/// Outcome of checking one attestation's signature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VerificationVerdict {
    pub address: String,
    pub chain: ChainTag,
    pub valid: bool,
}

/// Result of verifying a whole bundle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BundleVerification {
    /// One verdict per entry, in bundle order
    pub verdicts: Vec<VerificationVerdict>,
    /// Whether every entry verified (vacuously true for an empty bundle)
    pub all_valid: bool,
    /// Addresses of entries that verified, in bundle order, duplicates kept
    pub valid_addresses: Vec<String>,
}

impl BundleVerification {
    /// Fold individual verdicts into the aggregate result.
    pub fn from_verdicts(verdicts: Vec<VerificationVerdict>) -> Self {
        let all_valid = verdicts.iter().all(|v| v.valid);
        let valid_addresses = verdicts
            .iter()
            .filter(|v| v.valid)
            .map(|v| v.address.clone())
            .collect();

        Self {
            verdicts,
            all_valid,
            valid_addresses,
        }
    }

    /// Count of entries that verified.
    pub fn valid_count(&self) -> usize {
        self.valid_addresses.len()
    }

    /// Count of entries that failed verification.
    pub fn invalid_count(&self) -> usize {
        self.verdicts.len() - self.valid_addresses.len()
    }

    /// Human-readable report handed to the presentation side.
    ///
    /// One `address (chain): Valid|Invalid` line per entry, then the
    /// aggregate line, then the comma-joined valid addresses (if any).
    pub fn render_report(&self) -> String {
        let mut out = String::new();
        for verdict in &self.verdicts {
            out.push_str(&format!(
                "{} ({}): {}\n",
                verdict.address,
                verdict.chain,
                if verdict.valid { "Valid" } else { "Invalid" }
            ));
        }
        out.push_str(&format!(
            "All Signatures Valid: {}",
            if self.all_valid { "Yes" } else { "No" }
        ));
        if !self.valid_addresses.is_empty() {
            out.push_str("\nValid Addresses: ");
            out.push_str(&self.valid_addresses.join(", "));
        }
        out
    }
}

// =============================================================================
// Bundle
// =============================================================================

/// How newly built attestations combine with a previously serialized bundle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMode {
    /// Discard existing content
    #[default]
    Replace,
    /// Keep existing entries and add the new ones after them
    Append,
}

impl FromStr for MergeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "replace" | "overwrite" => Ok(MergeMode::Replace),
            "append" | "add" => Ok(MergeMode::Append),
            other => Err(format!("unknown merge mode: {other}")),
        }
    }
}

/// Ordered collection of attestations for one proof-of-funds submission.
///
/// Insertion order is preserved and duplicate addresses are kept.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bundle {
    attestations: Vec<Attestation>,
}

impl Bundle {
    pub fn new(attestations: Vec<Attestation>) -> Self {
        Self { attestations }
    }

    pub fn attestations(&self) -> &[Attestation] {
        &self.attestations
    }

    pub fn len(&self) -> usize {
        self.attestations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attestations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attestation> {
        self.attestations.iter()
    }

    pub fn into_inner(self) -> Vec<Attestation> {
        self.attestations
    }
}

impl From<Vec<Attestation>> for Bundle {
    fn from(attestations: Vec<Attestation>) -> Self {
        Self::new(attestations)
    }
}

impl<'a> IntoIterator for &'a Bundle {
    type Item = &'a Attestation;
    type IntoIter = std::slice::Iter<'a, Attestation>;

    fn into_iter(self) -> Self::IntoIter {
        self.attestations.iter()
    }
}
