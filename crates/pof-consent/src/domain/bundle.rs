//! # Bundle Aggregation
//!
//! Two phases, kept separate:
//!
//! 1. **Build**: each pasted block runs through the validation pipeline
//!    (parse → normalize → address check → message check → signature format
//!    check). The batch aborts at the first failing entry. No cryptography
//!    runs here.
//! 2. **Verify**: every entry is checked cryptographically. Failures are
//!    recorded per entry and never abort the batch.

use rayon::prelude::*;
use tracing::{info, warn};

use super::entities::{
    Attestation, Bundle, BundleVerification, MergeMode, VerificationVerdict, BUNDLE_ID,
};
use super::errors::{AttestationError, BundleError, FormatError};
use super::format;
use super::message;
use super::parser;
use super::verifier;
use crate::config::VerifierConfig;

// =============================================================================
// BUILD PHASE
// =============================================================================

/// Run one pasted block through the validation pipeline.
///
/// The returned attestation carries the normalized message.
pub fn validate_entry(text: &str) -> Result<Attestation, AttestationError> {
    let parsed = parser::parse(text)?;
    let chain = parsed.chain;
    let message = message::normalize(&parsed.message, &parsed.address, chain);

    if !format::is_valid_address(&parsed.address, chain) {
        return Err(FormatError::InvalidAddress {
            chain,
            address: parsed.address,
        }
        .into());
    }

    if !format::is_expected_message(message.as_str(), &parsed.address, chain) {
        return Err(AttestationError::MessageMismatch { chain });
    }

    if !format::is_valid_signature_format(&parsed.signature, chain) {
        return Err(FormatError::InvalidSignatureFormat { chain }.into());
    }

    Ok(Attestation::new(
        parsed.address,
        chain,
        message,
        parsed.signature,
    ))
}

/// Validate every non-blank block, in order.
///
/// Blank blocks are skipped but still count toward the 1-based index
/// reported on failure.
pub fn validate_entries<I, S>(blocks: I) -> Result<Vec<Attestation>, BundleError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut accepted = Vec::new();

    for (i, block) in blocks.into_iter().enumerate() {
        let index = i + 1;
        let text = block.as_ref().trim();
        if text.is_empty() {
            continue;
        }

        match validate_entry(text) {
            Ok(attestation) => accepted.push(attestation),
            Err(source) => {
                warn!(index, error = %source, "rejecting attestation entry");
                return Err(BundleError::InvalidEntry { index, source });
            }
        }
    }

    Ok(accepted)
}

/// Combine freshly validated attestations with a serialized bundle.
///
/// `Append` keeps `existing` entries first; an empty or whitespace-only
/// `existing` is an empty bundle. `Replace` ignores `existing` entirely.
pub fn merge_and_build(
    new_attestations: Vec<Attestation>,
    existing: &str,
    mode: MergeMode,
) -> Result<Bundle, BundleError> {
    match mode {
        MergeMode::Replace => Ok(Bundle::new(new_attestations)),
        MergeMode::Append => {
            let mut merged = parse_bundle(existing)?.into_inner();
            merged.extend(new_attestations);
            Ok(Bundle::new(merged))
        }
    }
}

/// Validate pasted blocks and merge them into a bundle.
///
/// Entry errors are reported before the existing bundle is looked at.
pub fn build_bundle<I, S>(blocks: I, existing: &str, mode: MergeMode) -> Result<Bundle, BundleError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let accepted = validate_entries(blocks)?;
    if accepted.is_empty() {
        return Err(BundleError::NoEntries);
    }

    let added = accepted.len();
    let bundle = merge_and_build(accepted, existing, mode)?;
    info!(added, total = bundle.len(), ?mode, "bundle built");
    Ok(bundle)
}

// =============================================================================
// INTERCHANGE FORMAT
// =============================================================================

/// Parse interchange JSON. Empty or whitespace-only input is an empty bundle.
pub fn parse_bundle(json: &str) -> Result<Bundle, BundleError> {
    if json.trim().is_empty() {
        return Ok(Bundle::default());
    }

    let bundle: Bundle = serde_json::from_str(json)
        .map_err(|e| BundleError::MalformedExistingBundle(e.to_string()))?;

    if let Some((i, att)) = bundle
        .iter()
        .enumerate()
        .find(|(_, att)| att.bundle_id != BUNDLE_ID)
    {
        return Err(BundleError::MalformedExistingBundle(format!(
            "entry {} has bundle id {:?}, expected {:?}",
            i + 1,
            att.bundle_id,
            BUNDLE_ID
        )));
    }

    Ok(bundle)
}

/// Serialize to interchange JSON (two-space indented array).
pub fn to_json(bundle: &Bundle) -> Result<String, BundleError> {
    serde_json::to_string_pretty(bundle).map_err(|e| BundleError::Serialization(e.to_string()))
}

// =============================================================================
// VERIFY PHASE
// =============================================================================

/// Verify every entry, in order, using the default configuration.
pub fn verify_all(bundle: &Bundle) -> BundleVerification {
    verify_all_with(bundle, &VerifierConfig::default())
}

/// Verify every entry, in order.
///
/// Large bundles are checked in parallel when the config allows it; verdict
/// order always matches bundle order and no entry is skipped.
pub fn verify_all_with(bundle: &Bundle, config: &VerifierConfig) -> BundleVerification {
    let entries = bundle.attestations();

    let verdicts: Vec<VerificationVerdict> = if config.use_parallel(entries.len()) {
        entries.par_iter().map(verifier::verify_attestation).collect()
    } else {
        entries.iter().map(verifier::verify_attestation).collect()
    };

    let result = BundleVerification::from_verdicts(verdicts);
    info!(
        total = entries.len(),
        valid = result.valid_count(),
        invalid = result.invalid_count(),
        all_valid = result.all_valid,
        "bundle verified"
    );
    result
}
