//! # Inbound Ports (Driving Ports / API)
//!
//! Traits that define the public API of the consent protocol.

use crate::domain::entities::{
    Attestation, Bundle, BundleVerification, ChainTag, MergeMode, VerificationVerdict,
};
use crate::domain::errors::{AttestationError, BundleError};
use crate::domain::message::CanonicalMessage;

/// Primary consent bundle API.
///
/// This is the main entry point for organizer tooling. Implementations must
/// be thread-safe (`Send + Sync`).
pub trait ConsentBundleApi: Send + Sync {
    // =========================================================================
    // Message Operations
    // =========================================================================

    /// Render the message a participant must sign.
    fn canonical_message(&self, address: &str, chain: ChainTag, timestamp: &str)
        -> CanonicalMessage;

    // =========================================================================
    // Build Phase
    // =========================================================================

    /// Run a single pasted block through the validation pipeline.
    fn validate_entry(&self, text: &str) -> Result<Attestation, AttestationError>;

    /// Validate pasted blocks and merge them with `existing` per `mode`.
    ///
    /// # Errors
    /// * `BundleError::InvalidEntry` - first failing entry (1-based index)
    /// * `BundleError::NoEntries` - every block was blank
    /// * `BundleError::MalformedExistingBundle` - `Append` target unreadable
    fn build_bundle(
        &self,
        blocks: &[String],
        existing: &str,
        mode: MergeMode,
    ) -> Result<Bundle, BundleError>;

    /// Serialize a bundle to the interchange format.
    fn export_bundle(&self, bundle: &Bundle) -> Result<String, BundleError>;

    /// Load a bundle from the interchange format.
    fn import_bundle(&self, json: &str) -> Result<Bundle, BundleError>;

    // =========================================================================
    // Verify Phase
    // =========================================================================

    /// Cryptographically verify one attestation.
    fn verify_attestation(&self, attestation: &Attestation) -> VerificationVerdict;

    /// Verify every entry of a bundle, in order, without short-circuiting.
    fn verify_bundle(&self, bundle: &Bundle) -> BundleVerification;
}
