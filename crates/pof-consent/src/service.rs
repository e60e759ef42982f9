//! # Consent Bundle Service
//!
//! Application service layer that implements the `ConsentBundleApi` trait.
//!
//! ## Architecture
//!
//! This is the hexagonal "application service" that:
//! - Implements the inbound port (`ConsentBundleApi`)
//! - Carries the verifier configuration
//! - Delegates protocol logic to the domain layer

use crate::config::VerifierConfig;
use crate::domain::bundle;
use crate::domain::entities::{
    Attestation, Bundle, BundleVerification, ChainTag, MergeMode, VerificationVerdict,
};
use crate::domain::errors::{AttestationError, BundleError};
use crate::domain::message::{self, CanonicalMessage};
use crate::domain::verifier;
use crate::ports::inbound::ConsentBundleApi;

/// Consent Bundle Service.
///
/// Stateless apart from its configuration; safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct ConsentService {
    config: VerifierConfig,
}

impl ConsentService {
    /// Create a new service with the given verifier configuration.
    pub fn new(config: VerifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }
}

impl ConsentBundleApi for ConsentService {
    fn canonical_message(
        &self,
        address: &str,
        chain: ChainTag,
        timestamp: &str,
    ) -> CanonicalMessage {
        message::build(address, chain, timestamp)
    }

    fn validate_entry(&self, text: &str) -> Result<Attestation, AttestationError> {
        bundle::validate_entry(text)
    }

    fn build_bundle(
        &self,
        blocks: &[String],
        existing: &str,
        mode: MergeMode,
    ) -> Result<Bundle, BundleError> {
        bundle::build_bundle(blocks, existing, mode)
    }

    fn export_bundle(&self, bundle: &Bundle) -> Result<String, BundleError> {
        bundle::to_json(bundle)
    }

    fn import_bundle(&self, json: &str) -> Result<Bundle, BundleError> {
        bundle::parse_bundle(json)
    }

    fn verify_attestation(&self, attestation: &Attestation) -> VerificationVerdict {
        verifier::verify_attestation(attestation)
    }

    fn verify_bundle(&self, bundle: &Bundle) -> BundleVerification {
        bundle::verify_all_with(bundle, &self.config)
    }
}
