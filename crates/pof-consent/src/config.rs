//! # Verifier Configuration
//!
//! Tuning for the verify phase. Defaults are suitable for interactive use;
//! every field can be overridden by the embedding binary.

use serde::{Deserialize, Serialize};

/// Configuration for batch verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Allow verifying entries on the rayon thread pool.
    pub parallel: bool,
    /// Bundles smaller than this are verified sequentially even when
    /// `parallel` is set.
    pub parallel_threshold: usize,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: 16,
        }
    }
}

impl VerifierConfig {
    /// Sequential verification only.
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Whether a bundle of `len` entries should be verified in parallel.
    pub fn use_parallel(&self, len: usize) -> bool {
        self.parallel && len >= self.parallel_threshold
    }
}
