//! # Command Handlers
//!
//! Each handler reads its inputs, calls the consent service, and returns the
//! text to print. File I/O lives here and nowhere in `pof-consent`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{SecondsFormat, Utc};
use pof_consent::{
    BundleVerification, ChainTag, ConsentBundleApi, ConsentService, MergeMode,
};
use tracing::info;

/// Current UTC time as wallets' signing pages render it (`2025-09-18T12:00:00.000Z`).
pub fn current_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `pof message`: render the consent text for an account.
pub fn message(
    service: &ConsentService,
    address: &str,
    chain: ChainTag,
    issued_at: Option<String>,
) -> Result<String> {
    if !pof_consent::is_valid_address(address, chain) {
        bail!("{address} is not a valid {chain} address");
    }
    let timestamp = issued_at.unwrap_or_else(current_timestamp);
    Ok(service
        .canonical_message(address, chain, &timestamp)
        .into_string())
}

/// `pof build`: validate pasted blocks and write the interchange JSON.
///
/// Each input file holds one attestation block. Returns the JSON written.
pub fn build(
    service: &ConsentService,
    inputs: &[PathBuf],
    existing: Option<&Path>,
    mode: MergeMode,
    output: Option<&Path>,
) -> Result<String> {
    let blocks = inputs
        .iter()
        .map(|path| {
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let existing_json = match existing {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading existing bundle {}", path.display()))?,
        None => String::new(),
    };

    let bundle = service
        .build_bundle(&blocks, &existing_json, mode)
        .context("building bundle")?;
    let json = service.export_bundle(&bundle)?;

    if let Some(path) = output {
        fs::write(path, &json).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), entries = bundle.len(), "bundle written");
    }

    Ok(json)
}

/// `pof verify`: verify every entry of a bundle file.
///
/// An empty bundle (`[]`) is vacuously valid.
pub fn verify(service: &ConsentService, bundle_path: &Path) -> Result<BundleVerification> {
    let json = fs::read_to_string(bundle_path)
        .with_context(|| format!("reading {}", bundle_path.display()))?;
    let bundle = service
        .import_bundle(&json)
        .with_context(|| format!("parsing {}", bundle_path.display()))?;

    Ok(service.verify_bundle(&bundle))
}
