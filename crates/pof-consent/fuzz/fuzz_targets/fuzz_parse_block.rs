//! Fuzz target for the attestation block parser and build pipeline.
//!
//! ## Running
//!
//! ```bash
//! cd crates/pof-consent
//! cargo +nightly fuzz run fuzz_parse_block
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use pof_consent::{build_bundle, normalize_message, parse, MergeMode};

fuzz_target!(|text: &str| {
    // Parsing arbitrary text should NEVER panic
    let first = parse(text);
    let second = parse(text);
    assert_eq!(first, second);

    if let Ok(att) = first {
        // 1. Captured fields are trimmed and non-empty
        for field in [&att.address, &att.message, &att.signature] {
            assert!(!field.is_empty());
            assert_eq!(field.trim(), field.as_str());
        }

        // 2. Normalization is idempotent
        let once = normalize_message(&att.message, &att.address, att.chain);
        let twice = normalize_message(once.as_str(), &att.address, att.chain);
        if !att.address.contains("Issued At:") {
            assert_eq!(once, twice);
        }
    }

    let _ = build_bundle([text], "", MergeMode::Append);
});
