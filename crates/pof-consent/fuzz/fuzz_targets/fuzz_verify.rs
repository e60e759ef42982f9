//! Fuzz target for chain-dispatched signature verification.
//!
//! ## Running
//!
//! ```bash
//! cd crates/pof-consent
//! cargo +nightly fuzz run fuzz_verify
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use pof_consent::{verify, verify_detailed, ChainTag};

/// Fuzz input structure for verification.
#[derive(Debug, arbitrary::Arbitrary)]
struct FuzzInput {
    message: String,
    address: String,
    signature: String,
    /// Selects the chain
    solana: bool,
    /// Raw 65-byte Ethereum signature candidate
    raw_sig: [u8; 65],
}

fuzz_target!(|input: FuzzInput| {
    let chain = if input.solana {
        ChainTag::Solana
    } else {
        ChainTag::Ethereum
    };

    // Verify - this should NEVER panic, regardless of input
    let result = verify(&input.message, &input.address, chain, &input.signature);

    // 1. Result should be deterministic
    assert_eq!(
        result,
        verify(&input.message, &input.address, chain, &input.signature)
    );

    // 2. bool and detailed forms agree
    assert_eq!(
        result,
        verify_detailed(&input.message, &input.address, chain, &input.signature).is_ok()
    );

    // 3. Structurally valid but random signatures exercise key recovery
    let hex_sig = format!("0x{}", hex::encode(input.raw_sig));
    let _ = verify(&input.message, &input.address, ChainTag::Ethereum, &hex_sig);
});
