//! # Format Validation
//!
//! Cheap structural checks run while building a bundle. None of these need a
//! key or the network, and none replace cryptographic verification.

use super::ecdsa::keccak256;
use super::entities::{ChainTag, EthAddress};
use super::message;

/// Solana account / ed25519 public key length.
pub const SOLANA_ADDRESS_LEN: usize = 32;

/// Whether `address` is well-formed for `chain`.
///
/// - Ethereum: `0x` followed by 40 hex digits. Single-case hex is accepted;
///   mixed case must match the EIP-55 checksum.
/// - Solana: base-58 that decodes to exactly 32 bytes.
pub fn is_valid_address(address: &str, chain: ChainTag) -> bool {
    match chain {
        ChainTag::Ethereum => is_valid_eth_address(address),
        ChainTag::Solana => bs58::decode(address)
            .into_vec()
            .is_ok_and(|bytes| bytes.len() == SOLANA_ADDRESS_LEN),
    }
}

/// Whether `signature` has the right outer shape for `chain`.
///
/// Length and byte-level checks are left to the verifier, which fails closed.
pub fn is_valid_signature_format(signature: &str, chain: ChainTag) -> bool {
    match chain {
        ChainTag::Ethereum => signature.starts_with("0x"),
        ChainTag::Solana => bs58::decode(signature).into_vec().is_ok(),
    }
}

/// Whether `message` carries the greeting line for `chain` and the bundle id line.
///
/// Address-independent wording check; callers normalize first.
pub fn is_expected_message(message: &str, _address: &str, chain: ChainTag) -> bool {
    message.contains(&message::greeting_line(chain)) && message.contains(&message::bundle_id_line())
}

/// EIP-55 mixed-case checksum encoding of a raw address.
pub fn to_checksum_address(address: &EthAddress) -> String {
    let lower = hex::encode(address);
    let hash = keccak256(lower.as_bytes());

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = if i % 2 == 0 {
            hash[i / 2] >> 4
        } else {
            hash[i / 2] & 0x0f
        };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Decode a `0x`-prefixed 20-byte hex address (any case, checksum ignored).
pub fn parse_eth_address(address: &str) -> Option<EthAddress> {
    let digits = address.strip_prefix("0x")?;
    if digits.len() != 40 {
        return None;
    }
    let mut out = [0u8; 20];
    hex::decode_to_slice(digits, &mut out).ok()?;
    Some(out)
}

fn is_valid_eth_address(address: &str) -> bool {
    let Some(raw) = parse_eth_address(address) else {
        return false;
    };

    let digits = &address[2..];
    let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
    if !(has_lower && has_upper) {
        return true;
    }

    to_checksum_address(&raw) == address
}
