//! # Ed25519 Verification (Solana)
//!
//! A Solana account address is the base-58 encoding of its ed25519 public
//! key, and wallets sign the raw UTF-8 bytes of the message.

use super::errors::SignatureError;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};

/// Ed25519 public key length.
pub const PUBLIC_KEY_LEN: usize = 32;

/// Ed25519 signature length.
pub const SIGNATURE_LEN: usize = 64;

/// Verify a base-58 signature over `message` against a base-58 address.
pub fn verify_solana_message(
    message: &str,
    address: &str,
    signature: &str,
) -> Result<(), SignatureError> {
    let sig_bytes: [u8; SIGNATURE_LEN] = decode_fixed(signature)?;
    let key_bytes: [u8; PUBLIC_KEY_LEN] = decode_fixed(address)?;

    let verifying_key =
        VerifyingKey::from_bytes(&key_bytes).map_err(|_| SignatureError::InvalidPublicKey)?;
    let sig = Signature::from_bytes(&sig_bytes);

    verifying_key
        .verify(message.as_bytes(), &sig)
        .map_err(|_| SignatureError::VerificationFailed)
}

/// Base-58 decode into exactly `N` bytes.
fn decode_fixed<const N: usize>(encoded: &str) -> Result<[u8; N], SignatureError> {
    let bytes = bs58::decode(encoded)
        .into_vec()
        .map_err(|_| SignatureError::InvalidFormat)?;

    bytes
        .as_slice()
        .try_into()
        .map_err(|_| SignatureError::InvalidLength {
            expected: N,
            actual: bytes.len(),
        })
}
