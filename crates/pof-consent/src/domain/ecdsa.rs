//! # ECDSA Verification (secp256k1, personal-sign)
//!
//! Pure domain logic for Ethereum `personal_sign` signatures (EIP-191
//! version `0x45`).
//!
//! ## Security Notes
//!
//! - **Malleability Prevention (EIP-2)**: S must be STRICTLY LESS THAN SECP256K1_HALF_ORDER
//! - **Scalar Range Validation**: R and S must be in [1, n-1]
//! - **Constant-Time Operations**: Uses `subtle` crate for side-channel resistance
//! - **Fail Closed**: any decode error is a verification failure
//! - Uses k256 crate for cryptographic operations

use super::entities::{EcdsaSignature, EthAddress, Hash};
use super::errors::SignatureError;
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use sha3::{Digest, Keccak256};
use subtle::{Choice, ConstantTimeEq};

/// Prefix prepended by wallets before hashing a personal message.
pub const PERSONAL_MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// Encoded signature length: r (32) || s (32) || v (1).
pub const SIGNATURE_LEN: usize = 65;

/// secp256k1 curve order n
/// n = 0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141
const SECP256K1_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// Half of the secp256k1 curve order (for malleability check).
const SECP256K1_HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

// =============================================================================
// CORE VERIFICATION FUNCTIONS
// =============================================================================

/// Verify that `signature` over `message` was produced by `expected_address`.
///
/// The address comparison is case-insensitive, so checksummed and
/// lowercase forms of the same account are equivalent.
pub fn verify_personal_message(
    message: &str,
    expected_address: &str,
    signature: &str,
) -> Result<(), SignatureError> {
    let signature = decode_signature(signature)?;
    let message_hash = hash_personal_message(message.as_bytes());
    let recovered = recover_checked(&message_hash, &signature)?;

    let actual = format!("0x{}", hex::encode(recovered));
    if actual != expected_address.to_ascii_lowercase() {
        return Err(SignatureError::SignerMismatch {
            expected: expected_address.to_string(),
            actual,
        });
    }

    Ok(())
}

/// Recover the signer after range and malleability checks.
///
/// Security validations performed:
/// 1. R is in valid range [1, n-1] per SEC1 standard
/// 2. S is in valid range [1, n-1] per SEC1 standard
/// 3. S is in lower half per EIP-2 malleability protection
/// 4. Recovery ID (v) is valid (0, 1, 27, or 28)
/// 5. Public key recovery succeeds
pub fn recover_checked(
    message_hash: &Hash,
    signature: &EcdsaSignature,
) -> Result<EthAddress, SignatureError> {
    if !is_valid_scalar(&signature.r) || !is_valid_scalar(&signature.s) {
        return Err(SignatureError::InvalidFormat);
    }

    if !is_low_s(&signature.s) {
        return Err(SignatureError::MalleableSignature);
    }

    recover_address(message_hash, signature)
}

/// Recover the signer's Ethereum address from a signature.
pub fn recover_address(
    message_hash: &Hash,
    signature: &EcdsaSignature,
) -> Result<EthAddress, SignatureError> {
    let recovery_id = parse_recovery_id(signature.v)?;

    let mut sig_bytes = [0u8; 64];
    sig_bytes[..32].copy_from_slice(&signature.r);
    sig_bytes[32..].copy_from_slice(&signature.s);

    let sig = Signature::from_slice(&sig_bytes).map_err(|_| SignatureError::InvalidFormat)?;

    let recovered_key = VerifyingKey::recover_from_prehash(message_hash, &sig, recovery_id)
        .map_err(|_| SignatureError::RecoveryFailed)?;

    Ok(address_from_pubkey(&recovered_key))
}

/// Decode a `0x`-prefixed 65-byte hex signature into its components.
///
/// No trimming is performed: surrounding whitespace is a decode failure.
pub fn decode_signature(signature: &str) -> Result<EcdsaSignature, SignatureError> {
    let digits = signature
        .strip_prefix("0x")
        .ok_or(SignatureError::InvalidFormat)?;
    let bytes = hex::decode(digits).map_err(|_| SignatureError::InvalidFormat)?;

    if bytes.len() != SIGNATURE_LEN {
        return Err(SignatureError::InvalidLength {
            expected: SIGNATURE_LEN,
            actual: bytes.len(),
        });
    }

    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&bytes[..32]);
    s.copy_from_slice(&bytes[32..64]);

    Ok(EcdsaSignature { r, s, v: bytes[64] })
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Keccak256 hash function.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

/// EIP-191 personal message digest:
/// `keccak256("\x19Ethereum Signed Message:\n" || len(message) || message)`.
pub fn hash_personal_message(message: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(PERSONAL_MESSAGE_PREFIX.as_bytes());
    hasher.update(message.len().to_string().as_bytes());
    hasher.update(message);
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

/// Derive Ethereum address from public key.
pub fn address_from_pubkey(public_key: &VerifyingKey) -> EthAddress {
    let pubkey_bytes = public_key.to_encoded_point(false);
    let pubkey_slice = pubkey_bytes.as_bytes();

    // Keccak256 hash of public key (without 0x04 prefix)
    let hash = keccak256(&pubkey_slice[1..]);

    // Take last 20 bytes as address
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}

/// Check if S value is in lower half of curve order (EIP-2 malleability protection).
///
/// Per EIP-2: S must be STRICTLY LESS THAN half_order (not equal)
///
/// ## Security: Constant-Time Implementation
///
/// The comparison runs in fixed time regardless of input values.
fn is_low_s(s: &[u8; 32]) -> bool {
    let mut less = Choice::from(0u8);
    let mut greater = Choice::from(0u8);

    for i in 0..32 {
        let s_byte = s[i];
        let h_byte = SECP256K1_HALF_ORDER[i];

        let not_decided = !(less | greater);
        let byte_less = Choice::from((s_byte < h_byte) as u8);
        let byte_greater = Choice::from((s_byte > h_byte) as u8);

        less |= not_decided & byte_less;
        greater |= not_decided & byte_greater;
    }

    less.into()
}

/// Check if a scalar value is in valid range [1, n-1] for ECDSA.
///
/// Uses constant-time operations to prevent timing side-channel attacks.
fn is_valid_scalar(scalar: &[u8; 32]) -> bool {
    let mut is_zero = Choice::from(1u8);
    for &byte in scalar {
        is_zero &= byte.ct_eq(&0u8);
    }

    let mut less = Choice::from(0u8);
    let mut greater = Choice::from(0u8);

    for i in 0..32 {
        let s_byte = scalar[i];
        let n_byte = SECP256K1_ORDER[i];

        let not_decided = !(less | greater);
        let byte_less = Choice::from((s_byte < n_byte) as u8);
        let byte_greater = Choice::from((s_byte > n_byte) as u8);

        less |= not_decided & byte_less;
        greater |= not_decided & byte_greater;
    }

    let valid = !is_zero & less;
    valid.into()
}

/// Parse recovery ID from v value.
///
/// Valid v values: 0, 1, 27, 28
fn parse_recovery_id(v: u8) -> Result<RecoveryId, SignatureError> {
    let id = match v {
        0 | 27 => 0,
        1 | 28 => 1,
        _ => return Err(SignatureError::InvalidRecoveryId(v)),
    };

    RecoveryId::try_from(id).map_err(|_| SignatureError::InvalidRecoveryId(v))
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use super::*;
    use crate::domain::format::to_checksum_address;
    use k256::ecdsa::SigningKey;

    /// Generate a new ECDSA keypair.
    pub fn generate_keypair() -> (SigningKey, VerifyingKey) {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        let verifying_key = *signing_key.verifying_key();
        (signing_key, verifying_key)
    }

    /// Checksummed address of a signing key.
    pub fn eth_address(private_key: &SigningKey) -> String {
        to_checksum_address(&address_from_pubkey(private_key.verifying_key()))
    }

    /// Sign like a wallet's `personal_sign`, returning `0x` r || s || v (v = 27/28).
    pub fn personal_sign(message: &str, private_key: &SigningKey) -> String {
        let hash = hash_personal_message(message.as_bytes());
        let (sig, recid) = private_key
            .sign_prehash_recoverable(&hash)
            .expect("signing failed");

        // k256 already normalizes to low S
        let mut bytes = sig.to_bytes().to_vec();
        bytes.push(recid.to_byte() + 27);
        format!("0x{}", hex::encode(bytes))
    }

    /// Invert S value for malleability testing: s' = n - s
    pub fn invert_s(s: &[u8; 32]) -> [u8; 32] {
        let mut result = [0u8; 32];
        let mut borrow: i32 = 0;

        for i in (0..32).rev() {
            let diff = (SECP256K1_ORDER[i] as i32) - (s[i] as i32) - borrow;
            if diff < 0 {
                result[i] = (diff + 256) as u8;
                borrow = 1;
            } else {
                result[i] = diff as u8;
                borrow = 0;
            }
        }

        result
    }
}

// =============================================================================
// UNIT TESTS
// =============================================================================
