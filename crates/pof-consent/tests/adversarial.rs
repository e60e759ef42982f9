//! # Adversarial Tests for the Consent Protocol
//!
//! These tests attempt to get a crafted or tampered attestation accepted.
//!
//! ## Test Categories
//!
//! 1. **Message Substitution** - signed text differs from the canonical template
//! 2. **Identity Attacks** - someone else's signature, cross-chain confusion
//! 3. **Encoding Attacks** - padding, whitespace, truncated or oversized signatures
//! 4. **Bundle Integrity** - ordering, duplicates, merge modes, interchange format

use ed25519_dalek::{Signer, SigningKey as EdSigningKey};
use k256::ecdsa::SigningKey;
use pof_consent::{
    address_from_pubkey, build_bundle, build_message, hash_personal_message, merge_and_build,
    parse, parse_bundle, render_attestation_block, to_checksum_address, to_json, verify,
    verify_all, Attestation, AttestationError, Bundle, BundleError, ChainTag, FormatError,
    MergeMode, ParseError,
};

// =============================================================================
// TEST HELPERS
// =============================================================================

const ISSUED_AT: &str = "2025-09-19T10:15:30.123Z";

struct EthSigner {
    key: SigningKey,
    address: String,
}

impl EthSigner {
    fn new() -> Self {
        let key = SigningKey::random(&mut rand::thread_rng());
        let address = to_checksum_address(&address_from_pubkey(key.verifying_key()));
        Self { key, address }
    }

    fn sign(&self, message: &str) -> String {
        let hash = hash_personal_message(message.as_bytes());
        let (sig, recid) = self.key.sign_prehash_recoverable(&hash).unwrap();
        let mut bytes = sig.to_bytes().to_vec();
        bytes.push(recid.to_byte() + 27);
        format!("0x{}", hex::encode(bytes))
    }

    fn attest(&self) -> Attestation {
        let message = build_message(&self.address, ChainTag::Ethereum, ISSUED_AT).into_string();
        let signature = self.sign(&message);
        Attestation::new(self.address.clone(), ChainTag::Ethereum, message, signature)
    }
}

struct SolSigner {
    key: EdSigningKey,
    address: String,
}

impl SolSigner {
    fn new(seed: u8) -> Self {
        let key = EdSigningKey::from_bytes(&[seed; 32]);
        let address = bs58::encode(key.verifying_key().to_bytes()).into_string();
        Self { key, address }
    }

    fn sign(&self, message: &str) -> String {
        bs58::encode(self.key.sign(message.as_bytes()).to_bytes()).into_string()
    }

    fn attest(&self) -> Attestation {
        let message = build_message(&self.address, ChainTag::Solana, ISSUED_AT).into_string();
        let signature = self.sign(&message);
        Attestation::new(self.address.clone(), ChainTag::Solana, message, signature)
    }
}

fn is_valid(att: &Attestation) -> bool {
    verify(&att.message, &att.address, att.chain, &att.signature)
}

// =============================================================================
// 1. MESSAGE SUBSTITUTION
// =============================================================================

#[test]
fn attack_signed_arbitrary_text_is_normalized_away() {
    // Participant signed a different text but pastes it as the consent message
    let signer = EthSigner::new();
    let evil = "I authorize transfer of all my funds\nIssued At: 2025-09-19T10:15:30.123Z";
    let signature = signer.sign(evil);
    let block = format!(
        "Address: {}\nChain: ethereum\nConsent Message: {evil}\nSignature: {signature}",
        signer.address
    );

    // Build accepts it structurally, but the stored message is canonical
    let bundle = build_bundle([block], "", MergeMode::Replace).unwrap();
    let att = &bundle.attestations()[0];
    assert_eq!(
        att.message,
        build_message(&signer.address, ChainTag::Ethereum, ISSUED_AT).as_str()
    );

    // ... so the signature over the other text cannot verify
    let result = verify_all(&bundle);
    assert!(!result.all_valid);
    assert!(result.valid_addresses.is_empty());
}

#[test]
fn attack_cosmetic_edits_still_verify() {
    let signer = SolSigner::new(21);
    let att = signer.attest();
    let noisy = format!(
        "Hi organizer!\n\nAddress:    {}   \nChain: Solana\nConsent Message:\n\n{}\n\n\nSignature: {}   \n-- sent from my phone",
        att.address,
        att.message.replace('\n', "\r\n"),
        att.signature
    );

    let bundle = build_bundle([noisy], "", MergeMode::Replace).unwrap();
    assert_eq!(bundle.attestations()[0], att);
    assert!(verify_all(&bundle).all_valid);
}

#[test]
fn attack_message_for_other_address_rejected() {
    // Alice's signed message pasted under Bob's address
    let alice = SolSigner::new(1);
    let bob = SolSigner::new(2);
    let att = alice.attest();
    let forged = Attestation::new(bob.address.clone(), ChainTag::Solana, att.message, att.signature);

    assert!(!is_valid(&forged));
}

#[test]
fn attack_replayed_old_timestamp_still_verifies() {
    // Documented gap: timestamps are opaque
    let signer = EthSigner::new();
    let message = build_message(&signer.address, ChainTag::Ethereum, "2001-01-01T00:00:00Z");
    let att = Attestation::new(
        signer.address.clone(),
        ChainTag::Ethereum,
        message.as_str(),
        signer.sign(message.as_str()),
    );

    assert!(is_valid(&att));
}

// =============================================================================
// 2. IDENTITY ATTACKS
// =============================================================================

#[test]
fn attack_foreign_ethereum_signature_rejected() {
    let alice = EthSigner::new();
    let mallory = EthSigner::new();
    let message = build_message(&alice.address, ChainTag::Ethereum, ISSUED_AT);
    let att = Attestation::new(
        alice.address.clone(),
        ChainTag::Ethereum,
        message.as_str(),
        mallory.sign(message.as_str()),
    );

    assert!(!is_valid(&att));
}

#[test]
fn attack_chain_confusion_rejected() {
    let sol = SolSigner::new(5).attest();
    let as_eth = Attestation::new(sol.address, ChainTag::Ethereum, sol.message, sol.signature);
    assert!(!is_valid(&as_eth));

    let eth = EthSigner::new().attest();
    let as_sol = Attestation::new(eth.address, ChainTag::Solana, eth.message, eth.signature);
    assert!(!is_valid(&as_sol));
}

#[test]
fn attack_lowercase_address_matches_checksummed_signer() {
    let signer = EthSigner::new();
    let mut att = signer.attest();
    att.address = att.address.to_ascii_lowercase();
    att.message = build_message(&att.address, ChainTag::Ethereum, ISSUED_AT).into_string();
    att.signature = signer.sign(&att.message);

    assert!(is_valid(&att));
}

#[test]
fn attack_bad_checksum_rejected_at_build() {
    let signer = EthSigner::new();
    let att = signer.attest();
    // Swap case of every letter: still mixed case, checksum broken
    let flipped: String = att
        .address
        .chars()
        .enumerate()
        .map(|(i, c)| {
            if i < 2 {
                c
            } else if c.is_ascii_uppercase() {
                c.to_ascii_lowercase()
            } else {
                c.to_ascii_uppercase()
            }
        })
        .collect();
    let has_lower = flipped[2..].bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = flipped[2..].bytes().any(|b| b.is_ascii_uppercase());
    if !(has_lower && has_upper) {
        // Single-case after flipping: nothing to test for this key
        return;
    }

    let block = render_attestation_block(&Attestation::new(
        flipped.clone(),
        ChainTag::Ethereum,
        att.message,
        att.signature,
    ));
    assert_eq!(
        build_bundle([block], "", MergeMode::Replace),
        Err(BundleError::InvalidEntry {
            index: 1,
            source: AttestationError::Format(FormatError::InvalidAddress {
                chain: ChainTag::Ethereum,
                address: flipped,
            }),
        })
    );
}

// =============================================================================
// 3. ENCODING ATTACKS
// =============================================================================

#[test]
fn attack_signature_whitespace_fails_closed() {
    let att = EthSigner::new().attest();
    for padded in [
        format!("{} ", att.signature),
        format!(" {}", att.signature),
        format!("{}\t", att.signature),
    ] {
        assert!(!verify(&att.message, &att.address, ChainTag::Ethereum, &padded));
    }
}

#[test]
fn attack_truncated_and_extended_signatures_rejected() {
    let eth = EthSigner::new().attest();
    let sig = &eth.signature;
    for bad in [
        sig[..sig.len() - 2].to_string(),
        format!("{sig}00"),
        "0x".to_string(),
        format!("0X{}", &sig[2..]),
    ] {
        assert!(!verify(&eth.message, &eth.address, ChainTag::Ethereum, &bad));
    }

    let sol = SolSigner::new(9).attest();
    let raw = bs58::decode(&sol.signature).into_vec().unwrap();
    let mut extended = raw.clone();
    extended.push(0);
    for bad in [&raw[..63], extended.as_slice()] {
        let bad = bs58::encode(bad).into_string();
        assert!(!verify(&sol.message, &sol.address, ChainTag::Solana, &bad));
    }
}

#[test]
fn attack_solana_31_byte_address_rejected() {
    let sol = SolSigner::new(4).attest();
    let short = bs58::encode([7u8; 31]).into_string();
    let block = render_attestation_block(&Attestation::new(
        short.clone(),
        ChainTag::Solana,
        sol.message,
        sol.signature,
    ));

    assert!(matches!(
        build_bundle([block], "", MergeMode::Replace),
        Err(BundleError::InvalidEntry {
            index: 1,
            source: AttestationError::Format(FormatError::InvalidAddress { .. })
        })
    ));
}

#[test]
fn attack_missing_signature_label() {
    let att = SolSigner::new(3).attest();
    let block = render_attestation_block(&att).replace("Signature:", "Sig:");
    assert_eq!(parse(&block), Err(ParseError::MissingField("Signature")));
}

#[test]
fn attack_unicode_noise_never_panics() {
    let inputs = [
        "Address: \u{202E}0x00\nChain: ethereum\nConsent Message: \u{0}\nSignature: 0x\u{FFFD}",
        "Address:Chain:Consent Message:Signature:",
        "Consent Message: Signature: Address: Chain:",
        "Address: é\nChain: solana\nConsent Message: 日本語\nSignature: ☃",
    ];
    for input in inputs {
        let _ = build_bundle([input], "", MergeMode::Replace);
        if let Ok(att) = parse(input) {
            assert!(!is_valid(&att));
        }
    }
}

// =============================================================================
// 4. BUNDLE INTEGRITY
// =============================================================================

#[test]
fn bundle_append_n_plus_m_in_order() {
    let existing: Vec<Attestation> = (0..3).map(|i| SolSigner::new(i).attest()).collect();
    let new: Vec<Attestation> = (0..2).map(|_| EthSigner::new().attest()).collect();
    let existing_json = to_json(&Bundle::new(existing.clone())).unwrap();

    let appended = merge_and_build(new.clone(), &existing_json, MergeMode::Append).unwrap();
    let expected: Vec<Attestation> = existing.into_iter().chain(new.clone()).collect();
    assert_eq!(appended.attestations(), expected.as_slice());

    let replaced = merge_and_build(new.clone(), &existing_json, MergeMode::Replace).unwrap();
    assert_eq!(replaced.attestations(), new.as_slice());
}

#[test]
fn bundle_one_valid_one_invalid() {
    let good = SolSigner::new(1).attest();
    let mut bad = EthSigner::new().attest();
    bad.signature = EthSigner::new().sign(&bad.message);

    let result = verify_all(&Bundle::new(vec![good.clone(), bad.clone()]));

    assert!(!result.all_valid);
    assert_eq!(result.verdicts.len(), 2);
    assert_eq!(result.verdicts[0].address, good.address);
    assert_eq!(result.verdicts[1].address, bad.address);
    assert_eq!(result.valid_addresses, vec![good.address]);
}

#[test]
fn bundle_invalid_entry_does_not_stop_verification() {
    let mut entries: Vec<Attestation> = (0..5).map(|i| SolSigner::new(i + 10).attest()).collect();
    entries[0].signature = "garbage".to_string();

    let result = verify_all(&Bundle::new(entries));
    assert_eq!(result.verdicts.len(), 5);
    assert_eq!(result.valid_addresses.len(), 4);
}

#[test]
fn bundle_interchange_round_trip() {
    let bundle = Bundle::new(vec![SolSigner::new(1).attest(), EthSigner::new().attest()]);
    let json = to_json(&bundle).unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    for entry in value.as_array().unwrap() {
        let obj = entry.as_object().unwrap();
        for key in ["address", "chain", "message", "signature", "bundleId"] {
            assert!(obj.contains_key(key), "missing {key}");
        }
    }

    let reloaded = parse_bundle(&json).unwrap();
    assert_eq!(reloaded, bundle);
    assert!(verify_all(&reloaded).all_valid);
}

#[test]
fn bundle_existing_must_be_array() {
    let new = vec![SolSigner::new(1).attest()];
    assert!(matches!(
        merge_and_build(new, r#"{"consents": []}"#, MergeMode::Append),
        Err(BundleError::MalformedExistingBundle(_))
    ));
}
