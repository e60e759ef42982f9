//! # Consent Message Canonicalization
//!
//! Builds the exact 7-line text a participant signs, and re-derives it from
//! pasted text so that cosmetic edits cannot yield a second valid message.
//!
//! Only the `Issued At:` value is taken from the pasted text. It is opaque:
//! no recency or format check is applied, so an old signed message still
//! re-canonicalizes to the same text.

use std::fmt;

use super::entities::{ChainTag, BUNDLE_ID};

/// Name shown in the greeting line.
pub const ISSUER: &str = "PoF-Group-2025";

/// The fixed consent sentence, including its "as of" date.
pub const CONSENT_STATEMENT: &str = "I consent to include my wallet address in the PoF Group 2025 bundle for aggregate proof of funds verification as of 2025-09-18.";

/// Text wallets are asked to sign before the consent message itself.
pub const CONFIRMATION_MESSAGE: &str =
    "I confirm that I want to proceed with signing the Proof of Funds consent message.";

/// Protocol version line value.
pub const MESSAGE_VERSION: u32 = 1;

const ISSUED_AT_LABEL: &str = "Issued At:";

/// A consent message whose structure was rendered by this module.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CanonicalMessage(String);

impl CanonicalMessage {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalMessage {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<CanonicalMessage> for String {
    fn from(message: CanonicalMessage) -> Self {
        message.0
    }
}

/// Greeting line for `chain`. Independent of the address.
pub fn greeting_line(chain: ChainTag) -> String {
    format!(
        "{ISSUER} wants you to sign in with your {} account:",
        chain.display_name()
    )
}

/// The `Bundle ID:` line.
pub fn bundle_id_line() -> String {
    format!("Bundle ID: {BUNDLE_ID}")
}

/// Render the canonical consent message.
pub fn build(address: &str, chain: ChainTag, timestamp: &str) -> CanonicalMessage {
    let lines = [
        greeting_line(chain),
        address.to_string(),
        CONSENT_STATEMENT.to_string(),
        bundle_id_line(),
        format!("Chain: {}", chain.template_id()),
        format!("Version: {MESSAGE_VERSION}"),
        format!("{ISSUED_AT_LABEL} {timestamp}"),
    ];
    CanonicalMessage(lines.join("\n"))
}

/// Re-render `raw` as a canonical message for `address` and `chain`.
///
/// Everything except the `Issued At:` value is discarded.
pub fn normalize(raw: &str, address: &str, chain: ChainTag) -> CanonicalMessage {
    build(address, chain, extract_issued_at(raw))
}

/// Value following the first `Issued At:` label, or `""`.
///
/// Spaces and tabs after the label are skipped; the value ends at the next
/// whitespace character. A label followed directly by a line break yields `""`.
pub fn extract_issued_at(raw: &str) -> &str {
    let Some(pos) = raw.find(ISSUED_AT_LABEL) else {
        return "";
    };

    let rest = raw[pos + ISSUED_AT_LABEL.len()..].trim_start_matches([' ', '\t']);
    let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    &rest[..end]
}
