//! # Attestation Block Parser
//!
//! Extracts the four labeled fields from the text a participant pastes:
//!
//! ```text
//! Address: <address>
//! Chain: <ethereum|solana>
//! Consent Message: <multi-line message>
//! Signature: <signature>
//! ```
//!
//! Arbitrary text may surround the block. Labels are located in the order
//! above, each one searched after the end of the previous field, so the
//! `Chain: 1` line inside the consent message can never be mistaken for the
//! outer `Chain:` field.

use super::entities::{Attestation, ChainTag};
use super::errors::ParseError;

const ADDRESS_LABEL: &str = "Address:";
const CHAIN_LABEL: &str = "Chain:";
const MESSAGE_LABEL: &str = "Consent Message:";
const SIGNATURE_LABEL: &str = "Signature:";

/// Scanner position within the expected label sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Address,
    Chain,
    ConsentMessage,
    Signature,
    Done,
}

impl State {
    fn label(self) -> &'static str {
        match self {
            State::Address => ADDRESS_LABEL,
            State::Chain => CHAIN_LABEL,
            State::ConsentMessage => MESSAGE_LABEL,
            State::Signature | State::Done => SIGNATURE_LABEL,
        }
    }

    fn field_name(self) -> &'static str {
        match self {
            State::Address => "Address",
            State::Chain => "Chain",
            State::ConsentMessage => "Consent Message",
            State::Signature | State::Done => "Signature",
        }
    }
}

#[derive(Default)]
struct Fields<'a> {
    address: &'a str,
    chain: &'a str,
    message: &'a str,
    signature: &'a str,
}

/// Parse a pasted block into an [`Attestation`].
///
/// The returned message is the raw pasted text (trimmed); run it through
/// [`normalize`](super::message::normalize) before trusting it.
pub fn parse(text: &str) -> Result<Attestation, ParseError> {
    let mut fields = Fields::default();
    let mut state = State::Address;
    let mut cursor = 0;

    // Address and Chain precede the message; the message body carries its
    // own `Chain:` line.
    let header_end = text.find(MESSAGE_LABEL).unwrap_or(text.len());

    while state != State::Done {
        let label = state.label();
        let search_end = match state {
            State::Address | State::Chain => header_end,
            _ => text.len(),
        };
        let start = text[cursor..search_end]
            .find(label)
            .map(|offset| cursor + offset + label.len())
            .ok_or(ParseError::MissingField(state.field_name()))?;

        let (raw, end, next) = match state {
            State::Address | State::Chain | State::Signature => {
                let end = line_end(text, start).min(search_end);
                let next = match state {
                    State::Address => State::Chain,
                    State::Chain => State::ConsentMessage,
                    _ => State::Done,
                };
                (&text[start..end], end, next)
            }
            State::ConsentMessage => {
                // Ends where the Signature label begins; a missing label is
                // reported by the Signature state.
                let end = text[start..]
                    .find(SIGNATURE_LABEL)
                    .map_or(text.len(), |offset| start + offset);
                (&text[start..end], end, State::Signature)
            }
            State::Done => unreachable!("loop exits before Done"),
        };

        let value = raw.trim();
        if value.is_empty() {
            return Err(ParseError::MissingField(state.field_name()));
        }

        match state {
            State::Address => fields.address = value,
            State::Chain => fields.chain = value,
            State::ConsentMessage => fields.message = value,
            State::Signature => fields.signature = value,
            State::Done => {}
        }

        cursor = end;
        state = next;
    }

    let chain: ChainTag = fields.chain.parse()?;

    Ok(Attestation::new(
        fields.address,
        chain,
        fields.message,
        fields.signature,
    ))
}

/// Render the block the signing page hands to participants.
///
/// `parse(&render_attestation_block(a))` yields `a` back whenever the fields
/// carry no surrounding whitespace.
pub fn render_attestation_block(attestation: &Attestation) -> String {
    format!(
        "{ADDRESS_LABEL} {}\n{CHAIN_LABEL} {}\n{MESSAGE_LABEL} {}\n{SIGNATURE_LABEL} {}",
        attestation.address, attestation.chain, attestation.message, attestation.signature
    )
}

fn line_end(text: &str, from: usize) -> usize {
    text[from..].find('\n').map_or(text.len(), |offset| from + offset)
}
