//! # Domain Layer
//!
//! Pure protocol logic with no I/O dependencies.
//! This is the inner layer of the hexagonal architecture.

pub mod bundle;
pub mod ecdsa;
pub mod ed25519;
pub mod entities;
pub mod errors;
pub mod format;
pub mod message;
pub mod parser;
pub mod verifier;
