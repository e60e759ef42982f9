//! # Ports Layer
//!
//! Trait definitions for the hexagonal architecture.
//! - **Inbound (Driving)**: API that organizer tooling calls
//!
//! There is no outbound port: the protocol performs no I/O and hands its
//! results straight back to the caller.

pub mod inbound;
