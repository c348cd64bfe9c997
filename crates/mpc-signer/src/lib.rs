//! Client side of the NEAR chain-signatures MPC protocol.
//!
//! This crate provides:
//! - Child key derivation from the signer's root key (`kdf`)
//! - The `sign` request wire model and deposit amounts (`request`)
//! - Decoding of the signer's response envelope (`envelope`)
//! - Recovery-id search that binds a signature to a derived address (`reconstruct`)

pub mod envelope;
pub mod error;
pub mod kdf;
pub mod reconstruct;
pub mod request;
