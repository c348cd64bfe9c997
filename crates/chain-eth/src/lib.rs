//! Ethereum/EVM chain support for the signing bridge.
//!
//! This crate provides:
//! - Ethereum address derivation from secp256k1 public keys (with EIP-55 checksums)
//! - EIP-1559 transaction building and canonical RLP encoding/decoding
//! - EIP-155 signature model and ECDSA address recovery
//! - Minimal ABI calldata encoding
//! - Known EVM network definitions

pub mod abi;
pub mod address;
pub mod chains;
pub mod error;
pub mod signature;
pub mod transaction;
