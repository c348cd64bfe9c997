use alloy_primitives::Address;
use sha3::{Digest, Keccak256};

use crate::error::EthError;

/// Derives the Ethereum address of an uncompressed secp256k1 public key
/// (65 bytes, starting with 0x04).
///
/// The derivation takes the Keccak-256 hash of the 64-byte public key (without
/// the 0x04 prefix) and uses the last 20 bytes as the address.
pub fn pubkey_to_address(uncompressed_pubkey: &[u8; 65]) -> Result<Address, EthError> {
    if uncompressed_pubkey[0] != 0x04 {
        return Err(EthError::InvalidPublicKey(
            "uncompressed key must start with 0x04".into(),
        ));
    }

    let hash = Keccak256::digest(&uncompressed_pubkey[1..]);
    Ok(Address::from_slice(&hash[12..]))
}

/// Formats an address as `0x` followed by 40 lowercase hex characters.
///
/// This is the canonical form used when comparing a derived address against a
/// recovered one.
pub fn to_lower_hex(address: &Address) -> String {
    format!("0x{}", hex::encode(address.as_slice()))
}

/// Parses an address string into its 20 raw bytes.
///
/// Accepts all-lowercase and all-uppercase input as-is. Mixed-case input is
/// treated as EIP-55 checksummed and rejected when the checksum is wrong.
pub fn parse_address(address: &str) -> Result<Address, EthError> {
    if !validate_address(address)? {
        return Err(EthError::InvalidAddress(format!(
            "EIP-55 checksum mismatch for {address}"
        )));
    }

    let bytes = hex::decode(&address[2..])
        .map_err(|e| EthError::InvalidAddress(format!("invalid hex: {e}")))?;
    Ok(Address::from_slice(&bytes))
}

/// Validates an Ethereum address string.
///
/// Checks that the address has the correct format (0x + 40 hex characters).
/// If the address contains mixed case, the EIP-55 checksum is verified.
pub fn validate_address(address: &str) -> Result<bool, EthError> {
    let hex_part = strip_and_check(address)?;

    let is_all_lower = hex_part.chars().all(|c| !c.is_ascii_uppercase());
    let is_all_upper = hex_part.chars().all(|c| !c.is_ascii_lowercase());

    if is_all_lower || is_all_upper {
        return Ok(true);
    }

    let checksummed = checksum_address(&format!("0x{}", hex_part.to_lowercase()))?;
    Ok(checksummed == address)
}

/// Applies EIP-55 mixed-case checksum encoding to an Ethereum address.
pub fn checksum_address(address: &str) -> Result<String, EthError> {
    let hex_part = strip_and_check(address)?.to_lowercase();

    let hash = Keccak256::digest(hex_part.as_bytes());
    let hash_hex = hex::encode(hash);

    let mut checksummed = String::with_capacity(42);
    checksummed.push_str("0x");

    for (c, h) in hex_part.chars().zip(hash_hex.chars()) {
        // Letters whose hash nibble is >= 8 are uppercased.
        if c.is_ascii_alphabetic() && h.to_digit(16).unwrap_or(0) >= 8 {
            checksummed.push(c.to_ascii_uppercase());
        } else {
            checksummed.push(c);
        }
    }

    Ok(checksummed)
}

fn strip_and_check(address: &str) -> Result<&str, EthError> {
    let hex_part = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .ok_or_else(|| EthError::InvalidAddress("address must start with 0x".into()))?;

    if hex_part.len() != 40 {
        return Err(EthError::InvalidAddress(format!(
            "expected 40 hex characters, got {}",
            hex_part.len()
        )));
    }

    if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(EthError::InvalidAddress(
            "address contains non-hex characters".into(),
        ));
    }

    Ok(hex_part)
}
