//! Child key derivation for the chain-signatures MPC network.
//!
//! Every `(identity, path)` pair selects an additive tweak `epsilon` of the
//! network's root key: `child = root + epsilon * G`. The root key is the only
//! remote input; the rest is computed locally and is fully deterministic.

use alloy_primitives::Address;
use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{ProjectivePoint, PublicKey, Scalar, SecretKey, U256};
use sha3::{Digest, Sha3_256};

use crate::error::MpcError;

/// Domain separator hashed in front of every derivation input.
pub const EPSILON_DERIVATION_PREFIX: &str = "near-mpc-recovery v0.1.0 epsilon derivation:";

const SECP256K1_KEY_PREFIX: &str = "secp256k1:";

/// Parses a root key in the signer contract's `secp256k1:<base58>` form.
///
/// The base58 body is either the 64-byte `x || y` point or a SEC1 encoding.
pub fn parse_root_public_key(encoded: &str) -> Result<PublicKey, MpcError> {
    let body = encoded
        .trim()
        .trim_matches('"')
        .strip_prefix(SECP256K1_KEY_PREFIX)
        .ok_or_else(|| {
            MpcError::InvalidRootKey(format!("expected {SECP256K1_KEY_PREFIX} prefix"))
        })?;

    let bytes = bs58::decode(body)
        .into_vec()
        .map_err(|e| MpcError::InvalidRootKey(format!("invalid base58: {e}")))?;

    let sec1 = match bytes.len() {
        64 => {
            let mut full = Vec::with_capacity(65);
            full.push(0x04);
            full.extend_from_slice(&bytes);
            full
        }
        33 | 65 => bytes,
        n => {
            return Err(MpcError::InvalidRootKey(format!(
                "unexpected key length {n}"
            )))
        }
    };

    PublicKey::from_sec1_bytes(&sec1)
        .map_err(|_| MpcError::InvalidRootKey("point is not on the secp256k1 curve".into()))
}

/// Formats a public key the way the signer contract reports it.
pub fn format_root_public_key(key: &PublicKey) -> String {
    let encoded = key.to_encoded_point(false);
    format!(
        "{SECP256K1_KEY_PREFIX}{}",
        bs58::encode(&encoded.as_bytes()[1..]).into_string()
    )
}

/// Computes the additive tweak for `(identity, path)`.
pub fn derive_epsilon(identity: &str, path: &str) -> Scalar {
    let input = format!("{EPSILON_DERIVATION_PREFIX}{identity},{path}");
    let hash = Sha3_256::digest(input.as_bytes());
    <Scalar as Reduce<U256>>::reduce_bytes(&hash)
}

/// Derives the child public key `root + epsilon * G`.
pub fn derive_child_public_key(
    root: &PublicKey,
    identity: &str,
    path: &str,
) -> Result<PublicKey, MpcError> {
    let epsilon = derive_epsilon(identity, path);
    let child = ProjectivePoint::GENERATOR * epsilon + root.to_projective();

    PublicKey::from_affine(child.to_affine())
        .map_err(|_| MpcError::DerivationFailed("derived key is the point at infinity".into()))
}

/// The signer-side counterpart of [`derive_child_public_key`]: `root + epsilon`.
pub fn derive_child_secret_key(
    root: &SecretKey,
    identity: &str,
    path: &str,
) -> Result<SecretKey, MpcError> {
    let child = *root.to_nonzero_scalar() + derive_epsilon(identity, path);
    SecretKey::from_bytes(&child.to_bytes())
        .map_err(|_| MpcError::DerivationFailed("derived secret is zero".into()))
}

/// Derives the child key for `(identity, path)` and its EVM address.
///
/// Returns the 65-byte uncompressed public key alongside the address.
pub fn derive_evm_identity(
    root: &PublicKey,
    identity: &str,
    path: &str,
) -> Result<([u8; 65], Address), MpcError> {
    let child = derive_child_public_key(root, identity, path)?;

    let mut uncompressed = [0u8; 65];
    uncompressed.copy_from_slice(child.to_encoded_point(false).as_bytes());

    let address = chain_eth::address::pubkey_to_address(&uncompressed)?;
    Ok((uncompressed, address))
}
