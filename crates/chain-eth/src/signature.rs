//! EIP-155 signature model and ECDSA public-key recovery.

use alloy_primitives::{Address, B256};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};

use crate::address::pubkey_to_address;
use crate::error::EthError;

/// An `(r, s, v)` signature where `v` carries the EIP-155 replay protection
/// for one chain: `v = parity + 2 * chain_id + 35`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainSignature {
    pub r: B256,
    pub s: B256,
    pub v: u64,
}

impl ChainSignature {
    /// Recovers the y-parity bit encoded in `v` for the given chain.
    ///
    /// Fails when `v` is not one of the two values valid for `chain_id`.
    pub fn y_parity(&self, chain_id: u64) -> Result<u8, EthError> {
        let base = eip155_v(0, chain_id)?;
        match self.v.checked_sub(base) {
            Some(p @ (0 | 1)) => Ok(p as u8),
            _ => Err(EthError::InvalidSignature(format!(
                "v={} does not encode chain id {chain_id}",
                self.v
            ))),
        }
    }
}

/// Largest chain id whose EIP-155 `v` values both fit in a `u64`.
pub const MAX_CHAIN_ID: u64 = (u64::MAX - 36) / 2;

/// Computes the EIP-155 `v` value for a parity bit on `chain_id`.
pub fn eip155_v(parity: u8, chain_id: u64) -> Result<u64, EthError> {
    chain_id
        .checked_mul(2)
        .and_then(|v| v.checked_add(35 + u64::from(parity)))
        .ok_or_else(|| {
            EthError::InvalidSignature(format!("chain id {chain_id} is too large for EIP-155"))
        })
}

/// Recovers the signer's address from a 32-byte prehash and `(r, s, parity)`.
///
/// Zero or out-of-range scalars and `r` values that do not lie on the curve
/// are reported as errors rather than as a mismatching address.
pub fn recover_address(
    prehash: &[u8; 32],
    r: &B256,
    s: &B256,
    parity: u8,
) -> Result<Address, EthError> {
    if parity > 1 {
        return Err(EthError::InvalidSignature(format!(
            "parity must be 0 or 1, got {parity}"
        )));
    }

    let mut rs = [0u8; 64];
    rs[..32].copy_from_slice(r.as_slice());
    rs[32..].copy_from_slice(s.as_slice());

    let signature = Signature::from_slice(&rs)
        .map_err(|e| EthError::InvalidSignature(e.to_string()))?;
    let recovery_id = RecoveryId::new(parity == 1, false);

    let key = VerifyingKey::recover_from_prehash(prehash, &signature, recovery_id)
        .map_err(|e| EthError::RecoveryFailed(e.to_string()))?;

    let encoded = key.to_encoded_point(false);
    let mut key_65 = [0u8; 65];
    key_65.copy_from_slice(encoded.as_bytes());
    pubkey_to_address(&key_65)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::to_lower_hex;
    use k256::ecdsa::SigningKey;

    const KEY_ONE_ADDRESS: &str = "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf";

    fn key_one() -> SigningKey {
        let mut privkey = [0u8; 32];
        privkey[31] = 1;
        SigningKey::from_bytes((&privkey).into()).unwrap()
    }

    fn sign(hash: &[u8; 32]) -> (B256, B256, u8) {
        let (sig, recid) = key_one().sign_prehash_recoverable(hash).unwrap();
        (
            B256::from_slice(&sig.r().to_bytes()),
            B256::from_slice(&sig.s().to_bytes()),
            recid.is_y_odd() as u8,
        )
    }

    #[test]
    fn eip155_v_for_base_sepolia() {
        assert_eq!(eip155_v(0, 84532).unwrap(), 84532 * 2 + 35);
        assert_eq!(eip155_v(1, 84532).unwrap(), 84532 * 2 + 36);
        assert_eq!(eip155_v(0, 1).unwrap(), 37);
    }

    #[test]
    fn eip155_v_rejects_oversized_chain_id() {
        assert_eq!(eip155_v(1, MAX_CHAIN_ID).unwrap(), u64::MAX - 1);
        assert!(matches!(
            eip155_v(1, MAX_CHAIN_ID + 1),
            Err(EthError::InvalidSignature(_))
        ));
        assert!(eip155_v(0, u64::MAX / 2 + 1).is_err());
    }

    #[test]
    fn y_parity_with_oversized_chain_id_is_an_error() {
        let sig = ChainSignature {
            r: B256::ZERO,
            s: B256::ZERO,
            v: 37,
        };
        assert!(sig.y_parity(u64::MAX).is_err());
    }

    #[test]
    fn y_parity_inverts_eip155_v() {
        let sig = ChainSignature {
            r: B256::ZERO,
            s: B256::ZERO,
            v: eip155_v(1, 97).unwrap(),
        };
        assert_eq!(sig.y_parity(97).unwrap(), 1);
        assert!(sig.y_parity(1).is_err());
    }

    #[test]
    fn y_parity_rejects_v_below_base() {
        let sig = ChainSignature {
            r: B256::ZERO,
            s: B256::ZERO,
            v: 27,
        };
        assert!(sig.y_parity(1).is_err());
    }

    #[test]
    fn recover_address_with_correct_parity() {
        let hash = [7u8; 32];
        let (r, s, parity) = sign(&hash);

        let recovered = recover_address(&hash, &r, &s, parity).unwrap();
        assert_eq!(to_lower_hex(&recovered), KEY_ONE_ADDRESS);
    }

    #[test]
    fn wrong_parity_recovers_a_different_address() {
        let hash = [7u8; 32];
        let (r, s, parity) = sign(&hash);

        match recover_address(&hash, &r, &s, 1 - parity) {
            Ok(other) => assert_ne!(to_lower_hex(&other), KEY_ONE_ADDRESS),
            Err(e) => assert!(matches!(e, EthError::RecoveryFailed(_))),
        }
    }

    #[test]
    fn zero_scalars_are_rejected() {
        let hash = [7u8; 32];
        let result = recover_address(&hash, &B256::ZERO, &B256::ZERO, 0);
        assert!(matches!(result, Err(EthError::InvalidSignature(_))));
    }

    #[test]
    fn parity_out_of_range_is_rejected() {
        let hash = [7u8; 32];
        let (r, s, _) = sign(&hash);
        assert!(recover_address(&hash, &r, &s, 2).is_err());
    }
}
