//! Turns a signer envelope into an EIP-155 signature that provably belongs to
//! the derived address.

use alloy_primitives::Address;
use chain_eth::address::to_lower_hex;
use chain_eth::signature::{eip155_v, recover_address, ChainSignature, MAX_CHAIN_ID};
use tracing::{debug, warn};

use crate::envelope::SignatureEnvelope;
use crate::error::MpcError;

/// Rebuilds `(r, s, v)` from `envelope` for `payload` on `chain_id`.
///
/// Both parity candidates are tried in order and the first one whose
/// recovered signer equals `expected` wins. The envelope's `recovery_id` is
/// never trusted on its own. Fails with [`MpcError::RecoveryFailed`] when
/// neither candidate recovers to `expected`.
pub fn reconstruct(
    envelope: &SignatureEnvelope,
    payload: &[u8; 32],
    expected: &Address,
    chain_id: u64,
) -> Result<ChainSignature, MpcError> {
    if chain_id > MAX_CHAIN_ID {
        return Err(MpcError::InvalidChainId(chain_id));
    }
    let r = envelope.r()?;
    let s = envelope.s()?;

    for parity in 0u8..=1 {
        let v = eip155_v(parity, chain_id).map_err(|_| MpcError::InvalidChainId(chain_id))?;

        match recover_address(payload, &r, &s, parity) {
            Ok(recovered) if recovered == *expected => {
                if envelope.recovery_id != parity {
                    warn!(
                        advisory = envelope.recovery_id,
                        parity, "signer recovery id disagrees with local recovery"
                    );
                }
                debug!(v, "signature recovered to derived address");
                return Ok(ChainSignature { r, s, v });
            }
            Ok(recovered) => {
                debug!(v, recovered = %to_lower_hex(&recovered), "candidate rejected");
            }
            Err(e) => {
                debug!(v, error = %e, "candidate failed recovery");
            }
        }
    }

    Err(MpcError::RecoveryFailed {
        expected: to_lower_hex(expected),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::{BigR, Scalar};
    use crate::kdf::{derive_child_secret_key, derive_evm_identity};
    use k256::SecretKey;

    const CHAIN_ID: u64 = 84532;

    fn root() -> SecretKey {
        SecretKey::from_bytes((&[0x17u8; 32]).into()).unwrap()
    }

    fn expected_address() -> Address {
        derive_evm_identity(&root().public_key(), "alice.testnet", "key-1")
            .unwrap()
            .1
    }

    /// Signs like the MPC network would and packs the result into an envelope.
    fn mpc_sign(payload: &[u8; 32]) -> SignatureEnvelope {
        let child = derive_child_secret_key(&root(), "alice.testnet", "key-1").unwrap();
        let signing_key = k256::ecdsa::SigningKey::from(child);
        let (sig, recid) = signing_key.sign_prehash_recoverable(payload).unwrap();

        let prefix = if recid.is_y_odd() { "03" } else { "02" };
        SignatureEnvelope {
            big_r: BigR {
                affine_point: format!("{prefix}{}", hex::encode_upper(sig.r().to_bytes())),
            },
            s: Scalar {
                scalar: hex::encode_upper(sig.s().to_bytes()),
            },
            recovery_id: recid.is_y_odd() as u8,
        }
    }

    #[test]
    fn recovers_v_for_derived_address() {
        let payload = [0x5au8; 32];
        let envelope = mpc_sign(&payload);

        let sig = reconstruct(&envelope, &payload, &expected_address(), CHAIN_ID).unwrap();

        assert!(sig.v == CHAIN_ID * 2 + 35 || sig.v == CHAIN_ID * 2 + 36);
        assert_eq!(sig.v, eip155_v(envelope.recovery_id, CHAIN_ID).unwrap());
        assert_eq!(sig.r, envelope.r().unwrap());
        assert_eq!(sig.s, envelope.s().unwrap());
    }

    #[test]
    fn reconstruction_is_reproducible() {
        let payload = [0x01u8; 32];
        let envelope = mpc_sign(&payload);

        let first = reconstruct(&envelope, &payload, &expected_address(), CHAIN_ID).unwrap();
        let second = reconstruct(&envelope, &payload, &expected_address(), CHAIN_ID).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn exactly_one_candidate_matches() {
        let payload = [0x33u8; 32];
        let envelope = mpc_sign(&payload);
        let (r, s) = (envelope.r().unwrap(), envelope.s().unwrap());

        let matches = (0u8..=1)
            .filter(|&p| {
                recover_address(&payload, &r, &s, p)
                    .map(|a| a == expected_address())
                    .unwrap_or(false)
            })
            .count();
        assert_eq!(matches, 1);
    }

    #[test]
    fn wrong_advisory_recovery_id_is_ignored() {
        let payload = [0x44u8; 32];
        let mut envelope = mpc_sign(&payload);
        let honest = reconstruct(&envelope, &payload, &expected_address(), CHAIN_ID).unwrap();

        envelope.recovery_id = 1 - envelope.recovery_id;
        let sig = reconstruct(&envelope, &payload, &expected_address(), CHAIN_ID).unwrap();
        assert_eq!(sig, honest);
    }

    #[test]
    fn mismatched_address_fails_both_candidates() {
        let payload = [0x5au8; 32];
        let envelope = mpc_sign(&payload);
        let other = derive_evm_identity(&root().public_key(), "alice.testnet", "key-2")
            .unwrap()
            .1;

        let result = reconstruct(&envelope, &payload, &other, CHAIN_ID);
        assert!(matches!(result, Err(MpcError::RecoveryFailed { .. })));
    }

    #[test]
    fn corrupted_s_fails_recovery() {
        let payload = [0x5au8; 32];
        let mut envelope = mpc_sign(&payload);
        let mut s = envelope.s().unwrap();
        s[31] ^= 0x01;
        envelope.s.scalar = hex::encode(s);

        let result = reconstruct(&envelope, &payload, &expected_address(), CHAIN_ID);
        assert!(matches!(result, Err(MpcError::RecoveryFailed { .. })));
    }

    #[test]
    fn tampered_payload_fails_recovery() {
        let payload = [0x5au8; 32];
        let envelope = mpc_sign(&payload);
        let mut other_payload = payload;
        other_payload[0] ^= 0xff;

        let result = reconstruct(&envelope, &other_payload, &expected_address(), CHAIN_ID);
        assert!(matches!(result, Err(MpcError::RecoveryFailed { .. })));
    }

    #[test]
    fn oversized_chain_id_is_rejected_without_panicking() {
        let payload = [0x5au8; 32];
        let envelope = mpc_sign(&payload);

        let result = reconstruct(&envelope, &payload, &expected_address(), u64::MAX / 2 + 1);
        assert!(matches!(result, Err(MpcError::InvalidChainId(_))));
    }

    #[test]
    fn malformed_envelope_is_not_a_recovery_failure() {
        let payload = [0x5au8; 32];
        let mut envelope = mpc_sign(&payload);
        envelope.big_r.affine_point = "02".into();

        let result = reconstruct(&envelope, &payload, &expected_address(), CHAIN_ID);
        assert!(matches!(result, Err(MpcError::InvalidEnvelope(_))));
    }
}
