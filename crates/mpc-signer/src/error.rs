use thiserror::Error;

/// Chain-signatures protocol errors.
#[derive(Debug, Error)]
pub enum MpcError {
    #[error("invalid root public key: {0}")]
    InvalidRootKey(String),

    #[error("key derivation failed: {0}")]
    DerivationFailed(String),

    #[error("invalid signature envelope: {0}")]
    InvalidEnvelope(String),

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("chain id {0} cannot be encoded in an EIP-155 v")]
    InvalidChainId(u64),

    #[error("no recovery candidate matches {expected}")]
    RecoveryFailed { expected: String },
}

impl From<chain_eth::error::EthError> for MpcError {
    fn from(e: chain_eth::error::EthError) -> Self {
        MpcError::DerivationFailed(format!("ETH: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_envelope() {
        let err = MpcError::InvalidEnvelope("missing big_r".into());
        assert_eq!(err.to_string(), "invalid signature envelope: missing big_r");
    }

    #[test]
    fn display_recovery_failed() {
        let err = MpcError::RecoveryFailed {
            expected: "0xabc".into(),
        };
        assert_eq!(err.to_string(), "no recovery candidate matches 0xabc");
    }

    #[test]
    fn eth_errors_convert() {
        let err: MpcError =
            chain_eth::error::EthError::InvalidPublicKey("bad prefix".into()).into();
        assert!(err.to_string().contains("bad prefix"));
    }
}
