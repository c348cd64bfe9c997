use thiserror::Error;

/// EVM chain operation errors.
#[derive(Debug, Error)]
pub enum EthError {
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("transaction build error: {0}")]
    TransactionBuildError(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("recovery failed: {0}")]
    RecoveryFailed(String),

    #[error("decoding error: {0}")]
    DecodingError(String),
}

impl From<alloy_rlp::Error> for EthError {
    fn from(e: alloy_rlp::Error) -> Self {
        EthError::DecodingError(e.to_string())
    }
}
