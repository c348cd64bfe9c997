use thiserror::Error;

use mpc_signer::error::MpcError;

/// Failure of one stage of a signing run. Every variant is terminal for the
/// run that produced it.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Derivation failed: {0}")]
    Derivation(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    /// No parity candidate recovers to the derived address. Never broadcast
    /// after this.
    #[error("Signature recovery failed: {0}")]
    Recovery(String),

    #[error("Relay rejected: {0}")]
    Relay(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<chain_eth::error::EthError> for BridgeError {
    fn from(e: chain_eth::error::EthError) -> Self {
        BridgeError::Validation(format!("ETH: {e}"))
    }
}

impl From<MpcError> for BridgeError {
    fn from(e: MpcError) -> Self {
        match e {
            MpcError::RecoveryFailed { .. } => BridgeError::Recovery(e.to_string()),
            MpcError::InvalidRootKey(_) | MpcError::DerivationFailed(_) => {
                BridgeError::Derivation(e.to_string())
            }
            MpcError::InvalidAmount(_) => BridgeError::Config(e.to_string()),
            MpcError::InvalidChainId(_) => BridgeError::Validation(e.to_string()),
            MpcError::InvalidEnvelope(_) | MpcError::EncodingError(_) => {
                BridgeError::Signing(e.to_string())
            }
        }
    }
}

impl From<reqwest::Error> for BridgeError {
    fn from(e: reqwest::Error) -> Self {
        BridgeError::Network(e.to_string())
    }
}
