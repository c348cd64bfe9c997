//! Seams to the outside world. The orchestrator only talks to these traits;
//! HTTP implementations live in [`crate::rpc`] and tests substitute mocks.

use async_trait::async_trait;

use crate::error::BridgeError;

/// Source of the MPC signer's root public key.
#[async_trait]
pub trait RootKeySource: Send + Sync {
    /// Root key in the signer's text encoding (`secp256k1:<base58>`).
    async fn root_public_key(&self) -> Result<String, BridgeError>;
}

/// A change-method call against a source-chain contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    pub contract_id: String,
    pub method_name: String,
    /// JSON-encoded arguments.
    pub args: Vec<u8>,
    pub gas: u64,
    /// Attached deposit in yoctoNEAR.
    pub deposit: u128,
}

/// Final execution status of a [`FunctionCall`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    /// Base64-encoded return value.
    SuccessValue(String),
    Failure(String),
}

/// Submits signed source-chain transactions on behalf of the configured
/// account.
///
/// Key custody and transaction signing happen behind this trait.
#[async_trait]
pub trait ContractCaller: Send + Sync {
    async fn function_call(&self, call: FunctionCall) -> Result<CallOutcome, BridgeError>;
}

/// The subset of a target-chain node the bridge needs.
#[async_trait]
pub trait TargetChainRpc: Send + Sync {
    async fn chain_id(&self) -> Result<u64, BridgeError>;

    /// Next nonce for `address`. Counts the sender's pending transactions,
    /// not only mined ones.
    async fn transaction_count(&self, address: &str) -> Result<u64, BridgeError>;

    /// Broadcasts `0x`-prefixed raw bytes and returns the transaction hash.
    async fn send_raw_transaction(&self, raw_tx_hex: &str) -> Result<String, BridgeError>;
}
