//! NEAR chain-signatures bridge to EVM chains.
//!
//! An account on the source chain controls an EVM address derived from the
//! MPC network's root key. [`Orchestrator`] derives that address, builds an
//! EIP-1559 transaction for it, has the MPC contract sign the payload,
//! verifies the signature locally and relays it.

pub mod builder;
pub mod client;
pub mod config;
pub mod deriver;
pub mod error;
pub mod orchestrator;
pub mod relayer;
pub mod rpc;
pub mod signer;
pub mod types;

pub use client::{CallOutcome, ContractCaller, FunctionCall, RootKeySource, TargetChainRpc};
pub use config::BridgeConfig;
pub use error::BridgeError;
pub use orchestrator::Orchestrator;
pub use types::{CallRequest, DerivationRequest, DerivedIdentity, RelayReceipt, SignedCall};
