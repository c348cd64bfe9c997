use alloy_primitives::{Address, U256};
use chain_eth::address::{checksum_address, to_lower_hex};
use chain_eth::signature::ChainSignature;
use chain_eth::transaction::{AccessListItem, FeeParams, SignedEip1559Transaction};

use crate::error::BridgeError;

/// The `(identity, path)` pair that selects one MPC child key.
///
/// A run builds exactly one of these and hands the same value to both the
/// address derivation and the sign request, so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationRequest {
    identity: String,
    path: String,
}

impl DerivationRequest {
    pub fn new(identity: impl Into<String>, path: impl Into<String>) -> Result<Self, BridgeError> {
        let identity = identity.into();
        let path = path.into();

        if identity.trim().is_empty() {
            return Err(BridgeError::Validation("identity must be non-empty".into()));
        }
        if path.is_empty() {
            return Err(BridgeError::Validation("derivation path must be non-empty".into()));
        }

        Ok(Self { identity, path })
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// The child public key and target-chain address for a [`DerivationRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedIdentity {
    /// Uncompressed SEC1 public key (0x04 || x || y).
    pub public_key: [u8; 65],
    pub address: Address,
}

impl DerivedIdentity {
    /// `0x` + 40 lowercase hex characters.
    pub fn address_hex(&self) -> String {
        to_lower_hex(&self.address)
    }

    /// EIP-55 checksummed form, for display.
    pub fn checksummed_address(&self) -> String {
        checksum_address(&self.address_hex()).unwrap_or_else(|_| self.address_hex())
    }

    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key)
    }
}

/// What the caller wants executed on the target chain.
#[derive(Debug, Clone)]
pub struct CallRequest {
    /// Destination address, 0x-prefixed.
    pub to: String,
    /// Value in wei.
    pub value: U256,
    /// Calldata; empty for a plain transfer.
    pub data: Vec<u8>,
    pub fees: FeeParams,
    pub access_list: Vec<AccessListItem>,
}

impl CallRequest {
    pub fn new(to: impl Into<String>, value: U256, data: Vec<u8>, fees: FeeParams) -> Self {
        Self {
            to: to.into(),
            value,
            data,
            fees,
            access_list: Vec::new(),
        }
    }
}

/// A transaction signed by the MPC network for a derived identity, ready for
/// broadcast.
#[derive(Debug, Clone)]
pub struct SignedCall {
    pub identity: DerivedIdentity,
    pub signed: SignedEip1559Transaction,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayReceipt {
    /// Transaction hash as reported by the target network.
    pub transaction_hash: String,
    /// Sender address, lowercase hex.
    pub from: String,
    pub nonce: u64,
    /// `v` is the EIP-155 value for the target chain.
    pub signature: ChainSignature,
    pub explorer_url: Option<String>,
}
