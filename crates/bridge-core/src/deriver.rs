use mpc_signer::kdf::{derive_evm_identity, parse_root_public_key};
use tracing::{debug, instrument};

use crate::client::RootKeySource;
use crate::error::BridgeError;
use crate::types::{DerivationRequest, DerivedIdentity};

/// Maps a [`DerivationRequest`] to the EVM address the MPC network will sign
/// for. Pure given the root key; the root key is fetched on every call.
pub struct AddressDeriver<K> {
    keys: K,
}

impl<K: RootKeySource> AddressDeriver<K> {
    pub fn new(keys: K) -> Self {
        Self { keys }
    }

    #[instrument(skip(self), fields(identity = request.identity(), path = request.path()))]
    pub async fn derive(&self, request: &DerivationRequest) -> Result<DerivedIdentity, BridgeError> {
        let encoded = self
            .keys
            .root_public_key()
            .await
            .map_err(|e| BridgeError::Derivation(format!("root key unavailable: {e}")))?;

        let root = parse_root_public_key(&encoded)
            .map_err(|e| BridgeError::Derivation(e.to_string()))?;
        let (public_key, address) = derive_evm_identity(&root, request.identity(), request.path())
            .map_err(|e| BridgeError::Derivation(e.to_string()))?;

        let derived = DerivedIdentity { public_key, address };
        debug!(
            address = %derived.address_hex(),
            public_key = %derived.public_key_hex(),
            "derived child key"
        );
        Ok(derived)
    }
}
