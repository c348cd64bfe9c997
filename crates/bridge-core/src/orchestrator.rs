//! Linear signing pipeline: derive, build, sign, reconstruct, relay.
//!
//! Each stage fails fast and nothing is retried. A run holds no state beyond
//! its own locals, so independent runs can proceed concurrently as long as
//! no two of them share a sender address.

use chain_eth::chains::{explorer_tx_url, get_chain};
use mpc_signer::reconstruct::reconstruct;
use tracing::{info, instrument};

use crate::builder::TransactionBuilder;
use crate::client::{ContractCaller, RootKeySource, TargetChainRpc};
use crate::config::BridgeConfig;
use crate::deriver::AddressDeriver;
use crate::error::BridgeError;
use crate::relayer::Relayer;
use crate::rpc::{EvmRpcClient, NearRpcClient};
use crate::signer::RemoteSigner;
use crate::types::{CallRequest, DerivationRequest, DerivedIdentity, RelayReceipt, SignedCall};

pub struct Orchestrator<K, C, R> {
    request: DerivationRequest,
    deriver: AddressDeriver<K>,
    builder: TransactionBuilder,
    signer: RemoteSigner<C>,
    relayer: Relayer<R>,
}

impl<C: ContractCaller> Orchestrator<NearRpcClient, C, EvmRpcClient> {
    /// Wires HTTP clients for both chains from `config`. `caller` submits the
    /// sign transaction on the source chain.
    pub fn from_config(config: &BridgeConfig, caller: C) -> Result<Self, BridgeError> {
        let keys = NearRpcClient::new(&config.source.rpc_url, &config.signer.contract_id);
        let rpc = EvmRpcClient::new(&config.target.rpc_url);
        Self::new(config, keys, caller, rpc)
    }
}

impl<K, C, R> Orchestrator<K, C, R>
where
    K: RootKeySource,
    C: ContractCaller,
    R: TargetChainRpc,
{
    pub fn new(config: &BridgeConfig, keys: K, caller: C, rpc: R) -> Result<Self, BridgeError> {
        config.validate()?;

        Ok(Self {
            request: config.derivation_request()?,
            deriver: AddressDeriver::new(keys),
            builder: TransactionBuilder::new(config.target.chain_id),
            signer: RemoteSigner::new(
                caller,
                &config.signer.contract_id,
                config.signer.key_version,
                config.signer.gas,
                config.deposit_yocto()?,
            ),
            relayer: Relayer::new(rpc),
        })
    }

    /// Derives the target-chain identity without touching the target chain.
    pub async fn derive(&self) -> Result<DerivedIdentity, BridgeError> {
        self.deriver.derive(&self.request).await
    }

    /// Runs every stage except broadcast and returns the signed transaction.
    #[instrument(skip(self, call), fields(chain_id = self.builder.chain_id(), to = %call.to))]
    pub async fn sign(&self, call: &CallRequest) -> Result<SignedCall, BridgeError> {
        let identity = self.derive().await?;
        let from = identity.address_hex();
        info!(address = %identity.checksummed_address(), "derived sender");

        let network_chain_id = self.relayer.network_chain_id().await?;
        let nonce = self.relayer.next_nonce(&from).await?;
        let (tx, payload) = self.builder.build(call, network_chain_id, nonce)?;
        info!(nonce, "built transaction");

        let envelope = self.signer.request_signature(&payload, &self.request).await?;
        let signature = reconstruct(&envelope, &payload, &identity.address, tx.chain_id)?;
        info!(v = signature.v, "signature verified against derived address");

        let signed = self.relayer.serialize(&tx, signature)?;
        Ok(SignedCall { identity, signed })
    }

    /// Signs `call` and broadcasts it to the target chain.
    #[instrument(skip(self, call), fields(chain_id = self.builder.chain_id()))]
    pub async fn run(&self, call: &CallRequest) -> Result<RelayReceipt, BridgeError> {
        let SignedCall { identity, signed } = self.sign(call).await?;
        let transaction_hash = self.relayer.broadcast(&signed).await?;

        let explorer_url =
            get_chain(self.builder.chain_id()).map(|chain| explorer_tx_url(chain, &transaction_hash));
        info!(tx_hash = %transaction_hash, explorer = ?explorer_url, "relayed");

        Ok(RelayReceipt {
            transaction_hash,
            from: identity.address_hex(),
            nonce: signed.tx.nonce,
            signature: signed.signature,
            explorer_url,
        })
    }
}
