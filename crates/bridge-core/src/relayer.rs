use chain_eth::signature::ChainSignature;
use chain_eth::transaction::{attach_signature, Eip1559Transaction, SignedEip1559Transaction};
use tracing::{info, instrument, warn};

use crate::client::TargetChainRpc;
use crate::error::BridgeError;

/// Target-chain side of a run: chain and nonce lookups, final serialization
/// and broadcast.
pub struct Relayer<R> {
    rpc: R,
}

impl<R: TargetChainRpc> Relayer<R> {
    pub fn new(rpc: R) -> Self {
        Self { rpc }
    }

    pub async fn network_chain_id(&self) -> Result<u64, BridgeError> {
        self.rpc.chain_id().await
    }

    pub async fn next_nonce(&self, address: &str) -> Result<u64, BridgeError> {
        self.rpc.transaction_count(address).await
    }

    /// Attaches `signature` and returns the broadcastable transaction.
    pub fn serialize(
        &self,
        tx: &Eip1559Transaction,
        signature: ChainSignature,
    ) -> Result<SignedEip1559Transaction, BridgeError> {
        Ok(attach_signature(tx, signature)?)
    }

    /// Broadcasts a signed transaction and returns the hash the node reports.
    #[instrument(skip(self, signed), fields(nonce = signed.tx.nonce, tx_hash = %signed.tx_hash))]
    pub async fn broadcast(&self, signed: &SignedEip1559Transaction) -> Result<String, BridgeError> {
        let raw = format!("0x{}", hex::encode(&signed.raw_tx));
        let reported = self.rpc.send_raw_transaction(&raw).await?;

        if !reported.eq_ignore_ascii_case(&signed.tx_hash) {
            warn!(%reported, "node reported a different transaction hash");
        }
        info!(%reported, "transaction accepted by target chain");
        Ok(reported)
    }

    /// [`Self::serialize`] then [`Self::broadcast`].
    pub async fn relay(
        &self,
        tx: &Eip1559Transaction,
        signature: ChainSignature,
    ) -> Result<(SignedEip1559Transaction, String), BridgeError> {
        let signed = self.serialize(tx, signature)?;
        let hash = self.broadcast(&signed).await?;
        Ok((signed, hash))
    }
}
