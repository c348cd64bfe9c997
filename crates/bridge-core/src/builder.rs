use chain_eth::transaction::{build_call, signing_hash, Eip1559Transaction};
use tracing::debug;

use crate::error::BridgeError;
use crate::types::CallRequest;

/// Builds EIP-1559 transactions for one target chain.
#[derive(Debug, Clone, Copy)]
pub struct TransactionBuilder {
    chain_id: u64,
}

impl TransactionBuilder {
    pub fn new(chain_id: u64) -> Self {
        Self { chain_id }
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Returns the unsigned transaction and its signing payload.
    ///
    /// `network_chain_id` is what the node reports; a mismatch with the
    /// configured chain is rejected before anything is signed.
    pub fn build(
        &self,
        call: &CallRequest,
        network_chain_id: u64,
        nonce: u64,
    ) -> Result<(Eip1559Transaction, [u8; 32]), BridgeError> {
        if network_chain_id != self.chain_id {
            return Err(BridgeError::Validation(format!(
                "RPC reports chain {network_chain_id}, configured chain is {}",
                self.chain_id
            )));
        }

        let tx = build_call(
            self.chain_id,
            nonce,
            &call.to,
            call.value,
            call.data.clone(),
            call.fees,
            call.access_list.clone(),
        )?;
        let payload = signing_hash(&tx);

        debug!(nonce, payload = %hex::encode(payload), "built unsigned transaction");
        Ok((tx, payload))
    }
}
