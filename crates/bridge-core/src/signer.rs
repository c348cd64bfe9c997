use mpc_signer::envelope::SignatureEnvelope;
use mpc_signer::request::{SignRequest, SIGN_METHOD};
use tracing::{info, instrument};

use crate::client::{CallOutcome, ContractCaller, FunctionCall};
use crate::error::BridgeError;
use crate::types::DerivationRequest;

/// Sends sign requests to the MPC contract through a [`ContractCaller`].
pub struct RemoteSigner<C> {
    caller: C,
    contract_id: String,
    key_version: u32,
    gas: u64,
    deposit: u128,
}

impl<C: ContractCaller> RemoteSigner<C> {
    pub fn new(caller: C, contract_id: impl Into<String>, key_version: u32, gas: u64, deposit: u128) -> Self {
        Self {
            caller,
            contract_id: contract_id.into(),
            key_version,
            gas,
            deposit,
        }
    }

    /// Requests a signature over `payload` from the child key selected by
    /// `request.path()`. The signing identity is the caller's account.
    #[instrument(skip(self, payload), fields(contract = %self.contract_id, path = request.path()))]
    pub async fn request_signature(
        &self,
        payload: &[u8; 32],
        request: &DerivationRequest,
    ) -> Result<SignatureEnvelope, BridgeError> {
        let args = SignRequest::new(*payload, request.path(), self.key_version).to_args_json()?;
        let call = FunctionCall {
            contract_id: self.contract_id.clone(),
            method_name: SIGN_METHOD.to_string(),
            args,
            gas: self.gas,
            deposit: self.deposit,
        };

        info!(payload = %hex::encode(payload), "requesting MPC signature");
        let outcome = self
            .caller
            .function_call(call)
            .await
            .map_err(|e| BridgeError::Signing(format!("sign call failed: {e}")))?;

        match outcome {
            CallOutcome::SuccessValue(value) => Ok(SignatureEnvelope::from_success_value(&value)?),
            CallOutcome::Failure(reason) => Err(BridgeError::Signing(reason)),
        }
    }
}
