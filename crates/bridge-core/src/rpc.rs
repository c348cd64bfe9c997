//! JSON-RPC clients for the source (NEAR) and target (EVM) chains.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use mpc_signer::request::PUBLIC_KEY_METHOD;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::client::{RootKeySource, TargetChainRpc};
use crate::error::BridgeError;

#[derive(Serialize)]
struct RpcRequest<'a, P: Serialize> {
    jsonrpc: &'static str,
    id: &'static str,
    method: &'a str,
    params: P,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

impl RpcErrorObject {
    fn describe(&self) -> String {
        match &self.data {
            Some(data) => format!("{} (code {}): {data}", self.message, self.code),
            None => format!("{} (code {})", self.message, self.code),
        }
    }
}

impl<T> RpcResponse<T> {
    /// Error objects map through `on_error`; a response with neither field is
    /// a protocol violation.
    fn into_result(self, on_error: fn(String) -> BridgeError) -> Result<T, BridgeError> {
        if let Some(error) = self.error {
            return Err(on_error(error.describe()));
        }
        self.result
            .ok_or_else(|| BridgeError::Network("response carried neither result nor error".into()))
    }
}

/// Parses a `0x`-prefixed hex quantity.
pub fn parse_hex_u64(quantity: &str) -> Result<u64, BridgeError> {
    let digits = quantity
        .strip_prefix("0x")
        .ok_or_else(|| BridgeError::Network(format!("quantity {quantity:?} lacks 0x prefix")))?;
    if digits.is_empty() {
        return Err(BridgeError::Network("empty hex quantity".into()));
    }
    u64::from_str_radix(digits, 16)
        .map_err(|e| BridgeError::Network(format!("invalid hex quantity {quantity:?}: {e}")))
}

async fn post<P: Serialize, T: DeserializeOwned>(
    http: &reqwest::Client,
    url: &str,
    method: &str,
    params: P,
) -> Result<RpcResponse<T>, BridgeError> {
    let response = http
        .post(url)
        .json(&RpcRequest {
            jsonrpc: "2.0",
            id: "bridge",
            method,
            params,
        })
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(BridgeError::Network(format!(
            "{method}: HTTP {}",
            response.status()
        )));
    }

    Ok(response.json().await?)
}

/// Read-only NEAR RPC access, used to fetch the signer's root key.
#[derive(Debug, Clone)]
pub struct NearRpcClient {
    http: reqwest::Client,
    rpc_url: String,
    contract_id: String,
}

#[derive(Debug, Deserialize)]
struct CallFunctionResult {
    #[serde(default)]
    result: Vec<u8>,
    #[serde(default)]
    error: Option<String>,
}

impl NearRpcClient {
    pub fn new(rpc_url: impl Into<String>, contract_id: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            rpc_url: rpc_url.into(),
            contract_id: contract_id.into(),
        }
    }

    /// Calls a view method with JSON `args` and returns the raw result bytes.
    pub async fn view_function(&self, method_name: &str, args: &Value) -> Result<Vec<u8>, BridgeError> {
        let args = serde_json::to_vec(args)
            .map_err(|e| BridgeError::Derivation(format!("view args: {e}")))?;
        let params = json!({
            "request_type": "call_function",
            "finality": "final",
            "account_id": self.contract_id,
            "method_name": method_name,
            "args_base64": BASE64.encode(args),
        });

        debug!(contract = %self.contract_id, method_name, "NEAR view call");
        let response: RpcResponse<CallFunctionResult> =
            post(&self.http, &self.rpc_url, "query", params).await?;
        let outcome = response.into_result(BridgeError::Network)?;

        if let Some(error) = outcome.error {
            return Err(BridgeError::Derivation(format!("{method_name}: {error}")));
        }
        Ok(outcome.result)
    }
}

/// Decodes a view result that holds a JSON string.
pub fn decode_view_string(bytes: &[u8]) -> Result<String, BridgeError> {
    serde_json::from_slice::<String>(bytes)
        .map_err(|e| BridgeError::Derivation(format!("view result is not a JSON string: {e}")))
}

#[async_trait]
impl RootKeySource for NearRpcClient {
    async fn root_public_key(&self) -> Result<String, BridgeError> {
        let bytes = self.view_function(PUBLIC_KEY_METHOD, &json!({})).await?;
        decode_view_string(&bytes)
    }
}

/// Block tag for nonce reads. `pending` counts this sender's transactions
/// still in the mempool, so a run started right after another one does not
/// reuse its nonce; `latest` would return the mined count only.
pub const NONCE_BLOCK_TAG: &str = "pending";

/// EVM node access over JSON-RPC.
#[derive(Debug, Clone)]
pub struct EvmRpcClient {
    http: reqwest::Client,
    rpc_url: String,
}

impl EvmRpcClient {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            rpc_url: rpc_url.into(),
        }
    }
}

fn nonce_params(address: &str) -> Value {
    json!([address, NONCE_BLOCK_TAG])
}

#[async_trait]
impl TargetChainRpc for EvmRpcClient {
    async fn chain_id(&self) -> Result<u64, BridgeError> {
        let response: RpcResponse<String> =
            post(&self.http, &self.rpc_url, "eth_chainId", json!([])).await?;
        parse_hex_u64(&response.into_result(BridgeError::Network)?)
    }

    /// Reads at [`NONCE_BLOCK_TAG`].
    async fn transaction_count(&self, address: &str) -> Result<u64, BridgeError> {
        let response: RpcResponse<String> = post(
            &self.http,
            &self.rpc_url,
            "eth_getTransactionCount",
            nonce_params(address),
        )
        .await?;
        parse_hex_u64(&response.into_result(BridgeError::Network)?)
    }

    async fn send_raw_transaction(&self, raw_tx_hex: &str) -> Result<String, BridgeError> {
        let response: RpcResponse<String> = post(
            &self.http,
            &self.rpc_url,
            "eth_sendRawTransaction",
            json!([raw_tx_hex]),
        )
        .await?;
        response.into_result(BridgeError::Relay)
    }
}
