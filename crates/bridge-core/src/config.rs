//! Startup configuration for a bridge instance.
//!
//! Loaded once (usually from TOML) and passed to the orchestrator at
//! construction. Nothing here is mutated afterwards.

use std::path::{Path, PathBuf};

use chain_eth::signature::MAX_CHAIN_ID;
use mpc_signer::request::{parse_near_amount, DEFAULT_SIGN_DEPOSIT, DEFAULT_SIGN_GAS};
use serde::{Deserialize, Serialize};

use crate::error::BridgeError;
use crate::types::DerivationRequest;

/// Source chain (NEAR) connection and the account that requests signatures.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceChainConfig {
    /// e.g. `testnet` or `mainnet`
    pub network_id: String,
    pub rpc_url: String,
    /// Account that calls the signer; also the derivation identity.
    pub account_id: String,
    /// Key store directory used by the external transaction submitter.
    pub credentials_dir: PathBuf,
}

/// MPC signer contract parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerConfig {
    pub contract_id: String,
    #[serde(default)]
    pub key_version: u32,
    #[serde(default = "default_gas")]
    pub gas: u64,
    /// Attached deposit in NEAR display units.
    #[serde(default = "default_deposit")]
    pub deposit: String,
}

/// Target EVM chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetChainConfig {
    pub chain_id: u64,
    pub rpc_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    pub source: SourceChainConfig,
    pub signer: SignerConfig,
    pub target: TargetChainConfig,
    /// Path used for both address derivation and signing.
    pub derivation_path: String,
}

fn default_gas() -> u64 {
    DEFAULT_SIGN_GAS
}

fn default_deposit() -> String {
    DEFAULT_SIGN_DEPOSIT.to_string()
}

impl BridgeConfig {
    /// NEAR testnet, the production testnet signer and Base Sepolia.
    pub fn testnet(account_id: impl Into<String>) -> Self {
        let home = std::env::var_os("HOME").map(PathBuf::from).unwrap_or_default();
        let base_sepolia = &chain_eth::chains::BASE_SEPOLIA;

        Self {
            source: SourceChainConfig {
                network_id: "testnet".into(),
                rpc_url: "https://rpc.testnet.near.org".into(),
                account_id: account_id.into(),
                credentials_dir: home.join(".near-credentials"),
            },
            signer: SignerConfig {
                contract_id: "v1.signer-prod.testnet".into(),
                key_version: 0,
                gas: DEFAULT_SIGN_GAS,
                deposit: DEFAULT_SIGN_DEPOSIT.into(),
            },
            target: TargetChainConfig {
                chain_id: base_sepolia.chain_id,
                rpc_url: base_sepolia.rpc_url.into(),
            },
            derivation_path: "my-first-eth-key".into(),
        }
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, BridgeError> {
        let config: Self =
            toml::from_str(s).map_err(|e| BridgeError::Config(format!("invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: &Path) -> Result<Self, BridgeError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| BridgeError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), BridgeError> {
        require_non_empty("source.network_id", &self.source.network_id)?;
        require_non_empty("source.account_id", &self.source.account_id)?;
        require_http_url("source.rpc_url", &self.source.rpc_url)?;
        require_non_empty("signer.contract_id", &self.signer.contract_id)?;
        require_http_url("target.rpc_url", &self.target.rpc_url)?;

        if self.derivation_path.is_empty() {
            return Err(BridgeError::Config("derivation_path must be non-empty".into()));
        }
        if self.target.chain_id == 0 || self.target.chain_id > MAX_CHAIN_ID {
            return Err(BridgeError::Config(format!(
                "target.chain_id must be in 1..={MAX_CHAIN_ID}, got {}",
                self.target.chain_id
            )));
        }
        if self.signer.gas == 0 {
            return Err(BridgeError::Config("signer.gas must be non-zero".into()));
        }
        self.deposit_yocto()?;
        Ok(())
    }

    /// The one derivation request every stage of a run shares.
    pub fn derivation_request(&self) -> Result<DerivationRequest, BridgeError> {
        DerivationRequest::new(&self.source.account_id, &self.derivation_path)
    }

    /// Signer deposit in yoctoNEAR.
    pub fn deposit_yocto(&self) -> Result<u128, BridgeError> {
        parse_near_amount(&self.signer.deposit)
            .map_err(|e| BridgeError::Config(format!("signer.deposit: {e}")))
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), BridgeError> {
    if value.trim().is_empty() {
        return Err(BridgeError::Config(format!("{field} must be non-empty")));
    }
    Ok(())
}

fn require_http_url(field: &str, value: &str) -> Result<(), BridgeError> {
    if !(value.starts_with("https://") || value.starts_with("http://")) {
        return Err(BridgeError::Config(format!(
            "{field} must be an http(s) URL, got {value:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
derivation_path = "key-1"

[source]
network_id = "testnet"
rpc_url = "https://rpc.testnet.near.org"
account_id = "alice.testnet"
credentials_dir = "/home/alice/.near-credentials"

[signer]
contract_id = "v1.signer-prod.testnet"

[target]
chain_id = 84532
rpc_url = "https://sepolia.base.org"
"#;

    #[test]
    fn parses_toml_with_signer_defaults() {
        let config = BridgeConfig::from_toml_str(SAMPLE).unwrap();

        assert_eq!(config.source.account_id, "alice.testnet");
        assert_eq!(config.target.chain_id, 84532);
        assert_eq!(config.signer.key_version, 0);
        assert_eq!(config.signer.gas, DEFAULT_SIGN_GAS);
        assert_eq!(config.deposit_yocto().unwrap(), 5 * 10u128.pow(23));
    }

    #[test]
    fn derivation_request_uses_account_and_path() {
        let config = BridgeConfig::from_toml_str(SAMPLE).unwrap();
        let request = config.derivation_request().unwrap();

        assert_eq!(request.identity(), "alice.testnet");
        assert_eq!(request.path(), "key-1");
    }

    #[test]
    fn testnet_preset_is_valid() {
        let config = BridgeConfig::testnet("alice.testnet");
        config.validate().unwrap();
        assert_eq!(config.target.chain_id, 84532);
        assert_eq!(config.signer.contract_id, "v1.signer-prod.testnet");
        assert!(config.source.credentials_dir.ends_with(".near-credentials"));
    }

    #[test]
    fn rejects_invalid_values() {
        let mut config = BridgeConfig::testnet("alice.testnet");
        config.derivation_path.clear();
        assert!(matches!(config.validate(), Err(BridgeError::Config(_))));

        let mut config = BridgeConfig::testnet("alice.testnet");
        config.target.rpc_url = "sepolia.base.org".into();
        assert!(config.validate().is_err());

        let mut config = BridgeConfig::testnet("alice.testnet");
        config.signer.deposit = "half".into();
        assert!(config.validate().is_err());

        let mut config = BridgeConfig::testnet("alice.testnet");
        config.target.chain_id = 0;
        assert!(config.validate().is_err());

        let mut config = BridgeConfig::testnet("alice.testnet");
        config.target.chain_id = u64::MAX / 2 + 1;
        assert!(matches!(config.validate(), Err(BridgeError::Config(_))));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            BridgeConfig::from_toml_str("derivation_path = "),
            Err(BridgeError::Config(_))
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = BridgeConfig::load(Path::new("/nonexistent/bridge.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/bridge.toml"));
    }
}
