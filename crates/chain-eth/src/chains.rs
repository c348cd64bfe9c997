use serde::Serialize;

/// Definition of an EVM-compatible network a bridge can relay to.
#[derive(Debug, Clone, Serialize)]
pub struct EvmChain {
    pub chain_id: u64,
    pub name: &'static str,
    pub symbol: &'static str,
    pub decimals: u8,
    pub rpc_url: &'static str,
    pub explorer_url: &'static str,
    pub is_testnet: bool,
}

/// Ethereum Mainnet (chain ID 1).
pub const ETHEREUM: EvmChain = EvmChain {
    chain_id: 1,
    name: "Ethereum",
    symbol: "ETH",
    decimals: 18,
    rpc_url: "https://eth.llamarpc.com",
    explorer_url: "https://etherscan.io",
    is_testnet: false,
};

/// Base (chain ID 8453).
pub const BASE: EvmChain = EvmChain {
    chain_id: 8453,
    name: "Base",
    symbol: "ETH",
    decimals: 18,
    rpc_url: "https://mainnet.base.org",
    explorer_url: "https://basescan.org",
    is_testnet: false,
};

/// Sepolia Testnet (chain ID 11155111).
pub const SEPOLIA: EvmChain = EvmChain {
    chain_id: 11155111,
    name: "Sepolia",
    symbol: "ETH",
    decimals: 18,
    rpc_url: "https://rpc.sepolia.org",
    explorer_url: "https://sepolia.etherscan.io",
    is_testnet: true,
};

/// Base Sepolia Testnet (chain ID 84532).
pub const BASE_SEPOLIA: EvmChain = EvmChain {
    chain_id: 84532,
    name: "Base Sepolia",
    symbol: "ETH",
    decimals: 18,
    rpc_url: "https://sepolia.base.org",
    explorer_url: "https://sepolia.basescan.org",
    is_testnet: true,
};

/// BNB Smart Chain Testnet (chain ID 97).
pub const BSC_TESTNET: EvmChain = EvmChain {
    chain_id: 97,
    name: "BNB Smart Chain Testnet",
    symbol: "tBNB",
    decimals: 18,
    rpc_url: "https://data-seed-prebsc-1-s1.binance.org:8545",
    explorer_url: "https://testnet.bscscan.com",
    is_testnet: true,
};

const ALL_CHAINS: &[&EvmChain] = &[&ETHEREUM, &BASE, &SEPOLIA, &BASE_SEPOLIA, &BSC_TESTNET];

/// Looks up a known chain by its chain ID.
pub fn get_chain(chain_id: u64) -> Option<&'static EvmChain> {
    ALL_CHAINS
        .iter()
        .find(|c| c.chain_id == chain_id)
        .copied()
}

/// Returns the block explorer URL for a transaction hash.
pub fn explorer_tx_url(chain: &EvmChain, tx_hash: &str) -> String {
    format!("{}/tx/{tx_hash}", chain.explorer_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_base_sepolia() {
        let chain = get_chain(84532).expect("Base Sepolia should be known");
        assert_eq!(chain.name, "Base Sepolia");
        assert_eq!(chain.rpc_url, "https://sepolia.base.org");
        assert!(chain.is_testnet);
    }

    #[test]
    fn get_bsc_testnet() {
        let chain = get_chain(97).expect("BSC testnet should be known");
        assert_eq!(chain.symbol, "tBNB");
        assert!(chain.is_testnet);
    }

    #[test]
    fn get_ethereum() {
        let chain = get_chain(1).expect("Ethereum should be known");
        assert_eq!(chain.name, "Ethereum");
        assert!(!chain.is_testnet);
    }

    #[test]
    fn unsupported_chain() {
        assert!(get_chain(999999).is_none());
    }

    #[test]
    fn explorer_url_for_tx() {
        let url = explorer_tx_url(&BASE_SEPOLIA, "0xabc");
        assert_eq!(url, "https://sepolia.basescan.org/tx/0xabc");
    }

    #[test]
    fn all_chains_have_https_endpoints() {
        for chain in ALL_CHAINS {
            assert!(chain.rpc_url.starts_with("https://"), "{}", chain.name);
            assert!(chain.explorer_url.starts_with("https://"), "{}", chain.name);
        }
    }
}
