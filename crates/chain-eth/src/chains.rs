/// A well-known ERC-20 contract shipped with a network definition.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinToken {
    pub symbol: &'static str,
    pub address: &'static str,
    pub decimals: u8,
}

/// Definition of an EVM-compatible blockchain network.
#[derive(Debug, Clone)]
pub struct EvmChain {
    /// Short identifier used on the command line (e.g. `base-sepolia`).
    pub name: &'static str,
    pub chain_id: u64,
    pub symbol: &'static str,
    pub decimals: u8,
    pub rpc_url: &'static str,
    pub tokens: &'static [BuiltinToken],
}

/// Base Sepolia Testnet (chain ID 84532).
pub const BASE_SEPOLIA: EvmChain = EvmChain {
    name: "base-sepolia",
    chain_id: 84532,
    symbol: "ETH",
    decimals: 18,
    rpc_url: "https://sepolia.base.org",
    tokens: &[
        BuiltinToken {
            symbol: "USDC",
            address: "0x036CbD53842c5426634e7929541eC2318f3dCF7e",
            decimals: 6,
        },
        BuiltinToken {
            symbol: "WETH",
            address: "0x4200000000000000000000000000000000000006",
            decimals: 18,
        },
    ],
};

/// Base (chain ID 8453).
pub const BASE: EvmChain = EvmChain {
    name: "base",
    chain_id: 8453,
    symbol: "ETH",
    decimals: 18,
    rpc_url: "https://mainnet.base.org",
    tokens: &[
        BuiltinToken {
            symbol: "USDC",
            address: "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913",
            decimals: 6,
        },
        BuiltinToken {
            symbol: "WETH",
            address: "0x4200000000000000000000000000000000000006",
            decimals: 18,
        },
    ],
};

/// Ethereum Mainnet (chain ID 1).
pub const ETHEREUM: EvmChain = EvmChain {
    name: "ethereum",
    chain_id: 1,
    symbol: "ETH",
    decimals: 18,
    rpc_url: "https://eth.llamarpc.com",
    tokens: &[
        BuiltinToken {
            symbol: "USDC",
            address: "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48",
            decimals: 6,
        },
        BuiltinToken {
            symbol: "WETH",
            address: "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2",
            decimals: 18,
        },
    ],
};

/// Sepolia Testnet (chain ID 11155111).
pub const ETHEREUM_SEPOLIA: EvmChain = EvmChain {
    name: "ethereum-sepolia",
    chain_id: 11155111,
    symbol: "ETH",
    decimals: 18,
    rpc_url: "https://rpc.sepolia.org",
    tokens: &[
        BuiltinToken {
            symbol: "USDC",
            address: "0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238",
            decimals: 6,
        },
        BuiltinToken {
            symbol: "WETH",
            address: "0x7b79995e5f793A07Bc00c21412e50Ecae098E7f9",
            decimals: 18,
        },
    ],
};

/// All supported EVM chains, in display order.
const ALL_CHAINS: &[&EvmChain] = &[&BASE_SEPOLIA, &BASE, &ETHEREUM, &ETHEREUM_SEPOLIA];

/// The chain used when none is specified.
pub const DEFAULT_CHAIN: &str = BASE_SEPOLIA.name;

/// Returns the chain definition for a given short name, or `None` if unsupported.
pub fn get_chain(name: &str) -> Option<&'static EvmChain> {
    ALL_CHAINS.iter().find(|c| c.name == name).copied()
}

/// Returns all supported EVM chain definitions.
pub fn supported_chains() -> Vec<&'static EvmChain> {
    ALL_CHAINS.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::validate_address;

    #[test]
    fn default_chain_is_base_sepolia() {
        assert_eq!(DEFAULT_CHAIN, "base-sepolia");
        let chain = get_chain(DEFAULT_CHAIN).expect("default chain should be supported");
        assert_eq!(chain.chain_id, 84532);
    }

    #[test]
    fn get_base() {
        let chain = get_chain("base").expect("Base should be supported");
        assert_eq!(chain.chain_id, 8453);
    }

    #[test]
    fn get_ethereum() {
        let chain = get_chain("ethereum").expect("Ethereum should be supported");
        assert_eq!(chain.chain_id, 1);
        assert_eq!(chain.symbol, "ETH");
    }

    #[test]
    fn get_ethereum_sepolia() {
        let chain = get_chain("ethereum-sepolia").expect("Sepolia should be supported");
        assert_eq!(chain.chain_id, 11155111);
    }

    #[test]
    fn chain_ids_are_unique() {
        let mut ids: Vec<u64> = supported_chains().iter().map(|c| c.chain_id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), supported_chains().len());
    }

    #[test]
    fn unsupported_chain_returns_none() {
        assert!(get_chain("unknown-chain").is_none());
    }

    #[test]
    fn supported_chains_includes_all() {
        assert_eq!(supported_chains().len(), 4);
    }

    #[test]
    fn every_chain_ships_usdc_and_weth() {
        for chain in supported_chains() {
            for symbol in ["USDC", "WETH"] {
                let token = chain
                    .tokens
                    .iter()
                    .find(|t| t.symbol == symbol)
                    .unwrap_or_else(|| panic!("{} is missing {symbol}", chain.name));
                assert!(
                    validate_address(token.address).is_ok(),
                    "{} {symbol} address is malformed",
                    chain.name
                );
            }
        }
    }

    #[test]
    fn builtin_token_addresses_pass_checksum() {
        for chain in supported_chains() {
            for token in chain.tokens {
                assert!(
                    validate_address(token.address).unwrap(),
                    "{} {} checksum mismatch",
                    chain.name,
                    token.symbol
                );
            }
        }
    }

    #[test]
    fn all_chains_have_rpc_url() {
        for chain in supported_chains() {
            assert!(
                chain.rpc_url.starts_with("https://"),
                "{} rpc_url should start with https://",
                chain.name
            );
        }
    }
}
