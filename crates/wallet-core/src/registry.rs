//! Chain registry: built-in networks merged with the user's token overlay.

use chain_eth::chains::{get_chain, supported_chains};
use chain_eth::rpc::HttpRpcClient;

use crate::error::WalletError;
use crate::token_registry::{TokenInfo, TokenRegistry};

/// A fully resolved network: endpoint plus the effective token list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    pub name: String,
    pub chain_id: u64,
    pub rpc_url: String,
    pub native_symbol: String,
    pub native_decimals: u8,
    /// Built-ins in declared order, overlay entries replacing them in place,
    /// then overlay-only symbols in symbol order.
    pub tokens: Vec<TokenInfo>,
}

impl ChainConfig {
    /// Looks a token up by symbol, case-insensitively.
    pub fn token(&self, symbol: &str) -> Option<&TokenInfo> {
        self.tokens
            .iter()
            .find(|t| t.symbol.eq_ignore_ascii_case(symbol))
    }

    /// Looks a token up by contract address, case-insensitively.
    pub fn token_by_address(&self, address: &str) -> Option<&TokenInfo> {
        self.tokens
            .iter()
            .find(|t| t.address.eq_ignore_ascii_case(address))
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.symbol.as_str()).collect()
    }

    /// An HTTP JSON-RPC client for this chain's endpoint.
    pub fn client(&self) -> Result<HttpRpcClient, WalletError> {
        Ok(HttpRpcClient::new(&self.rpc_url)?)
    }
}

/// Immutable view of every supported chain, built once per process.
#[derive(Debug, Clone, Default)]
pub struct ChainRegistry {
    overlay: TokenRegistry,
    rpc_override: Option<String>,
}

impl ChainRegistry {
    /// Built-in chains overlaid with user tokens.
    pub fn new(overlay: TokenRegistry) -> Self {
        Self {
            overlay,
            rpc_override: None,
        }
    }

    /// Built-in chains only.
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Uses `url` as the endpoint of every resolved chain.
    pub fn with_rpc_override(mut self, url: Option<String>) -> Self {
        self.rpc_override = url;
        self
    }

    /// Supported chain names in declaration order.
    pub fn list_chains(&self) -> Vec<&'static str> {
        supported_chains().iter().map(|c| c.name).collect()
    }

    /// Resolves `name` into its effective configuration.
    pub fn resolve(&self, name: &str) -> Result<ChainConfig, WalletError> {
        let chain = get_chain(name).ok_or_else(|| WalletError::UnknownChain {
            name: name.to_string(),
            available: self.list_chains().join(", "),
        })?;

        let mut tokens: Vec<TokenInfo> = chain
            .tokens
            .iter()
            .map(|t| TokenInfo {
                symbol: t.symbol.to_string(),
                address: t.address.to_string(),
                decimals: t.decimals,
            })
            .collect();

        if let Some(custom) = self.overlay.get(chain.name) {
            for (symbol, info) in custom {
                let info = TokenInfo {
                    symbol: symbol.to_uppercase(),
                    ..info.clone()
                };
                match tokens.iter_mut().find(|t| t.symbol == info.symbol) {
                    Some(existing) => *existing = info,
                    None => tokens.push(info),
                }
            }
        }

        Ok(ChainConfig {
            name: chain.name.to_string(),
            chain_id: chain.chain_id,
            rpc_url: self
                .rpc_override
                .clone()
                .unwrap_or_else(|| chain.rpc_url.to_string()),
            native_symbol: chain.symbol.to_string(),
            native_decimals: chain.decimals,
            tokens,
        })
    }
}
