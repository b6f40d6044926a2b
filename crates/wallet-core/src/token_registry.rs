//! User-defined token overlay, persisted as `tokens.json` next to the wallet.
//!
//! File shape: `{ "<chain>": { "<SYMBOL>": { "symbol", "address", "decimals" } } }`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chain_eth::address::checksum_address;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::WalletError;
use crate::storage::{read_optional, write_json_atomic};

/// A fungible token contract on one chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    /// Upper-case symbol.
    pub symbol: String,
    /// Contract address (EIP-55 checksummed when written by this crate).
    pub address: String,
    pub decimals: u8,
}

/// Chain name to upper-case symbol to token.
pub type TokenRegistry = BTreeMap<String, BTreeMap<String, TokenInfo>>;

/// What `load` does with a token file that exists but cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RegistryPolicy {
    /// Treat it as empty and log a warning.
    #[default]
    BestEffort,
    /// Return [`WalletError::TokenRegistryCorrupt`].
    FailFast,
}

/// Reads and writes the token overlay file.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
    policy: RegistryPolicy,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>, policy: RegistryPolicy) -> Self {
        Self {
            path: path.into(),
            policy,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the registry. A missing file is an empty registry.
    pub fn load(&self) -> Result<TokenRegistry, WalletError> {
        let Some(contents) = read_optional(&self.path)? else {
            return Ok(TokenRegistry::new());
        };

        match serde_json::from_slice::<TokenRegistry>(&contents) {
            Ok(registry) => Ok(registry),
            Err(e) => match self.policy {
                RegistryPolicy::BestEffort => {
                    warn!(path = %self.path.display(), error = %e, "ignoring unreadable token registry");
                    Ok(TokenRegistry::new())
                }
                RegistryPolicy::FailFast => Err(WalletError::TokenRegistryCorrupt {
                    path: self.path.clone(),
                    reason: e.to_string(),
                }),
            },
        }
    }

    /// Adds or replaces `(chain, SYMBOL)` and persists the whole registry.
    pub fn add(
        &self,
        chain: &str,
        symbol: &str,
        address: &str,
        decimals: u8,
    ) -> Result<TokenInfo, WalletError> {
        let address =
            checksum_address(address).map_err(|e| WalletError::InvalidAddress(e.to_string()))?;
        let symbol = symbol.to_uppercase();
        let info = TokenInfo {
            symbol: symbol.clone(),
            address,
            decimals,
        };

        let mut registry = self.load()?;
        registry
            .entry(chain.to_string())
            .or_default()
            .insert(symbol, info.clone());
        write_json_atomic(&self.path, &registry)?;

        info!(chain, symbol = %info.symbol, address = %info.address, "token registered");
        Ok(info)
    }

    /// Removes `(chain, SYMBOL)`. Returns `false`, without writing, if absent.
    ///
    /// A chain whose last token is removed is dropped from the file.
    pub fn remove(&self, chain: &str, symbol: &str) -> Result<bool, WalletError> {
        let symbol = symbol.to_uppercase();
        let mut registry = self.load()?;

        let Some(tokens) = registry.get_mut(chain) else {
            return Ok(false);
        };
        if tokens.remove(&symbol).is_none() {
            return Ok(false);
        }
        if tokens.is_empty() {
            registry.remove(chain);
        }

        write_json_atomic(&self.path, &registry)?;
        info!(chain, symbol = %symbol, "token removed");
        Ok(true)
    }

    /// The full registry, or only `chain` when given. An unknown chain
    /// yields an empty registry.
    pub fn list(&self, chain: Option<&str>) -> Result<TokenRegistry, WalletError> {
        let mut registry = self.load()?;
        Ok(match chain {
            None => registry,
            Some(chain) => registry
                .remove_entry(chain)
                .into_iter()
                .collect(),
        })
    }
}
