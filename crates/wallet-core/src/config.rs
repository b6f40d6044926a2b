//! Process configuration resolved from the environment.

use std::path::{Path, PathBuf};

use crate::error::WalletError;
use crate::token_registry::RegistryPolicy;

/// Overrides the wallet file location.
pub const WALLET_PATH_ENV: &str = "WALLET_PATH";

/// Overrides the RPC endpoint of whichever chain is selected.
pub const RPC_URL_ENV: &str = "WALLET_RPC_URL";

/// `1` or `true` makes a corrupt token registry a hard error.
pub const STRICT_TOKENS_ENV: &str = "WALLET_STRICT_TOKENS";

pub const DEFAULT_WALLET_DIR: &str = ".wallet";
pub const WALLET_FILE_NAME: &str = "wallet.json";
pub const TOKENS_FILE_NAME: &str = "tokens.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletConfig {
    pub wallet_path: PathBuf,
    /// Always `tokens.json` next to the wallet file.
    pub tokens_path: PathBuf,
    pub token_policy: RegistryPolicy,
    pub rpc_url: Option<String>,
}

impl WalletConfig {
    /// Reads the process environment and working directory.
    pub fn from_env() -> Result<Self, WalletError> {
        let cwd = std::env::current_dir().map_err(|e| WalletError::io(".", e))?;
        Ok(Self::from_lookup(|key| std::env::var(key).ok(), &cwd))
    }

    /// Resolves the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F, cwd: &Path) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let wallet_path = lookup(WALLET_PATH_ENV)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| default_wallet_path(cwd));

        let token_policy = match lookup(STRICT_TOKENS_ENV).as_deref() {
            Some("1") | Some("true") | Some("TRUE") => RegistryPolicy::FailFast,
            _ => RegistryPolicy::BestEffort,
        };

        let rpc_url = lookup(RPC_URL_ENV).filter(|u| !u.is_empty());

        Self {
            tokens_path: tokens_path_for(&wallet_path),
            wallet_path,
            token_policy,
            rpc_url,
        }
    }

    /// Configuration for an explicit wallet path with default policies.
    pub fn with_wallet_path(path: impl Into<PathBuf>) -> Self {
        let wallet_path = path.into();
        Self {
            tokens_path: tokens_path_for(&wallet_path),
            wallet_path,
            token_policy: RegistryPolicy::BestEffort,
            rpc_url: None,
        }
    }
}

/// `<cwd>/.wallet/wallet.json`.
pub fn default_wallet_path(cwd: &Path) -> PathBuf {
    cwd.join(DEFAULT_WALLET_DIR).join(WALLET_FILE_NAME)
}

/// The token registry file that sits next to `wallet_path`.
pub fn tokens_path_for(wallet_path: &Path) -> PathBuf {
    match wallet_path.parent() {
        Some(dir) => dir.join(TOKENS_FILE_NAME),
        None => PathBuf::from(TOKENS_FILE_NAME),
    }
}
