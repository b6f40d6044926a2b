use std::path::PathBuf;

use chain_eth::error::EthError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Unknown chain: {name}. Available: {available}")]
    UnknownChain { name: String, available: String },

    #[error("Wallet already exists at {}", .0.display())]
    WalletAlreadyExists(PathBuf),

    #[error("No wallet found at {}. Run `wallet create` or `wallet import <key>` first", .0.display())]
    WalletNotFound(PathBuf),

    #[error("Wallet file {} is not valid JSON: {reason}", .path.display())]
    WalletFileCorrupt { path: PathBuf, reason: String },

    #[error("Wallet file {} is malformed: {reason}", .path.display())]
    WalletFileMalformed { path: PathBuf, reason: String },

    #[error("Unknown token {symbol} on {chain}. Available: {available}")]
    UnknownToken {
        symbol: String,
        chain: String,
        available: String,
    },

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Token registry {} is corrupt: {reason}", .path.display())]
    TokenRegistryCorrupt { path: PathBuf, reason: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Chain(#[from] EthError),
}

impl WalletError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WalletError::Io {
            path: path.into(),
            source,
        }
    }
}
