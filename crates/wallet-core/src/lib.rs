//! Wallet logic on top of `chain-eth`: chain and token registries, the
//! wallet file, and the balance, history and transfer operations.

pub mod balance;
pub mod config;
pub mod error;
pub mod history;
pub mod registry;
pub mod send;
mod storage;
pub mod token_registry;
pub mod wallet;

#[cfg(test)]
mod testing;

pub use balance::{get_balance, TokenBalance, TokenScan, WalletBalance};
pub use config::WalletConfig;
pub use error::WalletError;
pub use history::{get_history, Direction, TokenKind, TxRecord, DEFAULT_BLOCK_RANGE};
pub use registry::{ChainConfig, ChainRegistry};
pub use send::{transfer, SendResult};
pub use token_registry::{RegistryPolicy, TokenInfo, TokenRegistry, TokenStore};
pub use wallet::{WalletData, WalletStore};
