//! EVM chain support for the wallet.
//!
//! This crate provides:
//! - secp256k1 key generation and Ethereum address derivation (EIP-55)
//! - EIP-1559 transaction building and signing
//! - ERC-20 call encoding and `Transfer` log decoding
//! - Decimal unit formatting and parsing
//! - A JSON-RPC client behind the [`rpc::EvmRpc`] trait
//! - Built-in EVM network definitions

pub mod abi;
pub mod address;
pub mod chains;
pub mod erc20;
pub mod error;
pub mod keys;
pub mod rpc;
pub mod submit;
pub mod transaction;
pub mod units;

pub use error::EthError;
