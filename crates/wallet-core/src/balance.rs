//! Native and token balances for one address on one chain.

use alloy_primitives::U256;
use chain_eth::address::address_to_bytes;
use chain_eth::erc20::{decode_balance, encode_balance_of};
use chain_eth::rpc::EvmRpc;
use chain_eth::units::format_units;
use futures::future::join_all;
use serde::Serialize;
use tracing::debug;

use crate::error::WalletError;
use crate::registry::{ChainConfig, ChainRegistry};
use crate::token_registry::TokenInfo;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenBalance {
    pub symbol: String,
    pub address: String,
    /// Decimal string scaled by the token's decimals.
    pub balance: String,
    /// Integer amount in the token's smallest unit.
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletBalance {
    pub address: String,
    pub chain: String,
    pub native_symbol: String,
    pub native: String,
    pub native_raw: String,
    /// In the chain's token order.
    pub tokens: Vec<TokenBalance>,
}

/// Token balances without the native amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenScan {
    pub address: String,
    pub chain: String,
    pub tokens: Vec<TokenBalance>,
}

impl From<WalletBalance> for TokenScan {
    fn from(balance: WalletBalance) -> Self {
        Self {
            address: balance.address,
            chain: balance.chain,
            tokens: balance.tokens,
        }
    }
}

/// Resolves `chain_name` and queries its endpoint.
pub async fn get_balance(
    registry: &ChainRegistry,
    address: &str,
    chain_name: &str,
) -> Result<WalletBalance, WalletError> {
    let chain = registry.resolve(chain_name)?;
    let client = chain.client()?;
    fetch_balance(&client, &chain, address).await
}

/// Reads the native balance and every token balance concurrently.
///
/// A failed token read reports zero for that token. A failed native read
/// fails the whole call.
pub async fn fetch_balance(
    rpc: &dyn EvmRpc,
    chain: &ChainConfig,
    address: &str,
) -> Result<WalletBalance, WalletError> {
    address_to_bytes(address).map_err(|e| WalletError::InvalidAddress(e.to_string()))?;

    let token_reads = chain
        .tokens
        .iter()
        .map(|token| read_token_balance(rpc, token, address));

    let (native, token_raws) = futures::join!(rpc.get_balance(address), join_all(token_reads));
    let native = native?;

    let tokens = chain
        .tokens
        .iter()
        .zip(token_raws)
        .map(|(token, raw)| TokenBalance {
            symbol: token.symbol.clone(),
            address: token.address.clone(),
            balance: format_units(raw, token.decimals),
            raw: raw.to_string(),
        })
        .collect();

    Ok(WalletBalance {
        address: address.to_string(),
        chain: chain.name.clone(),
        native_symbol: chain.native_symbol.clone(),
        native: format_units(native, chain.native_decimals),
        native_raw: native.to_string(),
        tokens,
    })
}

async fn read_token_balance(rpc: &dyn EvmRpc, token: &TokenInfo, owner: &str) -> U256 {
    let result = async {
        let calldata = encode_balance_of(owner)?;
        let data = rpc.call(&token.address, &calldata).await?;
        decode_balance(&data)
    }
    .await;

    result.unwrap_or_else(|e| {
        debug!(token = %token.symbol, contract = %token.address, error = %e, "token balance read failed, reporting zero");
        U256::ZERO
    })
}
