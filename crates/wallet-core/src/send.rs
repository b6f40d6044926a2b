//! Native and ERC-20 transfers.

use chain_eth::address::{address_to_bytes, checksum_address, looks_like_address};
use chain_eth::keys::private_key_to_address;
use chain_eth::rpc::EvmRpc;
use chain_eth::submit::{submit_payment, Payment};
use chain_eth::units::{parse_units, NATIVE_DECIMALS};
use serde::Serialize;

use crate::error::WalletError;
use crate::registry::{ChainConfig, ChainRegistry};
use crate::wallet::WalletData;

/// The `token` value reported for native-currency transfers.
pub const NATIVE_TOKEN_LABEL: &str = "NATIVE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResult {
    pub tx_hash: String,
    pub from: String,
    pub to: String,
    /// The amount as given by the caller.
    pub amount: String,
    pub token: String,
    pub chain: String,
}

/// A token identifier resolved against a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedToken {
    /// Symbol for registered tokens, the contract address otherwise.
    pub label: String,
    pub address: String,
    pub decimals: u8,
}

/// Resolves a symbol or raw contract address.
///
/// Anything starting with `0x` is taken as a contract with 18 decimals.
/// Symbols are matched case-insensitively against the chain's tokens.
pub fn resolve_token(chain: &ChainConfig, identifier: &str) -> Result<ResolvedToken, WalletError> {
    if looks_like_address(identifier) {
        let address =
            checksum_address(identifier).map_err(|e| WalletError::InvalidAddress(e.to_string()))?;
        return Ok(ResolvedToken {
            label: identifier.to_string(),
            address,
            decimals: NATIVE_DECIMALS,
        });
    }

    let symbol = identifier.to_uppercase();
    chain
        .token(&symbol)
        .map(|info| ResolvedToken {
            label: info.symbol.clone(),
            address: info.address.clone(),
            decimals: info.decimals,
        })
        .ok_or_else(|| WalletError::UnknownToken {
            symbol,
            chain: chain.name.clone(),
            available: chain.symbols().join(", "),
        })
}

/// Sends `amount` of the native currency to `to`.
pub async fn send_native(
    rpc: &dyn EvmRpc,
    chain: &ChainConfig,
    private_key: &[u8; 32],
    to: &str,
    amount: &str,
) -> Result<SendResult, WalletError> {
    check_recipient(to)?;
    let value = parse_units(amount, chain.native_decimals)?;

    let payment = Payment::Native { to, value };
    let tx_hash = submit_payment(rpc, chain.chain_id, private_key, &payment).await?;

    Ok(SendResult {
        tx_hash,
        from: private_key_to_address(private_key)?,
        to: to.to_string(),
        amount: amount.to_string(),
        token: NATIVE_TOKEN_LABEL.to_string(),
        chain: chain.name.clone(),
    })
}

/// Sends `amount` of `token` (symbol or contract address) to `to`.
pub async fn send_token(
    rpc: &dyn EvmRpc,
    chain: &ChainConfig,
    private_key: &[u8; 32],
    to: &str,
    amount: &str,
    token: &str,
) -> Result<SendResult, WalletError> {
    let resolved = resolve_token(chain, token)?;
    check_recipient(to)?;
    let raw = parse_units(amount, resolved.decimals)?;

    let payment = Payment::Erc20 {
        contract: &resolved.address,
        to,
        amount: raw,
    };
    let tx_hash = submit_payment(rpc, chain.chain_id, private_key, &payment).await?;

    Ok(SendResult {
        tx_hash,
        from: private_key_to_address(private_key)?,
        to: to.to_string(),
        amount: amount.to_string(),
        token: resolved.label,
        chain: chain.name.clone(),
    })
}

/// Resolves `chain_name`, signs with `wallet` and submits over HTTP.
///
/// `token == None` sends the native currency.
pub async fn transfer(
    registry: &ChainRegistry,
    wallet: &WalletData,
    to: &str,
    amount: &str,
    token: Option<&str>,
    chain_name: &str,
) -> Result<SendResult, WalletError> {
    let chain = registry.resolve(chain_name)?;
    let key = wallet.secret_key()?;
    let client = chain.client()?;

    match token {
        None => send_native(&client, &chain, &key, to, amount).await,
        Some(token) => send_token(&client, &chain, &key, to, amount, token).await,
    }
}

fn check_recipient(to: &str) -> Result<(), WalletError> {
    address_to_bytes(to)
        .map(|_| ())
        .map_err(|e| WalletError::InvalidAddress(e.to_string()))
}
