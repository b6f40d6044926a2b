//! Sign-and-broadcast for native and ERC-20 transfers.
//!
//! Nonce, fee data and gas limit come from the node; the transaction is
//! signed locally and submitted once with `eth_sendRawTransaction`.

use alloy_primitives::U256;
use tracing::{debug, info};

use crate::erc20;
use crate::error::EthError;
use crate::keys::private_key_to_address;
use crate::rpc::{CallRequest, EvmRpc};
use crate::transaction::{build_erc20_transfer, build_transfer, sign_transaction, FeeParams};

/// Multiplier applied to the latest base fee when computing `max_fee_per_gas`.
const BASE_FEE_MULTIPLIER: u128 = 2;

/// A value transfer to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payment<'a> {
    /// Native currency, `value` in wei.
    Native { to: &'a str, value: U256 },
    /// ERC-20 `transfer(to, amount)` on `contract`, `amount` in raw units.
    Erc20 {
        contract: &'a str,
        to: &'a str,
        amount: U256,
    },
}

impl Payment<'_> {
    /// The `to` of the outer transaction, its value and calldata.
    fn call_parts(&self) -> Result<(&str, U256, Vec<u8>), EthError> {
        match *self {
            Payment::Native { to, value } => Ok((to, value, Vec::new())),
            Payment::Erc20 {
                contract,
                to,
                amount,
            } => Ok((contract, U256::ZERO, erc20::encode_transfer(to, amount)?)),
        }
    }
}

/// Signs `payment` with `private_key` and broadcasts it on `chain_id`.
///
/// Returns the transaction hash reported by the node.
pub async fn submit_payment(
    rpc: &dyn EvmRpc,
    chain_id: u64,
    private_key: &[u8; 32],
    payment: &Payment<'_>,
) -> Result<String, EthError> {
    let from = private_key_to_address(private_key)?;
    let (target, value, data) = payment.call_parts()?;

    let (nonce, base_fee, priority_fee) = futures::try_join!(
        rpc.transaction_count(&from),
        rpc.base_fee_per_gas(),
        rpc.max_priority_fee_per_gas(),
    )?;

    let gas_limit = rpc
        .estimate_gas(&CallRequest {
            from: from.clone(),
            to: target.to_string(),
            value,
            data,
        })
        .await?;

    let fees = FeeParams {
        max_priority_fee_per_gas: priority_fee,
        max_fee_per_gas: base_fee
            .saturating_mul(BASE_FEE_MULTIPLIER)
            .saturating_add(priority_fee),
        gas_limit,
    };
    debug!(%from, nonce, gas_limit, max_fee = fees.max_fee_per_gas, "prepared transaction");

    let tx = match *payment {
        Payment::Native { to, value } => build_transfer(chain_id, nonce, to, value, fees)?,
        Payment::Erc20 {
            contract,
            to,
            amount,
        } => build_erc20_transfer(chain_id, nonce, contract, to, amount, fees)?,
    };
    let signed = sign_transaction(&tx, private_key)?;

    let tx_hash = rpc.send_raw_transaction(&signed.raw_tx).await?;
    if !tx_hash.eq_ignore_ascii_case(&signed.tx_hash) {
        debug!(node = %tx_hash, local = %signed.tx_hash, "node returned a different hash");
    }
    info!(%from, tx_hash = %tx_hash, chain_id, "transaction broadcast");

    Ok(tx_hash)
}
