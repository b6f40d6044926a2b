use alloy_primitives::U256;

use crate::abi::{decode_address, decode_uint256, encode_function_call, AbiParam};
use crate::address::{address_to_bytes, bytes_to_address};
use crate::error::EthError;
use crate::rpc::Log;

/// Function selector for `transfer(address,uint256)`: `0xa9059cbb`.
const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

/// Function selector for `balanceOf(address)`: `0x70a08231`.
const BALANCE_OF_SELECTOR: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];

/// Topic 0 of `Transfer(address indexed from, address indexed to, uint256 value)`.
pub const TRANSFER_EVENT_TOPIC: &str =
    "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";

/// A decoded ERC-20 `Transfer` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferEvent {
    /// Emitting contract, checksummed.
    pub contract: String,
    pub from: String,
    pub to: String,
    pub value: U256,
    pub block_number: Option<u64>,
    pub tx_hash: String,
}

/// Encodes an ERC-20 `transfer(address,uint256)` call.
///
/// Returns the complete calldata (4-byte selector + 64 bytes of params).
pub fn encode_transfer(to: &str, amount: U256) -> Result<Vec<u8>, EthError> {
    let addr = address_to_bytes(to)?;
    let params = [AbiParam::Address(addr), AbiParam::Uint256(amount)];
    Ok(encode_function_call(TRANSFER_SELECTOR, &params))
}

/// Encodes an ERC-20 `balanceOf(address)` call.
///
/// Returns the complete calldata (4-byte selector + 32-byte address word).
pub fn encode_balance_of(owner: &str) -> Result<Vec<u8>, EthError> {
    let addr = address_to_bytes(owner)?;
    Ok(encode_function_call(BALANCE_OF_SELECTOR, &[AbiParam::Address(addr)]))
}

/// Decodes the uint256 returned by `balanceOf`.
pub fn decode_balance(return_data: &[u8]) -> Result<U256, EthError> {
    decode_uint256(return_data, 0)
}

/// Encodes an address as an indexed-event topic (`0x` + 64 hex characters).
pub fn address_topic(address: &str) -> Result<String, EthError> {
    let addr = address_to_bytes(address)?;
    Ok(format!("0x{}{}", "0".repeat(24), hex::encode(addr)))
}

/// Decodes a `Transfer` log.
///
/// Returns `None` for logs that are not ERC-20 transfers: a different topic 0,
/// or the ERC-721 shape where the value is a fourth indexed topic.
pub fn decode_transfer_log(log: &Log) -> Result<Option<TransferEvent>, EthError> {
    if log.topics.len() != 3 || !log.topics[0].eq_ignore_ascii_case(TRANSFER_EVENT_TOPIC) {
        return Ok(None);
    }

    let from = decode_address(&decode_hex(&log.topics[1])?)?;
    let to = decode_address(&decode_hex(&log.topics[2])?)?;
    let value = decode_uint256(&decode_hex(&log.data)?, 0)?;

    Ok(Some(TransferEvent {
        contract: bytes_to_address(&address_to_bytes(&log.address)?),
        from: bytes_to_address(&from),
        to: bytes_to_address(&to),
        value,
        block_number: log.block_number()?,
        tx_hash: log.transaction_hash.clone().unwrap_or_default(),
    }))
}

fn decode_hex(value: &str) -> Result<Vec<u8>, EthError> {
    let body = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(body).map_err(|e| EthError::EncodingError(format!("invalid hex: {e}")))
}
