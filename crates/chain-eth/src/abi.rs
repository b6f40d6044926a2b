//! Minimal ABI encoding and decoding for EVM function calls and event logs.
//!
//! Only static 32-byte words are supported: addresses and uint256 values,
//! which is all ERC-20 `transfer`, `balanceOf` and `Transfer` need.

use alloy_primitives::U256;

use crate::error::EthError;

/// A single ABI-encoded parameter.
#[derive(Debug, Clone)]
pub enum AbiParam {
    /// A 20-byte Ethereum address, left-padded to 32 bytes.
    Address([u8; 20]),
    /// A 256-bit unsigned integer, big-endian.
    Uint256(U256),
}

/// Encodes a function call as `selector || word(params[0]) || word(params[1]) || ...`.
pub fn encode_function_call(selector: [u8; 4], params: &[AbiParam]) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + params.len() * 32);
    data.extend_from_slice(&selector);

    for param in params {
        data.extend_from_slice(&encode_param(param));
    }

    data
}

/// Encodes a single [`AbiParam`] as a 32-byte ABI word.
pub fn encode_param(param: &AbiParam) -> [u8; 32] {
    match param {
        AbiParam::Address(addr) => {
            let mut word = [0u8; 32];
            word[12..].copy_from_slice(addr);
            word
        }
        AbiParam::Uint256(value) => value.to_be_bytes::<32>(),
    }
}

/// Reads the `index`-th 32-byte word of `data` as a uint256.
pub fn decode_uint256(data: &[u8], index: usize) -> Result<U256, EthError> {
    let start = index * 32;
    let word = data.get(start..start + 32).ok_or_else(|| {
        EthError::EncodingError(format!(
            "expected at least {} bytes for word {index}, got {}",
            start + 32,
            data.len()
        ))
    })?;
    Ok(U256::from_be_slice(word))
}

/// Reads an address out of a left-padded 32-byte word.
///
/// The 12 padding bytes must be zero.
pub fn decode_address(word: &[u8]) -> Result<[u8; 20], EthError> {
    if word.len() != 32 {
        return Err(EthError::EncodingError(format!(
            "address word must be 32 bytes, got {}",
            word.len()
        )));
    }
    if word[..12].iter().any(|&b| b != 0) {
        return Err(EthError::EncodingError(
            "address word has non-zero padding".into(),
        ));
    }

    let mut addr = [0u8; 20];
    addr.copy_from_slice(&word[12..]);
    Ok(addr)
}
