use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_rlp::{Encodable, RlpEncodable};
use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{RecoveryId, Signature, SigningKey};
use sha3::{Digest, Keccak256};
use zeroize::Zeroize;

use crate::address::address_to_bytes;
use crate::erc20;
use crate::error::EthError;

/// EIP-2718 type byte of EIP-1559 transactions.
const EIP1559_TX_TYPE: u8 = 0x02;

/// Gas pricing and limit for an EIP-1559 transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeParams {
    pub max_priority_fee_per_gas: u128,
    pub max_fee_per_gas: u128,
    pub gas_limit: u64,
}

/// An unsigned EIP-1559 (type 2) Ethereum transaction.
#[derive(Debug, Clone)]
pub struct EthTransaction {
    pub chain_id: u64,
    pub nonce: u64,
    pub fees: FeeParams,
    pub to: Address,
    /// Transfer value in wei.
    pub value: U256,
    /// Calldata (empty for simple native transfers).
    pub data: Bytes,
}

/// A signed EIP-1559 Ethereum transaction ready for broadcast.
#[derive(Debug, Clone)]
pub struct SignedEthTransaction {
    /// `0x02 || rlp(signed fields)`.
    pub raw_tx: Vec<u8>,
    /// Keccak-256 of `raw_tx`, 0x-prefixed hex.
    pub tx_hash: String,
    pub y_parity: bool,
    pub r: U256,
    pub s: U256,
}

/// Builds an unsigned native-currency transfer.
pub fn build_transfer(
    chain_id: u64,
    nonce: u64,
    to: &str,
    value_wei: U256,
    fees: FeeParams,
) -> Result<EthTransaction, EthError> {
    Ok(EthTransaction {
        chain_id,
        nonce,
        fees,
        to: Address::from(address_to_bytes(to)?),
        value: value_wei,
        data: Bytes::new(),
    })
}

/// Builds an unsigned ERC-20 `transfer(address,uint256)` call to `token_contract`.
pub fn build_erc20_transfer(
    chain_id: u64,
    nonce: u64,
    token_contract: &str,
    to: &str,
    amount: U256,
    fees: FeeParams,
) -> Result<EthTransaction, EthError> {
    let contract = Address::from(address_to_bytes(token_contract)?);
    let calldata = erc20::encode_transfer(to, amount)?;

    Ok(EthTransaction {
        chain_id,
        nonce,
        fees,
        to: contract,
        value: U256::ZERO,
        data: calldata.into(),
    })
}

/// Signs an EIP-1559 transaction with the given secp256k1 private key.
///
/// The signature covers `keccak256(0x02 || rlp(unsigned fields))`; the
/// broadcast form is `0x02 || rlp(unsigned fields ++ [y_parity, r, s])`.
pub fn sign_transaction(
    tx: &EthTransaction,
    private_key: &[u8; 32],
) -> Result<SignedEthTransaction, EthError> {
    let msg_hash = signing_hash(tx);

    let mut key_bytes = *private_key;
    let signing_key = SigningKey::from_bytes((&key_bytes).into())
        .map_err(|e| EthError::InvalidPrivateKey(e.to_string()));
    key_bytes.zeroize();
    let signing_key = signing_key?;

    let (signature, recovery_id): (Signature, RecoveryId) = signing_key
        .sign_prehash(msg_hash.as_slice())
        .map_err(|e| EthError::SigningError(e.to_string()))?;

    let y_parity = recovery_id.is_y_odd();
    let r = U256::from_be_slice(&signature.r().to_bytes());
    let s = U256::from_be_slice(&signature.s().to_bytes());

    let signed_fields = SignedTxFields {
        chain_id: tx.chain_id,
        nonce: tx.nonce,
        max_priority_fee_per_gas: tx.fees.max_priority_fee_per_gas,
        max_fee_per_gas: tx.fees.max_fee_per_gas,
        gas_limit: tx.fees.gas_limit,
        to: tx.to,
        value: tx.value,
        data: tx.data.clone(),
        access_list: Vec::new(),
        y_parity,
        r,
        s,
    };

    let raw_tx = typed_envelope(&signed_fields);
    let tx_hash = format!("0x{}", hex::encode(Keccak256::digest(&raw_tx)));

    Ok(SignedEthTransaction {
        raw_tx,
        tx_hash,
        y_parity,
        r,
        s,
    })
}

/// Encodes the unsigned transaction as `0x02 || rlp(fields)`.
///
/// Fields: `[chain_id, nonce, max_priority_fee_per_gas, max_fee_per_gas,
/// gas_limit, to, value, data, access_list]`.
pub fn encode_unsigned_tx(tx: &EthTransaction) -> Vec<u8> {
    typed_envelope(&UnsignedTxFields {
        chain_id: tx.chain_id,
        nonce: tx.nonce,
        max_priority_fee_per_gas: tx.fees.max_priority_fee_per_gas,
        max_fee_per_gas: tx.fees.max_fee_per_gas,
        gas_limit: tx.fees.gas_limit,
        to: tx.to,
        value: tx.value,
        data: tx.data.clone(),
        access_list: Vec::new(),
    })
}

/// The 32-byte digest that is signed.
pub fn signing_hash(tx: &EthTransaction) -> B256 {
    B256::from_slice(&Keccak256::digest(encode_unsigned_tx(tx)))
}

fn typed_envelope<T: Encodable>(fields: &T) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + fields.length());
    out.push(EIP1559_TX_TYPE);
    fields.encode(&mut out);
    out
}

// Field layouts for the RLP list bodies.

#[derive(RlpEncodable)]
struct UnsignedTxFields {
    chain_id: u64,
    nonce: u64,
    max_priority_fee_per_gas: u128,
    max_fee_per_gas: u128,
    gas_limit: u64,
    to: Address,
    value: U256,
    data: Bytes,
    access_list: Vec<AccessListItem>,
}

#[derive(RlpEncodable)]
struct SignedTxFields {
    chain_id: u64,
    nonce: u64,
    max_priority_fee_per_gas: u128,
    max_fee_per_gas: u128,
    gas_limit: u64,
    to: Address,
    value: U256,
    data: Bytes,
    access_list: Vec<AccessListItem>,
    y_parity: bool,
    r: U256,
    s: U256,
}

/// An EIP-2930 access list entry. Always empty here.
#[derive(Debug, Clone, RlpEncodable)]
struct AccessListItem {
    address: Address,
    storage_keys: Vec<B256>,
}
