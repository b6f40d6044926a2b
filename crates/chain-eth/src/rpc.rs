//! JSON-RPC access to EVM nodes.
//!
//! [`EvmRpc`] is the seam the wallet talks to; [`HttpRpcClient`] implements
//! it over HTTP JSON-RPC 2.0 with `reqwest`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use alloy_primitives::U256;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::EthError;

/// Default RPC request timeout in seconds.
const DEFAULT_RPC_TIMEOUT_SECS: u64 = 30;

/// JSON-RPC error code used by geth-style nodes for reverted execution.
const EXECUTION_REVERTED_CODE: i64 = 3;

/// A raw event log as returned by `eth_getLogs`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    pub address: String,
    pub topics: Vec<String>,
    pub data: String,
    /// `None` for pending logs.
    #[serde(default)]
    pub block_number: Option<String>,
    #[serde(default)]
    pub transaction_hash: Option<String>,
}

impl Log {
    /// The block number as an integer, if the log is mined.
    pub fn block_number(&self) -> Result<Option<u64>, EthError> {
        self.block_number.as_deref().map(parse_quantity_u64).transpose()
    }
}

/// Parameters for `eth_getLogs`.
///
/// `topics[i] == None` matches any value at position `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFilter {
    pub from_block: u64,
    pub to_block: u64,
    pub address: Option<String>,
    pub topics: Vec<Option<String>>,
}

impl LogFilter {
    fn to_json(&self) -> Value {
        let mut filter = json!({
            "fromBlock": encode_quantity(self.from_block),
            "toBlock": encode_quantity(self.to_block),
            "topics": self.topics,
        });
        if let Some(address) = &self.address {
            filter["address"] = json!(address);
        }
        filter
    }
}

/// A message call used for gas estimation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    pub from: String,
    pub to: String,
    pub value: U256,
    pub data: Vec<u8>,
}

impl CallRequest {
    fn to_json(&self) -> Value {
        json!({
            "from": self.from,
            "to": self.to,
            "value": format!("0x{:x}", self.value),
            "data": encode_bytes(&self.data),
        })
    }
}

/// Read and submit operations against one EVM chain.
///
/// Every method is a single round trip; callers decide how to fan out.
#[async_trait]
pub trait EvmRpc: Send + Sync {
    /// `eth_blockNumber`.
    async fn block_number(&self) -> Result<u64, EthError>;

    /// `eth_getBalance` at the latest block, in wei.
    async fn get_balance(&self, address: &str) -> Result<U256, EthError>;

    /// `eth_call` at the latest block. Returns the raw return data.
    async fn call(&self, to: &str, data: &[u8]) -> Result<Vec<u8>, EthError>;

    /// `eth_getLogs`.
    async fn get_logs(&self, filter: &LogFilter) -> Result<Vec<Log>, EthError>;

    /// `eth_getTransactionCount` at the pending block.
    async fn transaction_count(&self, address: &str) -> Result<u64, EthError>;

    /// `baseFeePerGas` of the latest block.
    async fn base_fee_per_gas(&self) -> Result<u128, EthError>;

    /// `eth_maxPriorityFeePerGas`.
    async fn max_priority_fee_per_gas(&self) -> Result<u128, EthError>;

    /// `eth_estimateGas`.
    async fn estimate_gas(&self, request: &CallRequest) -> Result<u64, EthError>;

    /// `eth_sendRawTransaction`. Returns the transaction hash.
    async fn send_raw_transaction(&self, raw_tx: &[u8]) -> Result<String, EthError>;
}

/// JSON-RPC error object.
#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

impl RpcResponse {
    fn into_result(self) -> Result<Value, EthError> {
        if let Some(err) = self.error {
            return Err(classify_error(err));
        }
        Ok(self.result.unwrap_or(Value::Null))
    }
}

/// Maps a node error object onto [`EthError`]. Reverts are recognised by the
/// dedicated code or by the message text.
fn classify_error(err: RpcErrorObject) -> EthError {
    if err.code == EXECUTION_REVERTED_CODE || err.message.to_lowercase().contains("revert") {
        let detail = match err.data {
            Some(Value::String(data)) if !data.is_empty() => format!("{} ({data})", err.message),
            _ => err.message,
        };
        EthError::Reverted(detail)
    } else {
        EthError::Rpc {
            code: err.code,
            message: err.message,
        }
    }
}

/// HTTP JSON-RPC 2.0 client for a single endpoint.
pub struct HttpRpcClient {
    client: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl HttpRpcClient {
    /// Creates a client for `url` with the default request timeout.
    pub fn new(url: &str) -> Result<Self, EthError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_RPC_TIMEOUT_SECS))
            .build()
            .map_err(|e| EthError::Network(format!("failed to build http client: {e}")))?;
        Ok(Self {
            client,
            url: url.to_string(),
            next_id: AtomicU64::new(1),
        })
    }

    async fn request<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, EthError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        debug!(method, id, url = %self.url, "rpc request");

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| EthError::Network(format!("{method}: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| EthError::Network(format!("{method}: {e}")))?;

        let parsed: RpcResponse = serde_json::from_str(&text).map_err(|_| {
            EthError::Network(format!("{method}: unexpected response (http {status})"))
        })?;

        let result = parsed.into_result()?;
        serde_json::from_value(result)
            .map_err(|e| EthError::EncodingError(format!("{method}: malformed result: {e}")))
    }
}

#[async_trait]
impl EvmRpc for HttpRpcClient {
    async fn block_number(&self) -> Result<u64, EthError> {
        let quantity: String = self.request("eth_blockNumber", json!([])).await?;
        parse_quantity_u64(&quantity)
    }

    async fn get_balance(&self, address: &str) -> Result<U256, EthError> {
        let quantity: String = self
            .request("eth_getBalance", json!([address, "latest"]))
            .await?;
        parse_quantity_u256(&quantity)
    }

    async fn call(&self, to: &str, data: &[u8]) -> Result<Vec<u8>, EthError> {
        let params = json!([{ "to": to, "data": encode_bytes(data) }, "latest"]);
        let result: String = self.request("eth_call", params).await?;
        decode_bytes(&result)
    }

    async fn get_logs(&self, filter: &LogFilter) -> Result<Vec<Log>, EthError> {
        self.request("eth_getLogs", json!([filter.to_json()])).await
    }

    async fn transaction_count(&self, address: &str) -> Result<u64, EthError> {
        let quantity: String = self
            .request("eth_getTransactionCount", json!([address, "pending"]))
            .await?;
        parse_quantity_u64(&quantity)
    }

    async fn base_fee_per_gas(&self) -> Result<u128, EthError> {
        let block: Value = self
            .request("eth_getBlockByNumber", json!(["latest", false]))
            .await?;
        let base_fee = block
            .get("baseFeePerGas")
            .and_then(Value::as_str)
            .ok_or_else(|| EthError::EncodingError("latest block has no baseFeePerGas".into()))?;
        parse_quantity_u128(base_fee)
    }

    async fn max_priority_fee_per_gas(&self) -> Result<u128, EthError> {
        let quantity: String = self.request("eth_maxPriorityFeePerGas", json!([])).await?;
        parse_quantity_u128(&quantity)
    }

    async fn estimate_gas(&self, request: &CallRequest) -> Result<u64, EthError> {
        let quantity: String = self
            .request("eth_estimateGas", json!([request.to_json()]))
            .await?;
        parse_quantity_u64(&quantity)
    }

    async fn send_raw_transaction(&self, raw_tx: &[u8]) -> Result<String, EthError> {
        self.request("eth_sendRawTransaction", json!([encode_bytes(raw_tx)]))
            .await
    }
}

// ---------------------------------------------------------------------------
// Hex quantity helpers
// ---------------------------------------------------------------------------

/// Encodes an integer as a JSON-RPC quantity (`0x`-prefixed, no leading zeros).
pub fn encode_quantity(value: u64) -> String {
    format!("{value:#x}")
}

/// Encodes bytes as JSON-RPC data (`0x`-prefixed hex).
pub fn encode_bytes(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

fn quantity_body(quantity: &str) -> Result<&str, EthError> {
    let body = quantity
        .strip_prefix("0x")
        .ok_or_else(|| EthError::EncodingError(format!("quantity without 0x prefix: {quantity}")))?;
    Ok(if body.is_empty() { "0" } else { body })
}

pub fn parse_quantity_u64(quantity: &str) -> Result<u64, EthError> {
    u64::from_str_radix(quantity_body(quantity)?, 16)
        .map_err(|e| EthError::EncodingError(format!("invalid quantity {quantity}: {e}")))
}

pub fn parse_quantity_u128(quantity: &str) -> Result<u128, EthError> {
    u128::from_str_radix(quantity_body(quantity)?, 16)
        .map_err(|e| EthError::EncodingError(format!("invalid quantity {quantity}: {e}")))
}

pub fn parse_quantity_u256(quantity: &str) -> Result<U256, EthError> {
    U256::from_str_radix(quantity_body(quantity)?, 16)
        .map_err(|e| EthError::EncodingError(format!("invalid quantity {quantity}: {e}")))
}

/// Decodes JSON-RPC data. `"0x"` is the empty byte string.
pub fn decode_bytes(data: &str) -> Result<Vec<u8>, EthError> {
    let body = data
        .strip_prefix("0x")
        .ok_or_else(|| EthError::EncodingError(format!("data without 0x prefix: {data}")))?;
    hex::decode(body).map_err(|e| EthError::EncodingError(format!("invalid data: {e}")))
}
