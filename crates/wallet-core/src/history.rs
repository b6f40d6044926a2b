//! Recent ERC-20 transfer history reconstructed from `Transfer` logs.

use chain_eth::address::address_to_bytes;
use chain_eth::erc20::{address_topic, decode_transfer_log, TransferEvent, TRANSFER_EVENT_TOPIC};
use chain_eth::rpc::{EvmRpc, Log, LogFilter};
use chain_eth::units::{format_units, NATIVE_DECIMALS};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::WalletError;
use crate::registry::{ChainConfig, ChainRegistry};

/// Blocks scanned back from the chain head when no range is given.
pub const DEFAULT_BLOCK_RANGE: u64 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
}

/// What the `token` field of a [`TxRecord`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// A registered token symbol.
    Symbol,
    /// The raw contract address of an unregistered token.
    Contract,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TxRecord {
    pub tx_hash: String,
    /// Decimal block number; `"0"` for pending logs.
    pub block_number: String,
    pub from: String,
    pub to: String,
    pub token: String,
    pub token_kind: TokenKind,
    pub amount: String,
    pub direction: Direction,
    #[serde(skip)]
    block: u64,
}

/// Resolves `chain_name` and scans its endpoint.
pub async fn get_history(
    registry: &ChainRegistry,
    address: &str,
    chain_name: &str,
    block_range: Option<u64>,
) -> Result<Vec<TxRecord>, WalletError> {
    let chain = registry.resolve(chain_name)?;
    let client = chain.client()?;
    fetch_history(
        &client,
        &chain,
        address,
        block_range.unwrap_or(DEFAULT_BLOCK_RANGE),
    )
    .await
}

/// Scans `[head - block_range, head]` for transfers from and to `address`.
///
/// Outgoing and incoming scans run concurrently. Records come back newest
/// first; within a block, outgoing transfers precede incoming ones.
pub async fn fetch_history(
    rpc: &dyn EvmRpc,
    chain: &ChainConfig,
    address: &str,
    block_range: u64,
) -> Result<Vec<TxRecord>, WalletError> {
    address_to_bytes(address).map_err(|e| WalletError::InvalidAddress(e.to_string()))?;
    let topic = address_topic(address)?;

    let head = rpc.block_number().await?;
    let from_block = head.saturating_sub(block_range);

    let scan = |topics: Vec<Option<String>>| LogFilter {
        from_block,
        to_block: head,
        address: None,
        topics,
    };
    let outgoing = scan(vec![Some(TRANSFER_EVENT_TOPIC.into()), Some(topic.clone()), None]);
    let incoming = scan(vec![Some(TRANSFER_EVENT_TOPIC.into()), None, Some(topic)]);

    let (out_logs, in_logs) =
        futures::try_join!(rpc.get_logs(&outgoing), rpc.get_logs(&incoming))?;

    let mut records = Vec::with_capacity(out_logs.len() + in_logs.len());
    collect_records(chain, &out_logs, Direction::Out, &mut records);
    collect_records(chain, &in_logs, Direction::In, &mut records);

    // Stable, so equal blocks keep the outgoing-then-incoming order.
    records.sort_by(|a, b| b.block.cmp(&a.block));

    info!(chain = %chain.name, from_block, head, count = records.len(), "history scanned");
    Ok(records)
}

fn collect_records(
    chain: &ChainConfig,
    logs: &[Log],
    direction: Direction,
    records: &mut Vec<TxRecord>,
) {
    for log in logs {
        match decode_transfer_log(log) {
            Ok(Some(event)) => records.push(to_record(chain, event, direction)),
            Ok(None) => {
                debug!(contract = %log.address, topics = log.topics.len(), "skipping non-ERC-20 log")
            }
            Err(e) => debug!(contract = %log.address, error = %e, "skipping undecodable log"),
        }
    }
}

fn to_record(chain: &ChainConfig, event: TransferEvent, direction: Direction) -> TxRecord {
    let (token, token_kind, decimals) = match chain.token_by_address(&event.contract) {
        Some(info) => (info.symbol.clone(), TokenKind::Symbol, info.decimals),
        None => (event.contract.clone(), TokenKind::Contract, NATIVE_DECIMALS),
    };
    let block = event.block_number.unwrap_or(0);

    TxRecord {
        tx_hash: event.tx_hash,
        block_number: block.to_string(),
        from: event.from,
        to: event.to,
        token,
        token_kind,
        amount: format_units(event.value, decimals),
        direction,
        block,
    }
}
