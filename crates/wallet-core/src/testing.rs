//! In-memory [`EvmRpc`] used by the aggregator tests.

use std::collections::HashMap;
use std::sync::Mutex;

use alloy_primitives::U256;
use async_trait::async_trait;
use chain_eth::erc20::{address_topic, TRANSFER_EVENT_TOPIC};
use chain_eth::error::EthError;
use chain_eth::rpc::{CallRequest, EvmRpc, Log, LogFilter};

#[derive(Default)]
pub(crate) struct FakeNode {
    /// `None` makes `eth_getBalance` fail.
    pub native: Option<U256>,
    /// Lower-case contract address to `balanceOf` result. Others revert.
    pub token_balances: HashMap<String, U256>,
    pub head: u64,
    pub logs: Vec<Log>,
    pub filters: Mutex<Vec<LogFilter>>,
    pub broadcasts: Mutex<Vec<Vec<u8>>>,
}

impl FakeNode {
    pub fn with_token(mut self, contract: &str, balance: u64) -> Self {
        self.token_balances
            .insert(contract.to_lowercase(), U256::from(balance));
        self
    }
}

/// A mined ERC-20 `Transfer` log.
pub(crate) fn transfer_log(contract: &str, from: &str, to: &str, value: u64, block: u64) -> Log {
    Log {
        address: contract.to_lowercase(),
        topics: vec![
            TRANSFER_EVENT_TOPIC.to_string(),
            address_topic(from).unwrap(),
            address_topic(to).unwrap(),
        ],
        data: format!("0x{}", hex::encode(U256::from(value).to_be_bytes::<32>())),
        block_number: Some(format!("{block:#x}")),
        transaction_hash: Some(format!("0x{:064x}", block * 1000 + value)),
    }
}

fn topic_matches(filter: &Option<String>, topic: Option<&String>) -> bool {
    match (filter, topic) {
        (None, _) => true,
        (Some(want), Some(got)) => want.eq_ignore_ascii_case(got),
        (Some(_), None) => false,
    }
}

#[async_trait]
impl EvmRpc for FakeNode {
    async fn block_number(&self) -> Result<u64, EthError> {
        Ok(self.head)
    }

    async fn get_balance(&self, _address: &str) -> Result<U256, EthError> {
        self.native
            .ok_or_else(|| EthError::Network("connection refused".into()))
    }

    async fn call(&self, to: &str, _data: &[u8]) -> Result<Vec<u8>, EthError> {
        self.token_balances
            .get(&to.to_lowercase())
            .map(|b| b.to_be_bytes::<32>().to_vec())
            .ok_or_else(|| EthError::Reverted("execution reverted".into()))
    }

    async fn get_logs(&self, filter: &LogFilter) -> Result<Vec<Log>, EthError> {
        self.filters.lock().unwrap().push(filter.clone());
        Ok(self
            .logs
            .iter()
            .filter(|log| {
                filter
                    .topics
                    .iter()
                    .enumerate()
                    .all(|(i, want)| topic_matches(want, log.topics.get(i)))
            })
            .filter(|log| match log.block_number() {
                Ok(Some(n)) => n >= filter.from_block && n <= filter.to_block,
                _ => true,
            })
            .cloned()
            .collect())
    }

    async fn transaction_count(&self, _address: &str) -> Result<u64, EthError> {
        Ok(0)
    }

    async fn base_fee_per_gas(&self) -> Result<u128, EthError> {
        Ok(1_000_000_000)
    }

    async fn max_priority_fee_per_gas(&self) -> Result<u128, EthError> {
        Ok(100_000_000)
    }

    async fn estimate_gas(&self, request: &CallRequest) -> Result<u64, EthError> {
        Ok(if request.data.is_empty() { 21_000 } else { 65_000 })
    }

    async fn send_raw_transaction(&self, raw_tx: &[u8]) -> Result<String, EthError> {
        let mut broadcasts = self.broadcasts.lock().unwrap();
        broadcasts.push(raw_tx.to_vec());
        Ok(format!("0x{:064x}", broadcasts.len()))
    }
}
