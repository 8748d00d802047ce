use async_trait::async_trait;
use checker::{Block, BlockGetter};
use eyre::WrapErr;
use serde::Deserialize;
use serde_json::json;
use std::time::{Duration, SystemTime};

/// Block source backed by an Ethereum execution client JSON-RPC endpoint (Geth, Reth, etc.)
pub struct EthereumBlockGetter {
    rpc_url: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct RpcBlock {
    number: String,
    timestamp: String,
}

impl EthereumBlockGetter {
    /// Every RPC request made by this getter is bounded by `timeout`.
    pub fn new(rpc_url: impl Into<String>, timeout: Duration) -> eyre::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .wrap_err("could not build RPC client")?;

        Ok(Self {
            rpc_url: rpc_url.into(),
            client,
        })
    }

    async fn rpc_call(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> eyre::Result<serde_json::Value> {
        let response = self
            .client
            .post(&self.rpc_url)
            .json(&json!({
                "jsonrpc": "2.0",
                "method": method,
                "params": params,
                "id": 1
            }))
            .send()
            .await?
            .error_for_status()?;

        let json: serde_json::Value = response.json().await?;

        if let Some(error) = json.get("error") {
            return Err(eyre::eyre!("RPC error: {}", error));
        }

        json.get("result")
            .cloned()
            .ok_or_else(|| eyre::eyre!("No result in RPC response"))
    }
}

#[async_trait]
impl BlockGetter for EthereumBlockGetter {
    async fn current_block(&self) -> eyre::Result<Block> {
        let result = self
            .rpc_call("eth_getBlockByNumber", json!(["latest", false]))
            .await?;

        if result.is_null() {
            return Err(eyre::eyre!("node returned no latest block"));
        }

        let block: RpcBlock =
            serde_json::from_value(result).wrap_err("unexpected block format")?;

        let number = parse_quantity(&block.number)?;
        let secs = parse_quantity(&block.timestamp)?;
        let timestamp = SystemTime::UNIX_EPOCH
            .checked_add(Duration::from_secs(secs))
            .ok_or_else(|| eyre::eyre!("block timestamp {:?} out of range", block.timestamp))?;

        Ok(Block::new(number, timestamp))
    }
}

/// Parse a JSON-RPC hex quantity such as "0x1b4"
pub fn parse_quantity(value: &str) -> eyre::Result<u64> {
    let digits = value
        .strip_prefix("0x")
        .ok_or_else(|| eyre::eyre!("quantity {:?} is missing the 0x prefix", value))?;

    if digits.is_empty() {
        return Err(eyre::eyre!("quantity {:?} has no digits", value));
    }

    u64::from_str_radix(digits, 16).wrap_err_with(|| format!("invalid quantity {:?}", value))
}
