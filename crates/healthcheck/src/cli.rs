use crate::EthereumBlockGetter;
use checker::{Checker, Config};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "healthcheck")]
#[command(about = "Ethereum node health check server", long_about = None)]
pub struct Cli {
    /// URL of the node to be monitored
    #[arg(long, env = "NODE_URL")]
    pub node_url: Url,

    /// URL of the node used for block comparison
    #[arg(long, env = "EXTERNAL_NODE_URL")]
    pub external_node_url: Url,

    /// Number of blocks the node may lag behind the external node
    #[arg(long, env = "MAX_BLOCK_DIFFERENCE", default_value_t = 3)]
    pub max_block_difference: u64,

    /// Maximum age of the node head when the external node is unreachable
    #[arg(
        long,
        env = "MAX_BLOCK_AGE",
        default_value = "30s",
        value_parser = humantime::parse_duration
    )]
    pub max_node_block_age: Duration,

    /// Server bind address
    #[arg(long, env = "LISTEN", default_value = "127.0.0.1:8080")]
    pub listen: SocketAddr,

    /// Timeout for each RPC request
    #[arg(
        long,
        env = "REQUEST_TIMEOUT",
        default_value = "10s",
        value_parser = humantime::parse_duration
    )]
    pub request_timeout: Duration,
}

impl Cli {
    pub fn checker(&self) -> eyre::Result<Checker> {
        let node = EthereumBlockGetter::new(self.node_url.as_str(), self.request_timeout)?;
        let external =
            EthereumBlockGetter::new(self.external_node_url.as_str(), self.request_timeout)?;

        Ok(Checker::new(Config {
            max_block_difference: self.max_block_difference,
            max_node_block_age: self.max_node_block_age,
            node: Arc::new(node),
            external: Arc::new(external),
        }))
    }
}
