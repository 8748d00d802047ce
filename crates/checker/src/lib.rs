use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

mod error;

pub use error::CheckError;

/// Snapshot of a chain head
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub number: u64,
    pub timestamp: SystemTime,
}

impl Block {
    pub fn new(number: u64, timestamp: SystemTime) -> Self {
        Self { number, timestamp }
    }

    /// Time elapsed between the block timestamp and `now`.
    /// A timestamp ahead of `now` counts as zero age.
    pub fn age(&self, now: SystemTime) -> Duration {
        now.duration_since(self.timestamp).unwrap_or_default()
    }
}

/// Source of the current chain head
#[async_trait]
pub trait BlockGetter: Send + Sync {
    /// Fetch the latest block known to this source. A single attempt, no retries.
    async fn current_block(&self) -> eyre::Result<Block>;
}

/// Thresholds and block sources used to build a [`Checker`]
#[derive(Clone)]
pub struct Config {
    pub max_block_difference: u64,
    pub max_node_block_age: Duration,

    pub node: Arc<dyn BlockGetter>,
    pub external: Arc<dyn BlockGetter>,
}

/// Rule that produced a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// External block was available, the node is compared against it.
    Divergence,
    /// External block was unavailable, the node block age is checked instead.
    Staleness,
}

/// Outcome of a single health evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthReport {
    pub healthy: bool,
    pub rule: Rule,
    pub node_block: Block,
    pub external_block: Option<Block>,
}

/// Decides whether a node is healthy by comparing its head with an external reference.
pub struct Checker {
    max_block_difference: u64,
    max_node_block_age: Duration,

    node: Arc<dyn BlockGetter>,
    external: Arc<dyn BlockGetter>,
}

impl Checker {
    pub fn new(config: Config) -> Self {
        Self {
            max_block_difference: config.max_block_difference,
            max_node_block_age: config.max_node_block_age,
            node: config.node,
            external: config.external,
        }
    }

    pub async fn is_healthy(&self) -> Result<bool, CheckError> {
        Ok(self.check().await?.healthy)
    }

    pub async fn check(&self) -> Result<HealthReport, CheckError> {
        self.evaluate(SystemTime::now).await
    }

    /// Same as [`Checker::check`] with a fixed current time.
    pub async fn check_at(&self, now: SystemTime) -> Result<HealthReport, CheckError> {
        self.evaluate(move || now).await
    }

    async fn evaluate<F>(&self, now: F) -> Result<HealthReport, CheckError>
    where
        F: FnOnce() -> SystemTime + Send,
    {
        let node_block = self
            .node
            .current_block()
            .await
            .map_err(CheckError::NodeUnavailable)?;

        let report = match self.external.current_block().await {
            Ok(external_block) => HealthReport {
                healthy: self.blocks_in_range(&node_block, &external_block),
                rule: Rule::Divergence,
                node_block,
                external_block: Some(external_block),
            },
            Err(err) => {
                tracing::warn!("could not fetch latest external block: {:#}", err);
                HealthReport {
                    healthy: !self.is_stale(&node_block, now()),
                    rule: Rule::Staleness,
                    node_block,
                    external_block: None,
                }
            }
        };

        tracing::debug!(
            healthy = report.healthy,
            rule = ?report.rule,
            node_block = report.node_block.number,
            external_block = ?report.external_block.map(|b| b.number),
            "evaluated node health"
        );

        Ok(report)
    }

    fn blocks_in_range(&self, node: &Block, external: &Block) -> bool {
        // node ahead of the external source is always in range
        external.number.saturating_sub(node.number) <= self.max_block_difference
    }

    fn is_stale(&self, node: &Block, now: SystemTime) -> bool {
        node.age(now) > self.max_node_block_age
    }
}
