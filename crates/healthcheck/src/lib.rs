pub mod cli;
pub mod ethereum;
pub mod server;

pub use cli::Cli;
pub use ethereum::EthereumBlockGetter;
pub use server::HealthServer;
