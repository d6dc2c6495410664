// Library exports for lottery_deployer

pub mod chain;
pub mod config;

// Re-export main types for convenience
pub use chain::{ChainClient, ChainError, ClientConfig, ContractSession, GasMode, GasPrice, Signer};
pub use config::Config;
