use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::chain::gas::{validate_gas_adjustment, GasPrice, DEFAULT_GAS_ADJUSTMENT};
use crate::chain::wallet::{COSMOS_COIN_TYPE, DEFAULT_PREFIX};
use crate::chain::ClientConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub chain: ChainConfig,
    #[serde(default)]
    pub contract: ContractConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    pub grpc_endpoint: String,
    pub chain_id: String,
    #[serde(default = "default_prefix")]
    pub address_prefix: String,
    #[serde(default = "default_coin_type")]
    pub coin_type: u32,
    /// Amount and denom, e.g. "0.001orai"
    pub gas_price: String,
    #[serde(default = "default_gas_adjustment")]
    pub gas_adjustment: f64,
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    /// Seconds to wait for a broadcast transaction to be included
    #[serde(default = "default_broadcast_timeout")]
    pub broadcast_timeout: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

// Note: the mnemonic is provided via the MNEMONIC environment variable only.
// Never store sensitive keys in config files!
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractConfig {
    /// Deployed lottery-operations contract
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub lottery_contract: String,
    #[serde(default)]
    pub oraiswap_router: String,
    #[serde(default = "default_label")]
    pub label: String,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            lottery_contract: String::new(),
            oraiswap_router: String::new(),
            label: default_label(),
        }
    }
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_coin_type() -> u32 {
    COSMOS_COIN_TYPE
}

fn default_gas_adjustment() -> f64 {
    DEFAULT_GAS_ADJUSTMENT
}

fn default_connection_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    30
}

fn default_broadcast_timeout() -> u64 {
    60
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_label() -> String {
    "lottery-operations".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chain: ChainConfig {
                grpc_endpoint: "https://grpc.orai.io".to_string(),
                chain_id: "Oraichain".to_string(),
                address_prefix: default_prefix(),
                coin_type: default_coin_type(),
                gas_price: "0.001orai".to_string(),
                gas_adjustment: default_gas_adjustment(),
                connection_timeout: default_connection_timeout(),
                request_timeout: default_request_timeout(),
                broadcast_timeout: default_broadcast_timeout(),
                poll_interval_ms: default_poll_interval_ms(),
            },
            contract: ContractConfig::default(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise start from the defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Overrides from GRPC_ENDPOINT, GAS_PRICE and CONTRACT_ADDRESS
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(endpoint) = non_empty("GRPC_ENDPOINT") {
            self.chain.grpc_endpoint = endpoint;
        }
        if let Some(gas_price) = non_empty("GAS_PRICE") {
            self.chain.gas_price = gas_price;
        }
        if let Some(address) = non_empty("CONTRACT_ADDRESS") {
            self.contract.address = address;
        }
    }

    pub fn gas_price(&self) -> Result<GasPrice> {
        self.chain
            .gas_price
            .parse::<GasPrice>()
            .with_context(|| format!("parsing gas price '{}'", self.chain.gas_price))
    }

    pub fn client_config(&self) -> Result<ClientConfig> {
        Ok(ClientConfig {
            grpc_endpoint: self.chain.grpc_endpoint.clone(),
            chain_id: self.chain.chain_id.clone(),
            gas_price: self.gas_price()?,
            gas_adjustment: validate_gas_adjustment(self.chain.gas_adjustment)
                .context("invalid [chain].gas_adjustment")?,
            connection_timeout: self.chain.connection_timeout,
            request_timeout: self.chain.request_timeout,
            broadcast_timeout: self.chain.broadcast_timeout,
            poll_interval_ms: self.chain.poll_interval_ms,
        })
    }
}
