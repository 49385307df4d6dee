//! Configuration types.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::ConfigError;

/// Mumbai Testnet.
pub const DEFAULT_CHAIN_ID: u64 = 80001;

/// Chains the UI knows a display name for.
pub const CHAIN_NAMES: &[(u64, &str)] = &[
    (1, "Ethereum Mainnet"),
    (5, "Goerli Testnet"),
    (11155111, "Sepolia Testnet"),
    (80001, "Mumbai Testnet"),
    (137, "Polygon Mainnet"),
];

/// Display name for a chain id, if known.
pub fn chain_name(chain_id: u64) -> Option<&'static str> {
    CHAIN_NAMES
        .iter()
        .find(|(id, _)| *id == chain_id)
        .map(|(_, name)| *name)
}

/// A token the donation contract accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub address: String,
    pub decimals: u32,
}

/// Network and contract settings for the wallet context.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// The single chain donations must happen on.
    pub required_chain_id: u64,
    /// Address of the donation contract.
    pub contract_address: String,
    /// Token table keyed by symbol.
    pub tokens: BTreeMap<String, TokenInfo>,
    /// Upper bound on any single gateway call.
    pub operation_timeout: Duration,
}

impl NetworkConfig {
    pub fn required_chain_name(&self) -> String {
        chain_name(self.required_chain_id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("chain {}", self.required_chain_id))
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        let mut tokens = BTreeMap::new();
        tokens.insert(
            "ETH".to_string(),
            TokenInfo {
                address: "0x0000000000000000000000000000000000000000".to_string(),
                decimals: 18,
            },
        );
        tokens.insert(
            "USDC".to_string(),
            TokenInfo {
                address: "0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174".to_string(),
                decimals: 6,
            },
        );
        tokens.insert(
            "DAI".to_string(),
            TokenInfo {
                address: "0x8f3Cf7ad23Cd3CaDbD9735AFf958023239c6A063".to_string(),
                decimals: 18,
            },
        );
        Self {
            required_chain_id: DEFAULT_CHAIN_ID,
            contract_address: "0x0000000000000000000000000000000000000000".to_string(),
            tokens,
            operation_timeout: Duration::from_secs(60),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP port for the API server.
    pub port: u16,
    /// Gateway prefix for building proof URLs from content ids.
    pub ipfs_gateway: String,
    /// Latency of the simulated wallet and storage gateways.
    pub simulated_delay: Duration,
    /// How many toasts the notification queue keeps.
    pub toast_history: usize,
    pub network: NetworkConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            ipfs_gateway: "https://ipfs.io/ipfs/".to_string(),
            simulated_delay: Duration::from_millis(1500),
            toast_history: 50,
            network: NetworkConfig::default(),
        }
    }
}

impl AppConfig {
    /// Build a config from `FMD_*` environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(port) = lookup("FMD_PORT") {
            config.port = parse_var("FMD_PORT", &port)?;
        }
        if let Some(chain) = lookup("FMD_CHAIN_ID") {
            config.network.required_chain_id = parse_var("FMD_CHAIN_ID", &chain)?;
        }
        if let Some(gateway) = lookup("FMD_IPFS_GATEWAY") {
            if gateway.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "FMD_IPFS_GATEWAY".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
            config.ipfs_gateway = gateway;
        }
        if let Some(delay) = lookup("FMD_SIM_DELAY_MS") {
            config.simulated_delay = Duration::from_millis(parse_var("FMD_SIM_DELAY_MS", &delay)?);
        }
        if let Some(timeout) = lookup("FMD_OP_TIMEOUT_SECS") {
            let secs: u64 = parse_var("FMD_OP_TIMEOUT_SECS", &timeout)?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "FMD_OP_TIMEOUT_SECS".to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
            config.network.operation_timeout = Duration::from_secs(secs);
        }
        if let Some(contract) = lookup("FMD_CONTRACT_ADDRESS") {
            config.network.contract_address = contract;
        }

        Ok(config)
    }

    /// Public URL for a stored proof.
    pub fn proof_url(&self, cid: &str) -> String {
        format!("{}{}", self.ipfs_gateway, cid)
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("{raw:?}: {e}"),
    })
}
