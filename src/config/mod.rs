//! Configuration for the R2USD automation bot

pub mod proxy;
pub mod rpc;

use crate::amount::Amount;
use crate::tokens::SEPOLIA_CHAIN_ID;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

// Re-exports
pub use proxy::ProxyConfig;
pub use rpc::RpcConfig;

/// Default public Sepolia endpoint
pub const DEFAULT_RPC_URL: &str = "https://ethereum-sepolia-rpc.publicnode.com";

/// Default explorer prefix for transaction links
pub const DEFAULT_EXPLORER_TX_BASE: &str = "https://sepolia.etherscan.io/tx";

/// Default proxy list location
pub const DEFAULT_PROXIES_FILE: &str = "proxies.txt";

/// Which per-operation gas limit applies to a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasLimitKind {
    Approval,
    Swap,
    Stake,
}

/// Per-operation gas limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasLimits {
    pub approval: u64,
    pub swap: u64,
    pub stake: u64,
}

impl Default for GasLimits {
    fn default() -> Self {
        Self {
            approval: 100_000,
            swap: 500_000,
            stake: 100_000,
        }
    }
}

/// Fee and gas-limit settings applied to every submitted transaction
///
/// Owned by the operator loop and lent to each batch. Only
/// [`GasSettings::apply`] mutates it, and only between batches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasSettings {
    /// Max fee per gas (gwei)
    pub max_fee_gwei: Amount,
    /// Max priority fee per gas (gwei)
    pub priority_fee_gwei: Amount,
    pub limits: GasLimits,
}

impl Default for GasSettings {
    fn default() -> Self {
        Self {
            max_fee_gwei: Amount::from(50),
            priority_fee_gwei: Amount::from(2),
            limits: GasLimits::default(),
        }
    }
}

/// Partial update entered by the operator; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GasSettingsUpdate {
    pub max_fee_gwei: Option<Amount>,
    pub priority_fee_gwei: Option<Amount>,
    pub approval_limit: Option<u64>,
    pub swap_limit: Option<u64>,
    pub stake_limit: Option<u64>,
}

impl GasSettings {
    pub fn limit(&self, kind: GasLimitKind) -> u64 {
        match kind {
            GasLimitKind::Approval => self.limits.approval,
            GasLimitKind::Swap => self.limits.swap,
            GasLimitKind::Stake => self.limits.stake,
        }
    }

    /// Merge an update, ignoring zero values
    pub fn apply(&mut self, update: GasSettingsUpdate) {
        if let Some(fee) = update.max_fee_gwei.filter(|f| !f.is_zero()) {
            self.max_fee_gwei = fee;
        }
        if let Some(fee) = update.priority_fee_gwei.filter(|f| !f.is_zero()) {
            self.priority_fee_gwei = fee;
        }
        if let Some(limit) = update.approval_limit.filter(|l| *l > 0) {
            self.limits.approval = limit;
        }
        if let Some(limit) = update.swap_limit.filter(|l| *l > 0) {
            self.limits.swap = limit;
        }
        if let Some(limit) = update.stake_limit.filter(|l| *l > 0) {
            self.limits.stake = limit;
        }

        tracing::info!(
            max_fee_gwei = %self.max_fee_gwei,
            priority_fee_gwei = %self.priority_fee_gwei,
            approval_limit = self.limits.approval,
            swap_limit = self.limits.swap,
            stake_limit = self.limits.stake,
            "Gas settings updated"
        );
    }
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// JSON-RPC endpoint (overridden by RPC_URL)
    pub rpc_url: String,
    /// Expected chain id of the endpoint
    pub chain_id: u64,
    /// Prefix for transaction explorer links
    pub explorer_tx_base: String,
    /// Optional proxy list, one proxy per line
    pub proxies_file: Option<String>,
    /// Initial gas settings
    #[serde(default)]
    pub gas: GasSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            chain_id: SEPOLIA_CHAIN_ID,
            explorer_tx_base: DEFAULT_EXPLORER_TX_BASE.to_string(),
            proxies_file: Some(DEFAULT_PROXIES_FILE.to_string()),
            gas: GasSettings::default(),
        }
    }
}

impl Config {
    /// Load a JSON config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Explorer link for a transaction hash
    pub fn tx_link(&self, hash: &impl std::fmt::Display) -> String {
        format!("{}/{}", self.explorer_tx_base.trim_end_matches('/'), hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_gas_settings() {
        let gas = GasSettings::default();
        assert_eq!(gas.max_fee_gwei.to_string(), "50");
        assert_eq!(gas.priority_fee_gwei.to_string(), "2");
        assert_eq!(gas.limit(GasLimitKind::Approval), 100_000);
        assert_eq!(gas.limit(GasLimitKind::Swap), 500_000);
        assert_eq!(gas.limit(GasLimitKind::Stake), 100_000);
    }

    #[test]
    fn test_apply_partial_update() {
        let mut gas = GasSettings::default();
        gas.apply(GasSettingsUpdate {
            max_fee_gwei: Some("75.5".parse().unwrap()),
            swap_limit: Some(650_000),
            ..Default::default()
        });

        assert_eq!(gas.max_fee_gwei.to_string(), "75.5");
        assert_eq!(gas.priority_fee_gwei.to_string(), "2");
        assert_eq!(gas.limits.swap, 650_000);
        assert_eq!(gas.limits.stake, 100_000);
    }

    #[test]
    fn test_apply_ignores_zero_values() {
        let mut gas = GasSettings::default();
        gas.apply(GasSettingsUpdate {
            priority_fee_gwei: Some(Amount::zero()),
            approval_limit: Some(0),
            ..Default::default()
        });
        assert_eq!(gas, GasSettings::default());
    }

    #[test]
    fn test_config_deserialize_defaults_gas() {
        let value = serde_json::json!({
            "rpc_url": "http://localhost:8545",
            "chain_id": 11155111,
            "explorer_tx_base": "https://sepolia.etherscan.io/tx",
            "proxies_file": null
        });
        let parsed: Config = serde_json::from_value(value).expect("parse config");
        assert_eq!(parsed.gas, GasSettings::default());
        assert!(parsed.proxies_file.is_none());
    }

    #[test]
    fn test_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "rpc_url": "http://localhost:8545",
                "chain_id": 31337,
                "explorer_tx_base": "https://example.org/tx/",
                "proxies_file": "proxies.txt",
                "gas": {{
                    "max_fee_gwei": "12",
                    "priority_fee_gwei": "1.5",
                    "limits": {{ "approval": 60000, "swap": 400000, "stake": 90000 }}
                }}
            }}"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.chain_id, 31337);
        assert_eq!(config.gas.priority_fee_gwei.to_string(), "1.5");
        assert_eq!(config.gas.limits.approval, 60_000);
        assert_eq!(config.tx_link(&"0xabc"), "https://example.org/tx/0xabc");
    }

    #[test]
    fn test_config_from_missing_file() {
        let err = Config::from_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
