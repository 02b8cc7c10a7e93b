//! RPC endpoint configuration
//!
//! Resolution order:
//! 1. `RPC_URL` environment variable - highest priority
//! 2. `rpc_url` from the config file
//! 3. The public Sepolia endpoint (rate limited)
//!
//! ```bash
//! export RPC_URL="https://eth-sepolia.g.alchemy.com/v2/YOUR_KEY"
//! ```

use super::Config;

/// Environment variable overriding the configured endpoint
pub const RPC_URL_ENV: &str = "RPC_URL";

/// Resolved RPC endpoint for the single supported chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcConfig {
    url: String,
    chain_id: u64,
}

impl RpcConfig {
    /// Resolve from the environment, falling back to the config
    pub fn from_env(config: &Config) -> Self {
        Self::resolve(std::env::var(RPC_URL_ENV).ok(), config)
    }

    /// Resolve from an explicit override value
    pub fn resolve(env_url: Option<String>, config: &Config) -> Self {
        let url = match env_url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
            Some(url) => {
                tracing::debug!("Using {} for the RPC endpoint", RPC_URL_ENV);
                url
            }
            None => {
                if config.rpc_url == super::DEFAULT_RPC_URL {
                    tracing::warn!("No private RPC configured, using public Sepolia RPC (rate limited)");
                }
                config.rpc_url.clone()
            }
        };

        Self {
            url,
            chain_id: config.chain_id,
        }
    }

    /// Create with an explicit URL
    pub fn with_url(url: impl Into<String>, chain_id: u64) -> Self {
        Self {
            url: url.into(),
            chain_id,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }
}
