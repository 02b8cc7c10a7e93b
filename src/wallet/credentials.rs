//! Private key discovery
//!
//! Every environment entry whose name starts with `PRIVATE_KEY_` is a
//! candidate. Entries are ordered by variable name so account numbering is
//! stable between runs.

use crate::{Error, Result};
use secrecy::SecretString;

pub const PRIVATE_KEY_PREFIX: &str = "PRIVATE_KEY_";

/// 32-byte hex key, optional `0x`
pub fn is_valid_private_key(key: &str) -> bool {
    let hex = key.strip_prefix("0x").unwrap_or(key);
    hex.len() == 64 && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// Collect valid keys from `(name, value)` pairs.
///
/// Returns `Error::Config` when no valid key is found.
pub fn private_keys_from_vars<I>(vars: I) -> Result<Vec<SecretString>>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut candidates: Vec<(String, String)> = vars
        .into_iter()
        .filter(|(name, _)| name.starts_with(PRIVATE_KEY_PREFIX))
        .collect();
    candidates.sort_by(|a, b| a.0.cmp(&b.0));

    let mut keys = Vec::new();
    for (name, value) in candidates {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        if !is_valid_private_key(value) {
            let preview: String = value.chars().take(6).collect();
            tracing::error!(var = %name, "Invalid private key format: {}...", preview);
            continue;
        }
        keys.push(SecretString::from(value.to_string()));
    }

    if keys.is_empty() {
        return Err(Error::Config(format!(
            "No valid private keys found. Set {}1=... in your environment or .env file",
            PRIVATE_KEY_PREFIX
        )));
    }

    tracing::info!(count = keys.len(), "Loaded private keys");
    Ok(keys)
}

/// Collect valid keys from the process environment
pub fn private_keys_from_env() -> Result<Vec<SecretString>> {
    private_keys_from_vars(std::env::vars())
}
