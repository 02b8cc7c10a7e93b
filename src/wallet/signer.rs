//! Account signer
//!
//! Keys live only inside alloy's `PrivateKeySigner`. They are never
//! serialized and never logged; `Debug` is redacted.

use crate::{Error, Result};
use alloy::network::EthereumWallet;
use alloy::primitives::{Address, Bytes, U256};
use alloy::signers::local::PrivateKeySigner;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

/// A fully specified EIP-1559 transaction, ready for the provider to sign
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreparedTransaction {
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
    pub gas_limit: u64,
    pub chain_id: u64,
    /// Wei
    pub max_fee_per_gas: u128,
    /// Wei
    pub max_priority_fee_per_gas: u128,
}

/// Signing identity for one account
pub struct SecureWallet {
    address: Address,
    wallet: EthereumWallet,
}

impl SecureWallet {
    /// Create a wallet from a secret hex key
    pub fn from_secret(key: &SecretString) -> Result<Self> {
        Self::from_hex(key.expose_secret())
    }

    /// Create a wallet from a hex-encoded private key, with or without `0x`
    pub fn from_hex(key_hex: &str) -> Result<Self> {
        let key_hex = key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| Error::Wallet(format!("Invalid private key: {}", e)))?;

        let address = signer.address();
        Ok(Self {
            address,
            wallet: EthereumWallet::from(signer),
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Checksummed address string
    pub fn address_string(&self) -> String {
        self.address.to_checksum(None)
    }

    /// Wallet handle for alloy providers; exposes signing only
    pub fn wallet(&self) -> &EthereumWallet {
        &self.wallet
    }
}

impl std::fmt::Debug for SecureWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureWallet")
            .field("address", &self.address)
            .field("signer", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known local devnet key, never funded on a public chain
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_wallet_from_hex() {
        let wallet = SecureWallet::from_hex(TEST_KEY).unwrap();
        assert_eq!(
            wallet.address_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_wallet_from_secret_without_prefix() {
        let secret = SecretString::from(TEST_KEY.trim_start_matches("0x").to_string());
        let wallet = SecureWallet::from_secret(&secret).unwrap();
        assert_eq!(
            wallet.address(),
            SecureWallet::from_hex(TEST_KEY).unwrap().address()
        );
    }

    #[test]
    fn test_invalid_key_is_wallet_error() {
        let err = SecureWallet::from_hex("0x1234").unwrap_err();
        assert!(matches!(err, Error::Wallet(_)));
    }

    #[test]
    fn test_debug_redacts_key() {
        let wallet = SecureWallet::from_hex(TEST_KEY).unwrap();
        let debug_str = format!("{:?}", wallet);

        assert!(!debug_str.contains("ac0974bec"));
        assert!(debug_str.contains("[REDACTED]"));
    }
}
