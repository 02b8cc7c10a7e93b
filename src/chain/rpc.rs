//! JSON-RPC chain client backed by an alloy provider

use super::{Account, ChainClient, ReceiptStatus};
use crate::config::proxy::{proxy_for, ProxyConfig};
use crate::config::RpcConfig;
use crate::gas::FeeParams;
use crate::tokens::{Token, IERC20};
use crate::wallet::{PreparedTransaction, SecureWallet};
use crate::{Error, Result};
use alloy::network::{ReceiptResponse, TransactionBuilder};
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder};
use alloy::rpc::client::RpcClient;
use alloy::rpc::types::TransactionRequest;
use alloy::transports::http::Http;
use async_trait::async_trait;
use secrecy::SecretString;
use std::sync::Arc;

/// Signing client for one account on one endpoint
pub struct RpcChainClient {
    provider: DynProvider,
    address: Address,
    chain_id: u64,
}

impl RpcChainClient {
    /// Connect through an optional proxy and verify the endpoint's chain id
    pub async fn connect(
        rpc: &RpcConfig,
        wallet: &SecureWallet,
        proxy: Option<&ProxyConfig>,
    ) -> Result<Self> {
        let url: url::Url = rpc
            .url()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid RPC URL: {}", e)))?;

        let mut http = reqwest::Client::builder();
        if let Some(proxy) = proxy {
            http = http.proxy(proxy.to_reqwest()?);
        }
        let transport = Http::with_client(http.build()?, url);

        let provider = ProviderBuilder::new()
            .wallet(wallet.wallet().clone())
            .connect_client(RpcClient::new(transport, false))
            .erased();

        let chain_id = provider
            .get_chain_id()
            .await
            .map_err(|e| Error::Rpc(format!("Failed to get chain id: {}", e)))?;
        if chain_id != rpc.chain_id() {
            return Err(Error::Config(format!(
                "RPC endpoint is on chain {} but chain {} is required",
                chain_id,
                rpc.chain_id()
            )));
        }

        Ok(Self {
            provider,
            address: wallet.address(),
            chain_id,
        })
    }
}

#[async_trait]
impl ChainClient for RpcChainClient {
    fn address(&self) -> Address {
        self.address
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn native_balance(&self) -> Result<U256> {
        self.provider
            .get_balance(self.address)
            .await
            .map_err(|e| Error::Rpc(format!("Failed to get balance: {}", e)))
    }

    async fn token_balance(&self, token: Token) -> Result<U256> {
        IERC20::new(token.address(), &self.provider)
            .balanceOf(self.address)
            .call()
            .await
            .map_err(|e| Error::Rpc(format!("Failed to get {} balance: {}", token, e)))
    }

    async fn token_decimals(&self, token: Token) -> Result<u8> {
        IERC20::new(token.address(), &self.provider)
            .decimals()
            .call()
            .await
            .map_err(|e| Error::Rpc(format!("Failed to get {} decimals: {}", token, e)))
    }

    async fn allowance(&self, token: Token, spender: Address) -> Result<U256> {
        IERC20::new(token.address(), &self.provider)
            .allowance(self.address, spender)
            .call()
            .await
            .map_err(|e| Error::Rpc(format!("Failed to get {} allowance: {}", token, e)))
    }

    async fn fee_hints(&self) -> Result<FeeParams> {
        let estimate = self
            .provider
            .estimate_eip1559_fees()
            .await
            .map_err(|e| Error::Rpc(format!("Fee estimation failed: {}", e)))?;

        Ok(FeeParams {
            max_fee_per_gas: estimate.max_fee_per_gas,
            max_priority_fee_per_gas: estimate.max_priority_fee_per_gas,
        })
    }

    async fn submit(&self, tx: PreparedTransaction) -> Result<TxHash> {
        let request = TransactionRequest::default()
            .with_from(self.address)
            .with_to(tx.to)
            .with_input(tx.data)
            .with_value(tx.value)
            .with_gas_limit(tx.gas_limit)
            .with_chain_id(tx.chain_id)
            .with_max_fee_per_gas(tx.max_fee_per_gas)
            .with_max_priority_fee_per_gas(tx.max_priority_fee_per_gas);

        let pending = self
            .provider
            .send_transaction(request)
            .await
            .map_err(|e| Error::Rpc(format!("Failed to send transaction: {}", e)))?;
        Ok(*pending.tx_hash())
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> Result<ReceiptStatus> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), hash)
            .get_receipt()
            .await
            .map_err(|e| Error::Rpc(format!("Failed to get receipt for {}: {}", hash, e)))?;

        Ok(if ReceiptResponse::status(&receipt) {
            ReceiptStatus::Success
        } else {
            ReceiptStatus::Reverted
        })
    }
}

/// Build one connected account per key, in key order.
///
/// Accounts that fail to initialize are logged and skipped.
pub async fn connect_accounts(
    keys: &[SecretString],
    rpc: &RpcConfig,
    proxies: &[ProxyConfig],
) -> Vec<Account> {
    let mut accounts = Vec::with_capacity(keys.len());

    for (index, key) in keys.iter().enumerate() {
        let wallet = match SecureWallet::from_secret(key) {
            Ok(wallet) => wallet,
            Err(e) => {
                tracing::error!(key_index = index + 1, error = %e, "Failed to load wallet");
                continue;
            }
        };

        let proxy = proxy_for(proxies, index);
        match RpcChainClient::connect(rpc, &wallet, proxy).await {
            Ok(client) => {
                match proxy {
                    Some(proxy) => tracing::info!(
                        address = %wallet.address_string(),
                        proxy = %proxy,
                        "Wallet initialized"
                    ),
                    None => tracing::info!(address = %wallet.address_string(), "Wallet initialized"),
                }
                accounts.push(Account::new(accounts.len() + 1, Arc::new(client)));
            }
            Err(e) => tracing::error!(
                address = %wallet.address_string(),
                error = %e,
                "Failed to connect wallet"
            ),
        }
    }

    accounts
}
