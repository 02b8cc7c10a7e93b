//! Chain access
//!
//! Every component talks to the network through [`ChainClient`], one client
//! per account. The production client wraps an alloy provider; tests use an
//! in-memory chain.

#[cfg(test)]
pub(crate) mod mock;
mod rpc;

pub use rpc::{connect_accounts, RpcChainClient};

use crate::config::{Config, GasSettings};
use crate::gas::{self, FeeParams};
use crate::tokens::Token;
use crate::wallet::PreparedTransaction;
use crate::{Error, Result};
use alloy::primitives::{Address, Bytes, TxHash, U256};
use async_trait::async_trait;
use std::sync::Arc;

/// Final status of a mined transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptStatus {
    Success,
    Reverted,
}

/// Chain operations needed by one account
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Address of the account this client signs for
    fn address(&self) -> Address;

    fn chain_id(&self) -> u64;

    async fn native_balance(&self) -> Result<U256>;

    async fn token_balance(&self, token: Token) -> Result<U256>;

    async fn token_decimals(&self, token: Token) -> Result<u8>;

    async fn allowance(&self, token: Token, spender: Address) -> Result<U256>;

    /// Network fee suggestion
    async fn fee_hints(&self) -> Result<FeeParams>;

    /// Sign and broadcast
    async fn submit(&self, tx: PreparedTransaction) -> Result<TxHash>;

    /// Block until the transaction is mined
    async fn wait_for_receipt(&self, hash: TxHash) -> Result<ReceiptStatus>;
}

/// A numbered account with its own connection
#[derive(Clone)]
pub struct Account {
    /// 1-based position in load order
    pub number: usize,
    pub client: Arc<dyn ChainClient>,
}

impl Account {
    pub fn new(number: usize, client: Arc<dyn ChainClient>) -> Self {
        Self { number, client }
    }

    pub fn address(&self) -> Address {
        self.client.address()
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("number", &self.number)
            .field("address", &self.address())
            .finish()
    }
}

/// Submit a call with the configured fees and wait for it to be mined.
///
/// A reverted receipt is an error.
pub async fn send_and_confirm(
    client: &dyn ChainClient,
    to: Address,
    data: Bytes,
    gas_limit: u64,
    gas: &GasSettings,
    config: &Config,
) -> Result<TxHash> {
    let fees = gas::resolve_fees(client, gas).await?;
    let tx = PreparedTransaction {
        to,
        data,
        value: U256::ZERO,
        gas_limit,
        chain_id: client.chain_id(),
        max_fee_per_gas: fees.max_fee_per_gas,
        max_priority_fee_per_gas: fees.max_priority_fee_per_gas,
    };

    let hash = client.submit(tx).await?;
    tracing::info!(hash = %hash, "Transaction sent: {}", config.tx_link(&hash));

    match client.wait_for_receipt(hash).await? {
        ReceiptStatus::Success => Ok(hash),
        ReceiptStatus::Reverted => Err(Error::Reverted {
            hash: hash.to_string(),
        }),
    }
}
