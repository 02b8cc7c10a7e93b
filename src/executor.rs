//! Swap and stake actions
//!
//! Each action checks the input balance, ensures the endpoint's allowance,
//! submits the call and waits for it to be mined. Failures never escape as
//! errors: they are logged and reported as [`Outcome::Failed`].

use crate::allowance::ensure_allowance;
use crate::amount::Amount;
use crate::balance::token_balance;
use crate::calldata::ContractCall;
use crate::chain::{self, ChainClient};
use crate::config::{Config, GasSettings};
use crate::tokens::ContractEndpoint;
use crate::{Error, Result};
use alloy::primitives::TxHash;

/// Result of one action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failed,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

impl From<bool> for Outcome {
    fn from(ok: bool) -> Self {
        if ok {
            Outcome::Success
        } else {
            Outcome::Failed
        }
    }
}

/// Runs swap and stake actions for any account
#[derive(Debug, Clone)]
pub struct ActionExecutor {
    config: Config,
}

impl ActionExecutor {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// USDC to R2USD
    pub async fn swap_in(&self, client: &dyn ChainClient, amount: &Amount, gas: &GasSettings) -> Outcome {
        self.execute(client, ContractEndpoint::SwapAToB, amount, gas).await
    }

    /// R2USD to USDC
    pub async fn swap_out(&self, client: &dyn ChainClient, amount: &Amount, gas: &GasSettings) -> Outcome {
        self.execute(client, ContractEndpoint::SwapBToA, amount, gas).await
    }

    /// R2USD to sR2USD
    pub async fn stake(&self, client: &dyn ChainClient, amount: &Amount, gas: &GasSettings) -> Outcome {
        self.execute(client, ContractEndpoint::StakeB, amount, gas).await
    }

    pub async fn execute(
        &self,
        client: &dyn ChainClient,
        endpoint: ContractEndpoint,
        amount: &Amount,
        gas: &GasSettings,
    ) -> Outcome {
        tracing::info!(
            address = %client.address(),
            amount = %amount,
            "Starting {}", endpoint.describe()
        );

        match self.try_execute(client, endpoint, amount, gas).await {
            Ok(hash) => {
                tracing::info!(
                    address = %client.address(),
                    hash = %hash,
                    "Successfully completed {} of {} {}",
                    endpoint.describe(),
                    amount,
                    endpoint.input_token()
                );
                Outcome::Success
            }
            Err(e) => {
                tracing::error!(
                    address = %client.address(),
                    amount = %amount,
                    error = %e,
                    "{} failed", endpoint.describe()
                );
                Outcome::Failed
            }
        }
    }

    async fn try_execute(
        &self,
        client: &dyn ChainClient,
        endpoint: ContractEndpoint,
        amount: &Amount,
        gas: &GasSettings,
    ) -> Result<TxHash> {
        let input = endpoint.input_token();
        let output = endpoint.output_token();

        let balance = token_balance(client, input).await;
        tracing::info!(address = %client.address(), "Current {} balance: {}", input, balance);

        if !balance.covers(amount)? {
            return Err(Error::InsufficientBalance {
                token: input.symbol().to_string(),
                available: balance.to_string(),
                required: amount.to_string(),
            });
        }

        ensure_allowance(client, input, endpoint.address(), amount, gas, &self.config).await?;

        let call = ContractCall::for_endpoint(endpoint, client.address(), amount, balance.decimals)?;
        let hash = chain::send_and_confirm(
            client,
            endpoint.address(),
            call.encode(),
            gas.limit(endpoint.gas_kind()),
            gas,
            &self.config,
        )
        .await?;

        let input_after = token_balance(client, input).await;
        let output_after = token_balance(client, output).await;
        tracing::info!(
            address = %client.address(),
            "New balances: {} {}, {} {}",
            input_after,
            input,
            output_after,
            output
        );

        Ok(hash)
    }
}
