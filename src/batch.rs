//! Repeated actions across accounts
//!
//! Batches run strictly one transaction at a time: every repetition for the
//! first account, then every repetition for the next. A failed repetition is
//! logged and the batch moves on.

use crate::amount::Amount;
use crate::balance::{render_table, BalanceSnapshot};
use crate::chain::Account;
use crate::config::GasSettings;
use crate::executor::{ActionExecutor, Outcome};
use crate::sequence::auto_sequence;
use alloy::primitives::Address;
use async_trait::async_trait;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SwapIn,
    SwapOut,
    Stake,
    Auto,
    /// Print balances; ignores the amount
    Balances,
}

impl Action {
    /// Token the operator enters an amount of
    pub fn input_symbol(&self) -> &'static str {
        match self {
            Action::SwapIn | Action::Auto => "USDC",
            Action::SwapOut | Action::Stake => "R2USD",
            Action::Balances => "",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::SwapIn => "USDC to R2USD swap",
            Action::SwapOut => "R2USD to USDC swap",
            Action::Stake => "staking transaction",
            Action::Auto => "auto sequence",
            Action::Balances => "balance check",
        })
    }
}

/// Runs one action for one account
#[async_trait]
pub trait ActionRunner: Send + Sync {
    async fn run(&self, account: &Account, action: Action, amount: &Amount, gas: &GasSettings) -> Outcome;
}

#[async_trait]
impl ActionRunner for ActionExecutor {
    async fn run(&self, account: &Account, action: Action, amount: &Amount, gas: &GasSettings) -> Outcome {
        let client = account.client.as_ref();
        match action {
            Action::SwapIn => self.swap_in(client, amount, gas).await,
            Action::SwapOut => self.swap_out(client, amount, gas).await,
            Action::Stake => self.stake(client, amount, gas).await,
            Action::Auto => auto_sequence(self, client, amount, gas).await,
            Action::Balances => {
                let snapshot = BalanceSnapshot::read(client).await;
                println!("{}", render_table(&[snapshot]));
                Outcome::Success
            }
        }
    }
}

/// Per-wallet tally
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletReport {
    pub address: Address,
    pub attempts: u32,
    pub successes: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub wallets: Vec<WalletReport>,
}

impl BatchReport {
    pub fn attempts(&self) -> u32 {
        self.wallets.iter().map(|w| w.attempts).sum()
    }

    pub fn successes(&self) -> u32 {
        self.wallets.iter().map(|w| w.successes).sum()
    }
}

/// Run `action` `repetitions` times for each account in order
pub async fn run_batch(
    runner: &dyn ActionRunner,
    accounts: &[Account],
    action: Action,
    amount: &Amount,
    repetitions: u32,
    gas: &GasSettings,
) -> BatchReport {
    let mut report = BatchReport::default();

    for account in accounts {
        tracing::info!(address = %account.address(), "Processing wallet");

        let mut successes = 0;
        for i in 1..=repetitions {
            let progress = format!("[{}/{}]", i, repetitions);
            if action == Action::Balances {
                tracing::info!("{} Executing {}", progress, action);
            } else {
                tracing::info!("{} Executing {} (Amount: {} {})", progress, action, amount, action.input_symbol());
            }

            if runner.run(account, action, amount, gas).await.is_success() {
                successes += 1;
                tracing::info!("{} {} completed successfully", progress, action);
            } else {
                tracing::error!("{} {} failed. Continuing to next transaction.", progress, action);
            }
        }

        tracing::info!(
            address = %account.address(),
            successes,
            "Completed {} {}(s)", repetitions, action
        );
        report.wallets.push(WalletReport {
            address: account.address(),
            attempts: repetitions,
            successes,
        });
    }

    report
}
