//! Balance reads and the balance table
//!
//! Reads never fail: an unreachable node or a broken token contract shows up
//! as a logged error and a zero balance.

use crate::amount::Amount;
use crate::chain::{Account, ChainClient};
use crate::tokens::Token;
use crate::Result;
use alloy::primitives::{Address, U256};
use std::fmt;

pub const NATIVE_SYMBOL: &str = "ETH";
pub const NATIVE_DECIMALS: u8 = 18;

/// A balance in base units together with the token's precision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBalance {
    pub symbol: &'static str,
    pub raw: U256,
    pub decimals: u8,
}

impl TokenBalance {
    pub fn zero(symbol: &'static str) -> Self {
        Self {
            symbol,
            raw: U256::ZERO,
            decimals: NATIVE_DECIMALS,
        }
    }

    pub fn amount(&self) -> Amount {
        Amount::from_base_units(self.raw, self.decimals)
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    /// Whether this balance is at least `amount`, compared in base units.
    ///
    /// An amount finer than the token's precision is an error, not a shortfall.
    pub fn covers(&self, amount: &Amount) -> Result<bool> {
        Ok(self.raw >= amount.to_base_units(self.decimals)?)
    }
}

impl fmt::Display for TokenBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.amount())
    }
}

/// Read an ERC-20 balance, logging and returning zero on failure
pub async fn token_balance(client: &dyn ChainClient, token: Token) -> TokenBalance {
    let read = async {
        let decimals = client.token_decimals(token).await?;
        let raw = client.token_balance(token).await?;
        Ok::<_, crate::Error>((raw, decimals))
    };

    match read.await {
        Ok((raw, decimals)) => TokenBalance {
            symbol: token.symbol(),
            raw,
            decimals,
        },
        Err(e) => {
            tracing::error!(
                token = %token.address(),
                address = %client.address(),
                error = %e,
                "Failed to check {} balance", token
            );
            TokenBalance::zero(token.symbol())
        }
    }
}

/// Read the native balance, logging and returning zero on failure
pub async fn native_balance(client: &dyn ChainClient) -> TokenBalance {
    match client.native_balance().await {
        Ok(raw) => TokenBalance {
            symbol: NATIVE_SYMBOL,
            raw,
            decimals: NATIVE_DECIMALS,
        },
        Err(e) => {
            tracing::error!(address = %client.address(), error = %e, "Failed to check ETH balance");
            TokenBalance::zero(NATIVE_SYMBOL)
        }
    }
}

/// Every balance the bot cares about for one account
#[derive(Debug, Clone)]
pub struct BalanceSnapshot {
    pub address: Address,
    /// ETH first, then each token in registry order
    pub balances: Vec<TokenBalance>,
}

impl BalanceSnapshot {
    pub async fn read(client: &dyn ChainClient) -> Self {
        let mut balances = vec![native_balance(client).await];
        for token in Token::ALL {
            balances.push(token_balance(client, token).await);
        }
        Self {
            address: client.address(),
            balances,
        }
    }
}

/// Read snapshots for each account in order
pub async fn snapshots(accounts: &[Account]) -> Vec<BalanceSnapshot> {
    let mut out = Vec::with_capacity(accounts.len());
    for account in accounts {
        out.push(BalanceSnapshot::read(account.client.as_ref()).await);
    }
    out
}

/// Plain-text table: one row per account, one column per asset
pub fn render_table(snapshots: &[BalanceSnapshot]) -> String {
    let mut out = format!("{:<44}", "Wallet");
    let symbols: Vec<&str> = std::iter::once(NATIVE_SYMBOL)
        .chain(Token::ALL.iter().map(|t| t.symbol()))
        .collect();
    for symbol in &symbols {
        out.push_str(&format!(" {:>16}", symbol));
    }
    out.push('\n');
    out.push_str(&"-".repeat(44 + symbols.len() * 17));
    out.push('\n');

    for snapshot in snapshots {
        out.push_str(&format!("{:<44}", snapshot.address.to_checksum(None)));
        for balance in &snapshot.balances {
            out.push_str(&format!(" {:>16}", format_display(&balance.amount())));
        }
        out.push('\n');
    }
    out
}

/// Round to 6 decimals for display; full precision stays in the logs
fn format_display(amount: &Amount) -> String {
    let s = amount.to_string();
    match s.split_once('.') {
        Some((int, frac)) if frac.len() > 6 => format!("{}.{}", int, &frac[..6]),
        _ => s,
    }
}
