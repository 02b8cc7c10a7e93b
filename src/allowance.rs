//! ERC-20 approvals
//!
//! Approves exactly the requested amount, never an unlimited allowance.

use crate::amount::Amount;
use crate::chain::{self, ChainClient};
use crate::config::{Config, GasLimitKind, GasSettings};
use crate::tokens::{Token, IERC20};
use crate::Result;
use alloy::primitives::{Address, TxHash};
use alloy::sol_types::SolCall;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalOutcome {
    /// Existing allowance covers the amount, nothing was sent
    AlreadySufficient,
    Approved(TxHash),
}

/// Make sure `spender` may move `amount` of `token` for this account
pub async fn ensure_allowance(
    client: &dyn ChainClient,
    token: Token,
    spender: Address,
    amount: &Amount,
    gas: &GasSettings,
    config: &Config,
) -> Result<ApprovalOutcome> {
    let decimals = client.token_decimals(token).await?;
    let required = amount.to_base_units(decimals)?;
    let current = client.allowance(token, spender).await?;

    if current >= required {
        tracing::info!(token = %token, spender = %spender, "Sufficient allowance already exists");
        return Ok(ApprovalOutcome::AlreadySufficient);
    }

    tracing::info!(
        token = %token,
        spender = %spender,
        amount = %amount,
        "Approving {} {}", amount, token
    );

    let data = IERC20::approveCall {
        spender,
        amount: required,
    }
    .abi_encode();

    let hash = chain::send_and_confirm(
        client,
        token.address(),
        data.into(),
        gas.limit(GasLimitKind::Approval),
        gas,
        config,
    )
    .await?;

    tracing::info!(hash = %hash, "Approval confirmed");
    Ok(ApprovalOutcome::Approved(hash))
}
