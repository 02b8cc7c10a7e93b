//! Auto mode: swap USDC in, then stake whatever R2USD the account holds

use crate::amount::Amount;
use crate::balance::token_balance;
use crate::chain::ChainClient;
use crate::config::GasSettings;
use crate::executor::{ActionExecutor, Outcome};
use crate::tokens::Token;

/// Swap `amount` USDC to R2USD, then stake the observed R2USD balance.
///
/// Succeeds only if both steps succeed. The stake amount is read back from
/// the chain after the swap, so it includes any R2USD already held.
pub async fn auto_sequence(
    executor: &ActionExecutor,
    client: &dyn ChainClient,
    amount: &Amount,
    gas: &GasSettings,
) -> Outcome {
    tracing::info!(address = %client.address(), amount = %amount, "Starting auto sequence");

    if !executor.swap_in(client, amount, gas).await.is_success() {
        tracing::error!(address = %client.address(), "Swap failed, skipping stake");
        return Outcome::Failed;
    }

    let proceeds = token_balance(client, Token::StableB).await;
    if proceeds.is_zero() {
        tracing::error!(address = %client.address(), "No R2USD balance to stake after swap");
        return Outcome::Failed;
    }

    let stake_amount = proceeds.amount();
    tracing::info!(amount = %stake_amount, "Staking R2USD balance");
    executor.stake(client, &stake_amount, gas).await
}
