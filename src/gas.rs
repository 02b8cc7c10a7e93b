//! EIP-1559 fee resolution
//!
//! The operator's configured fees are authoritative. Network hints are
//! fetched for visibility only.

use crate::amount::Amount;
use crate::chain::ChainClient;
use crate::config::GasSettings;
use crate::{Error, Result};

const GWEI_DECIMALS: u8 = 9;

/// Per-gas fees in wei
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeParams {
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
}

/// Exact gwei to wei conversion
pub fn gwei_to_wei(gwei: &Amount) -> Result<u128> {
    let wei = gwei.to_base_units(GWEI_DECIMALS)?;
    u128::try_from(wei).map_err(|_| Error::InvalidArgument(format!("Fee of {} gwei is too large", gwei)))
}

/// Fees for the next transaction
pub async fn resolve_fees(client: &dyn ChainClient, settings: &GasSettings) -> Result<FeeParams> {
    match client.fee_hints().await {
        Ok(hints) => tracing::debug!(
            max_fee_per_gas = hints.max_fee_per_gas,
            max_priority_fee_per_gas = hints.max_priority_fee_per_gas,
            "Network fee suggestion"
        ),
        Err(e) => tracing::warn!(error = %e, "Failed to fetch fee data, using configured gas settings"),
    }

    let max_fee_per_gas = gwei_to_wei(&settings.max_fee_gwei)?;
    let mut max_priority_fee_per_gas = gwei_to_wei(&settings.priority_fee_gwei)?;
    if max_priority_fee_per_gas > max_fee_per_gas {
        tracing::warn!(
            priority_fee_gwei = %settings.priority_fee_gwei,
            max_fee_gwei = %settings.max_fee_gwei,
            "Priority fee exceeds max fee, capping at max fee"
        );
        max_priority_fee_per_gas = max_fee_per_gas;
    }

    Ok(FeeParams {
        max_fee_per_gas,
        max_priority_fee_per_gas,
    })
}
