//! Calldata for the swap and stake contracts
//!
//! These contracts are not verified, so their ABIs are not available. The byte
//! layouts below are fixed: the swap-out flag words and the stake tail are
//! reproduced exactly as the contracts expect them, without interpretation.

use crate::amount::Amount;
use crate::tokens::ContractEndpoint;
use crate::Result;
use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolValue;

/// Zero bytes following the amount word in a stake call
const STAKE_TAIL_LEN: usize = 288;

/// Percentage of the input accepted as minimum swap-out proceeds
const MIN_OUTPUT_PERCENT: u64 = 97;

/// A call to one of the fixed contract endpoints, amounts in base units
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCall {
    SwapAToB { recipient: Address, amount: U256 },
    SwapBToA { amount: U256 },
    StakeB { amount: U256 },
}

/// Minimum swap-out proceeds, `amount * 97 / 100` truncated
pub fn min_output(amount: U256) -> U256 {
    let hundred = U256::from(100u64);
    let percent = U256::from(MIN_OUTPUT_PERCENT);
    // split so large amounts cannot overflow
    (amount / hundred) * percent + (amount % hundred) * percent / hundred
}

fn word(value: U256) -> [u8; 32] {
    value.to_be_bytes::<32>()
}

impl ContractCall {
    /// Build the call for `endpoint`, converting a decimal amount exactly
    pub fn for_endpoint(
        endpoint: ContractEndpoint,
        recipient: Address,
        amount: &Amount,
        decimals: u8,
    ) -> Result<Self> {
        let amount = amount.to_base_units(decimals)?;
        Ok(match endpoint {
            ContractEndpoint::SwapAToB => ContractCall::SwapAToB { recipient, amount },
            ContractEndpoint::SwapBToA => ContractCall::SwapBToA { amount },
            ContractEndpoint::StakeB => ContractCall::StakeB { amount },
        })
    }

    pub fn endpoint(&self) -> ContractEndpoint {
        match self {
            ContractCall::SwapAToB { .. } => ContractEndpoint::SwapAToB,
            ContractCall::SwapBToA { .. } => ContractEndpoint::SwapBToA,
            ContractCall::StakeB { .. } => ContractEndpoint::StakeB,
        }
    }

    pub fn encode(&self) -> Bytes {
        let endpoint = self.endpoint();
        let mut data = endpoint.selector().to_vec();

        match self {
            ContractCall::SwapAToB { recipient, amount } => {
                let params = (
                    *recipient,
                    *amount,
                    U256::ZERO,
                    U256::ZERO,
                    U256::ZERO,
                    U256::ZERO,
                    U256::ZERO,
                );
                data.extend_from_slice(&params.abi_encode_params());
            }
            ContractCall::SwapBToA { amount } => {
                data.extend_from_slice(&word(U256::ZERO));
                data.extend_from_slice(&word(U256::from(1u64)));
                data.extend_from_slice(&word(*amount));
                data.extend_from_slice(&word(min_output(*amount)));
            }
            ContractCall::StakeB { amount } => {
                data.extend_from_slice(&word(*amount));
                data.extend_from_slice(&[0u8; STAKE_TAIL_LEN]);
            }
        }

        Bytes::from(data)
    }
}
