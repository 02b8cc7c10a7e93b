//! Token and contract registry
//!
//! The deployed contract set is fixed; nothing here is discovered at runtime.
//! Symbols are static, decimals are always fetched from the token contract.

use crate::config::GasLimitKind;
use alloy::primitives::{address, Address};
use alloy::sol;
use std::fmt;

sol! {
    #[sol(rpc)]
    interface IERC20 {
        function approve(address spender, uint256 amount) external returns (bool);
        function allowance(address owner, address spender) external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function decimals() external view returns (uint8);
    }
}

/// Sepolia chain id
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

/// Fixed contract addresses
pub mod addresses {
    use super::*;

    pub const USDC: Address = address!("ef84994ef411c4981328ffce5fda41cd3803fae4");
    pub const R2USD: Address = address!("20c54c5f742f123abb49a982bfe0af47edb38756");
    pub const SR2USD: Address = address!("bd6b25c4132f09369c354bee0f7be777d7d434fa");

    pub const USDC_TO_R2USD: Address = R2USD;
    pub const R2USD_TO_USDC: Address = address!("07abd582df3d3472aa687a0489729f9f0424b1e3");
    pub const STAKE_R2USD: Address = SR2USD;
}

/// Fixed method selectors for the non-standard contract calls
pub mod selectors {
    pub const USDC_TO_R2USD: [u8; 4] = [0x09, 0x5e, 0x7a, 0x95];
    pub const R2USD_TO_USDC: [u8; 4] = [0x3d, 0xf0, 0x21, 0x24];
    pub const STAKE_R2USD: [u8; 4] = [0x1a, 0x5f, 0x0f, 0x00];
}

/// The three tokens the bot moves between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// USDC
    StableA,
    /// R2USD
    StableB,
    /// sR2USD
    StakedB,
}

impl Token {
    pub const ALL: [Token; 3] = [Token::StableA, Token::StableB, Token::StakedB];

    pub fn address(&self) -> Address {
        match self {
            Token::StableA => addresses::USDC,
            Token::StableB => addresses::R2USD,
            Token::StakedB => addresses::SR2USD,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Token::StableA => "USDC",
            Token::StableB => "R2USD",
            Token::StakedB => "sR2USD",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A fixed (contract, method) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractEndpoint {
    SwapAToB,
    SwapBToA,
    StakeB,
}

impl ContractEndpoint {
    pub fn address(&self) -> Address {
        match self {
            ContractEndpoint::SwapAToB => addresses::USDC_TO_R2USD,
            ContractEndpoint::SwapBToA => addresses::R2USD_TO_USDC,
            ContractEndpoint::StakeB => addresses::STAKE_R2USD,
        }
    }

    pub fn selector(&self) -> [u8; 4] {
        match self {
            ContractEndpoint::SwapAToB => selectors::USDC_TO_R2USD,
            ContractEndpoint::SwapBToA => selectors::R2USD_TO_USDC,
            ContractEndpoint::StakeB => selectors::STAKE_R2USD,
        }
    }

    /// Token spent by the call, and the one the endpoint must be approved for.
    pub fn input_token(&self) -> Token {
        match self {
            ContractEndpoint::SwapAToB => Token::StableA,
            ContractEndpoint::SwapBToA | ContractEndpoint::StakeB => Token::StableB,
        }
    }

    pub fn output_token(&self) -> Token {
        match self {
            ContractEndpoint::SwapAToB => Token::StableB,
            ContractEndpoint::SwapBToA => Token::StableA,
            ContractEndpoint::StakeB => Token::StakedB,
        }
    }

    pub fn gas_kind(&self) -> GasLimitKind {
        match self {
            ContractEndpoint::SwapAToB | ContractEndpoint::SwapBToA => GasLimitKind::Swap,
            ContractEndpoint::StakeB => GasLimitKind::Stake,
        }
    }

    /// Human-readable description used in log lines
    pub fn describe(&self) -> &'static str {
        match self {
            ContractEndpoint::SwapAToB => "USDC to R2USD swap",
            ContractEndpoint::SwapBToA => "R2USD to USDC swap",
            ContractEndpoint::StakeB => "R2USD staking",
        }
    }
}
