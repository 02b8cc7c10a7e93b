//! Exact decimal amounts
//!
//! User-facing quantities stay decimal strings until the moment they are
//! needed on-chain, where they are scaled by the token's decimals. Scaling
//! never truncates: a value that needs more fractional digits than the token
//! supports is rejected.

use crate::{Error, Result};
use alloy::primitives::U256;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A non-negative decimal quantity.
///
/// Stored normalized: no leading zeros in the integer part (except a lone
/// `0`) and no trailing zeros in the fraction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount {
    integer: String,
    fraction: String,
}

impl Amount {
    pub fn zero() -> Self {
        Self {
            integer: "0".to_string(),
            fraction: String::new(),
        }
    }

    /// Parse operator input, rejecting zero.
    pub fn parse_positive(input: &str) -> Result<Self> {
        let amount: Amount = input.parse()?;
        if amount.is_zero() {
            return Err(Error::InvalidArgument(format!(
                "Amount must be greater than zero, got '{}'",
                input.trim()
            )));
        }
        Ok(amount)
    }

    pub fn is_zero(&self) -> bool {
        self.integer == "0" && self.fraction.is_empty()
    }

    /// Convert to integer base units for a token with `decimals` precision.
    pub fn to_base_units(&self, decimals: u8) -> Result<U256> {
        let decimals = decimals as usize;
        if self.fraction.len() > decimals {
            return Err(Error::InvalidArgument(format!(
                "Amount {} has {} fractional digits but the token supports only {}",
                self,
                self.fraction.len(),
                decimals
            )));
        }

        let digits = format!("{}{:0<width$}", self.integer, self.fraction, width = decimals);
        U256::from_str_radix(&digits, 10)
            .map_err(|e| Error::InvalidArgument(format!("Amount {} out of range: {}", self, e)))
    }

    /// Build an amount from integer base units.
    pub fn from_base_units(raw: U256, decimals: u8) -> Self {
        if decimals == 0 {
            return Self {
                integer: raw.to_string(),
                fraction: String::new(),
            };
        }

        // 10^decimals past U256::MAX leaves every raw value below one whole unit
        let (whole, remainder) = match U256::from(10).checked_pow(U256::from(decimals)) {
            Some(divisor) => (raw / divisor, raw % divisor),
            None => (U256::ZERO, raw),
        };

        let fraction = if remainder.is_zero() {
            String::new()
        } else {
            let padded = format!("{:0>width$}", remainder.to_string(), width = decimals as usize);
            padded.trim_end_matches('0').to_string()
        };

        Self {
            integer: whole.to_string(),
            fraction,
        }
    }
}

impl FromStr for Amount {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let invalid = || Error::InvalidArgument(format!("'{}' is not a valid decimal amount", trimmed));

        let (integer, fraction) = match trimmed.split_once('.') {
            Some((i, f)) => (i, f),
            None => (trimmed, ""),
        };

        if integer.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !integer.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let integer = integer.trim_start_matches('0');
        let fraction = fraction.trim_end_matches('0');

        Ok(Self {
            integer: if integer.is_empty() {
                "0".to_string()
            } else {
                integer.to_string()
            },
            fraction: fraction.to_string(),
        })
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self {
            integer: value.to_string(),
            fraction: String::new(),
        }
    }
}

impl TryFrom<String> for Amount {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Amount> for String {
    fn from(value: Amount) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fraction.is_empty() {
            write!(f, "{}", self.integer)
        } else {
            write!(f, "{}.{}", self.integer, self.fraction)
        }
    }
}
