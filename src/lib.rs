//! R2USD automation bot
//!
//! Drives USDC/R2USD/sR2USD flows on Sepolia for a set of accounts:
//! - Swap USDC to R2USD and back through the fixed swap contracts
//! - Stake R2USD into sR2USD
//! - Auto mode: swap, then stake the proceeds
//!
//! # Security Model
//!
//! - Private keys are read from `PRIVATE_KEY_*` environment entries only
//! - Keys live inside the wallet module and are never logged
//! - Approvals are exact, never unlimited

pub mod allowance;
pub mod amount;
pub mod balance;
pub mod batch;
pub mod calldata;
pub mod chain;
pub mod config;
pub mod executor;
pub mod gas;
pub mod runner;
pub mod sequence;
pub mod tokens;
pub mod wallet;

mod error;

// Re-export commonly used types
pub use amount::Amount;
pub use batch::{run_batch, Action, ActionRunner, BatchReport};
pub use chain::{Account, ChainClient};
pub use config::{Config, GasSettings, RpcConfig};
pub use error::{Error, Result};
pub use executor::{ActionExecutor, Outcome};
pub use runner::{ConsoleRunner, StdinLines};
