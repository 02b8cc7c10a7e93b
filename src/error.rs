//! Error types for the R2USD automation bot

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Proxy error: {0}")]
    Proxy(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Insufficient {token} balance. Have {available} {token} but need {required} {token}")]
    InsufficientBalance {
        token: String,
        available: String,
        required: String,
    },

    #[error("Transaction {hash} reverted on-chain")]
    Reverted { hash: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
