//! Account credentials and signing
//!
//! Private keys are read once at startup and handed straight to the signer.
//! Nothing outside this module sees key material.

mod credentials;
mod signer;

pub use credentials::{
    is_valid_private_key, private_keys_from_env, private_keys_from_vars, PRIVATE_KEY_PREFIX,
};
pub use signer::{PreparedTransaction, SecureWallet};
