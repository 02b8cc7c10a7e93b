//! In-memory chain for tests
//!
//! Approvals, swaps and stakes sent to the fixed contracts move balances the
//! way the real contracts would (1:1, no fees). Anything else is recorded and
//! confirmed without side effects.

use super::{ChainClient, ReceiptStatus};
use crate::gas::FeeParams;
use crate::tokens::{ContractEndpoint, Token, IERC20};
use crate::wallet::PreparedTransaction;
use crate::{Error, Result};
use alloy::primitives::{Address, TxHash, U256};
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
struct State {
    native: U256,
    balances: HashMap<Token, U256>,
    decimals: HashMap<Token, u8>,
    allowances: HashMap<(Token, Address), U256>,
    submitted: Vec<PreparedTransaction>,
    receipts: HashMap<TxHash, ReceiptStatus>,
    reverting: HashSet<Address>,
    fee_hints: Option<FeeParams>,
    fail_balance_reads: bool,
    fail_fee_hints: bool,
}

pub struct MockChain {
    address: Address,
    state: Mutex<State>,
}

impl MockChain {
    pub fn new() -> Self {
        Self::with_address(Address::repeat_byte(0xaa))
    }

    pub fn with_address(address: Address) -> Self {
        let mut state = State::default();
        for token in Token::ALL {
            state.decimals.insert(token, 6);
        }
        Self {
            address,
            state: Mutex::new(state),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Set a balance in whole tokens
    pub fn set_balance(&self, token: Token, amount: &str) {
        let decimals = self.state().decimals[&token];
        let raw = amount.parse::<crate::Amount>().unwrap().to_base_units(decimals).unwrap();
        self.state().balances.insert(token, raw);
    }

    pub fn set_native_balance(&self, wei: U256) {
        self.state().native = wei;
    }

    pub fn set_allowance(&self, token: Token, spender: Address, raw: U256) {
        self.state().allowances.insert((token, spender), raw);
    }

    pub fn set_fee_hints(&self, hints: FeeParams) {
        self.state().fee_hints = Some(hints);
    }

    pub fn fail_balance_reads(&self) {
        self.state().fail_balance_reads = true;
    }

    pub fn fail_fee_hints(&self) {
        self.state().fail_fee_hints = true;
    }

    /// Mine every transaction sent to `to` as reverted
    pub fn revert_calls_to(&self, to: Address) {
        self.state().reverting.insert(to);
    }

    pub fn raw_balance(&self, token: Token) -> U256 {
        self.state().balances.get(&token).copied().unwrap_or_default()
    }

    pub fn raw_allowance(&self, token: Token, spender: Address) -> U256 {
        self.state()
            .allowances
            .get(&(token, spender))
            .copied()
            .unwrap_or_default()
    }

    pub fn submitted(&self) -> Vec<PreparedTransaction> {
        self.state().submitted.clone()
    }

    /// Submitted transactions whose selector matches `selector`
    pub fn submitted_with_selector(&self, selector: [u8; 4]) -> Vec<PreparedTransaction> {
        self.submitted()
            .into_iter()
            .filter(|tx| tx.data.len() >= 4 && tx.data[..4] == selector)
            .collect()
    }
}

fn word(data: &[u8], index: usize) -> U256 {
    let start = 4 + index * 32;
    U256::from_be_slice(&data[start..start + 32])
}

impl State {
    fn token_at(address: Address) -> Option<Token> {
        Token::ALL.into_iter().find(|t| t.address() == address)
    }

    fn transfer_through(&mut self, endpoint: ContractEndpoint, amount: U256) -> bool {
        let input = endpoint.input_token();
        let key = (input, endpoint.address());
        let balance = self.balances.get(&input).copied().unwrap_or_default();
        let allowance = self.allowances.get(&key).copied().unwrap_or_default();
        if balance < amount || allowance < amount {
            return false;
        }

        self.balances.insert(input, balance - amount);
        self.allowances.insert(key, allowance - amount);
        *self.balances.entry(endpoint.output_token()).or_default() += amount;
        true
    }

    /// Apply the effects of a call; false means the call reverts
    fn apply(&mut self, tx: &PreparedTransaction) -> bool {
        if self.reverting.contains(&tx.to) {
            return false;
        }
        if tx.data.len() < 4 {
            return true;
        }
        let data = &tx.data[..];
        let selector: [u8; 4] = [data[0], data[1], data[2], data[3]];

        if selector == IERC20::approveCall::SELECTOR {
            if let Some(token) = Self::token_at(tx.to) {
                let spender = Address::from_slice(&data[16..36]);
                self.allowances.insert((token, spender), word(data, 1));
            }
            return true;
        }

        for endpoint in [
            ContractEndpoint::SwapAToB,
            ContractEndpoint::SwapBToA,
            ContractEndpoint::StakeB,
        ] {
            if tx.to == endpoint.address() && selector == endpoint.selector() {
                let amount = match endpoint {
                    ContractEndpoint::SwapAToB => word(data, 1),
                    ContractEndpoint::SwapBToA => word(data, 2),
                    ContractEndpoint::StakeB => word(data, 0),
                };
                return self.transfer_through(endpoint, amount);
            }
        }

        true
    }
}

#[async_trait]
impl ChainClient for MockChain {
    fn address(&self) -> Address {
        self.address
    }

    fn chain_id(&self) -> u64 {
        crate::tokens::SEPOLIA_CHAIN_ID
    }

    async fn native_balance(&self) -> Result<U256> {
        let state = self.state();
        if state.fail_balance_reads {
            return Err(Error::Rpc("connection refused".to_string()));
        }
        Ok(state.native)
    }

    async fn token_balance(&self, token: Token) -> Result<U256> {
        let state = self.state();
        if state.fail_balance_reads {
            return Err(Error::Rpc("connection refused".to_string()));
        }
        Ok(state.balances.get(&token).copied().unwrap_or_default())
    }

    async fn token_decimals(&self, token: Token) -> Result<u8> {
        let state = self.state();
        if state.fail_balance_reads {
            return Err(Error::Rpc("connection refused".to_string()));
        }
        Ok(state.decimals[&token])
    }

    async fn allowance(&self, token: Token, spender: Address) -> Result<U256> {
        Ok(self.raw_allowance(token, spender))
    }

    async fn fee_hints(&self) -> Result<FeeParams> {
        let state = self.state();
        if state.fail_fee_hints {
            return Err(Error::Rpc("eth_feeHistory unavailable".to_string()));
        }
        Ok(state.fee_hints.unwrap_or(FeeParams {
            max_fee_per_gas: 30_000_000_000,
            max_priority_fee_per_gas: 1_000_000_000,
        }))
    }

    async fn submit(&self, tx: PreparedTransaction) -> Result<TxHash> {
        let mut state = self.state();
        let nonce = state.submitted.len() as u64 + 1;
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&nonce.to_be_bytes());
        let hash = TxHash::from(bytes);

        let status = if state.apply(&tx) {
            ReceiptStatus::Success
        } else {
            ReceiptStatus::Reverted
        };
        state.receipts.insert(hash, status);
        state.submitted.push(tx);
        Ok(hash)
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> Result<ReceiptStatus> {
        self.state()
            .receipts
            .get(&hash)
            .copied()
            .ok_or_else(|| Error::Rpc(format!("Unknown transaction {}", hash)))
    }
}
