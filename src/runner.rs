//! Interactive operator console
//!
//! A single loop reads a menu choice, gathers the parameters for that choice
//! and runs it to completion before showing the menu again. Nothing runs in
//! the background, so gas settings can only change between batches.

use crate::amount::Amount;
use crate::balance::{render_table, snapshots, token_balance};
use crate::batch::{run_batch, Action, ActionRunner};
use crate::chain::Account;
use crate::config::{GasSettings, GasSettingsUpdate};
use crate::tokens::Token;
use crate::{Error, Result};
use async_trait::async_trait;
use std::io::Write;
use std::str::FromStr;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{error, info, warn};

/// Source of operator input, one line at a time
#[async_trait]
pub trait LineSource: Send {
    /// Next line without its terminator; `None` at end of input
    async fn next_line(&mut self) -> Result<Option<String>>;
}

/// Reads operator input from stdin
pub struct StdinLines {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinLines {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for StdinLines {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LineSource for StdinLines {
    async fn next_line(&mut self) -> Result<Option<String>> {
        Ok(self.lines.next_line().await?)
    }
}

/// Main menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    SwapIn,
    SwapOut,
    Stake,
    Balances,
    Auto,
    GasSettings,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::SwapIn),
            "2" => Some(MenuChoice::SwapOut),
            "3" => Some(MenuChoice::Stake),
            "4" => Some(MenuChoice::Balances),
            "5" => Some(MenuChoice::Auto),
            "6" => Some(MenuChoice::GasSettings),
            "7" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

/// Which wallets an action runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletSelection {
    All,
    /// 0-based index
    One(usize),
}

/// Parse `all` or a 1-based wallet number; `None` if out of range
pub fn parse_wallet_selection(input: &str, wallet_count: usize) -> Option<WalletSelection> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("all") {
        return Some(WalletSelection::All);
    }
    match input.parse::<usize>() {
        Ok(n) if n >= 1 && n <= wallet_count => Some(WalletSelection::One(n - 1)),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

enum Reply<T> {
    Value(T),
    Cancel,
    Eof,
}

pub struct ConsoleRunner<'a, S> {
    accounts: &'a [Account],
    runner: &'a dyn ActionRunner,
    gas: GasSettings,
    input: S,
}

impl<'a, S: LineSource> ConsoleRunner<'a, S> {
    pub fn new(accounts: &'a [Account], runner: &'a dyn ActionRunner, gas: GasSettings, input: S) -> Self {
        Self {
            accounts,
            runner,
            gas,
            input,
        }
    }

    pub fn gas(&self) -> &GasSettings {
        &self.gas
    }

    /// Run until the operator exits or input ends
    pub async fn run(&mut self) -> Result<()> {
        loop {
            print_menu();
            let Some(line) = self.input.next_line().await? else {
                info!("End of input, exiting");
                return Ok(());
            };

            let flow = match MenuChoice::parse(&line) {
                Some(choice) => self.handle(choice).await?,
                None => {
                    warn!("Invalid option. Please select a number between 1 and 7.");
                    Flow::Continue
                }
            };

            if flow == Flow::Exit {
                info!("Exiting the application!");
                return Ok(());
            }
        }
    }

    async fn handle(&mut self, choice: MenuChoice) -> Result<Flow> {
        match choice {
            MenuChoice::SwapIn => self.run_action(Action::SwapIn).await,
            MenuChoice::SwapOut => self.run_action(Action::SwapOut).await,
            MenuChoice::Stake => self.run_action(Action::Stake).await,
            MenuChoice::Auto => self.run_action(Action::Auto).await,
            MenuChoice::Balances => {
                println!("\n{}", render_table(&snapshots(self.accounts).await));
                Ok(Flow::Continue)
            }
            MenuChoice::GasSettings => self.edit_gas().await,
            MenuChoice::Exit => Ok(Flow::Exit),
        }
    }

    async fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        print!("{}", text);
        std::io::stdout().flush()?;
        self.input.next_line().await
    }

    async fn select_wallets(&mut self) -> Result<Option<Vec<Account>>> {
        if self.accounts.is_empty() {
            return Err(Error::Config("No wallets available".to_string()));
        }
        if self.accounts.len() == 1 {
            info!(address = %self.accounts[0].address(), "Using wallet");
            return Ok(Some(self.accounts.to_vec()));
        }

        println!("\nAvailable wallets:");
        for account in self.accounts {
            println!("  {:>2}. {}", account.number, account.address());
        }
        println!("\nYou can enter a wallet number or type \"all\" to use all wallets");

        let Some(line) = self.prompt("Selection: ").await? else {
            return Ok(None);
        };

        let selected = match parse_wallet_selection(&line, self.accounts.len()) {
            Some(WalletSelection::All) => {
                info!("Using all wallets");
                self.accounts.to_vec()
            }
            Some(WalletSelection::One(index)) => {
                info!(address = %self.accounts[index].address(), "Using wallet");
                vec![self.accounts[index].clone()]
            }
            None => {
                warn!("Invalid selection. Using first wallet.");
                vec![self.accounts[0].clone()]
            }
        };
        Ok(Some(selected))
    }

    /// Prompt until the reply parses, the operator cancels, or input ends
    async fn prompt_value<T>(
        &mut self,
        text: &str,
        cancel_word: &str,
        parse: impl Fn(&str) -> Option<T>,
        invalid_message: &str,
    ) -> Result<Reply<T>> {
        loop {
            let Some(line) = self.prompt(text).await? else {
                return Ok(Reply::Eof);
            };
            if line.trim().eq_ignore_ascii_case(cancel_word) {
                return Ok(Reply::Cancel);
            }
            match parse(&line) {
                Some(value) => return Ok(Reply::Value(value)),
                None => error!("{}", invalid_message),
            }
        }
    }

    async fn run_action(&mut self, action: Action) -> Result<Flow> {
        let Some(wallets) = self.select_wallets().await? else {
            return Ok(Flow::Exit);
        };

        let token = match action {
            Action::SwapIn | Action::Auto => Token::StableA,
            _ => Token::StableB,
        };
        println!("\nCurrent {} balances:", token);
        for account in &wallets {
            let balance = token_balance(account.client.as_ref(), token).await;
            println!("  {}  {}", account.address(), balance);
        }

        let amount_prompt = format!(
            "\nEnter amount of {} for each {} (or \"back\" to return to menu): ",
            action.input_symbol(),
            action
        );
        let amount = match self
            .prompt_value(
                &amount_prompt,
                "back",
                |s| Amount::parse_positive(s).ok(),
                "Invalid amount. Please enter a positive number.",
            )
            .await?
        {
            Reply::Value(amount) => amount,
            Reply::Cancel => return Ok(Flow::Continue),
            Reply::Eof => return Ok(Flow::Exit),
        };

        let count_prompt = format!(
            "Enter number of {}s per wallet (or \"skip\" to return to menu): ",
            action
        );
        let repetitions = match self
            .prompt_value(
                &count_prompt,
                "skip",
                |s| u32::from_str(s.trim()).ok().filter(|n| *n > 0),
                "Invalid number. Please enter a positive integer.",
            )
            .await?
        {
            Reply::Value(n) => n,
            Reply::Cancel => return Ok(Flow::Continue),
            Reply::Eof => return Ok(Flow::Exit),
        };

        let report = run_batch(self.runner, &wallets, action, &amount, repetitions, &self.gas).await;
        info!(
            attempts = report.attempts(),
            successes = report.successes(),
            "Batch finished"
        );
        Ok(Flow::Continue)
    }

    async fn edit_gas(&mut self) -> Result<Flow> {
        println!("\nCurrent Gas Settings:");
        println!("{}", render_gas_settings(&self.gas));
        println!("Enter new values or press Enter to keep current values");

        let Some(max_fee) = self.prompt("Max Fee (gwei): ").await? else {
            return Ok(Flow::Exit);
        };
        let Some(priority_fee) = self.prompt("Priority Fee (gwei): ").await? else {
            return Ok(Flow::Exit);
        };
        let Some(approval) = self.prompt("Gas Limit - Approval: ").await? else {
            return Ok(Flow::Exit);
        };
        let Some(swap) = self.prompt("Gas Limit - Swap: ").await? else {
            return Ok(Flow::Exit);
        };
        let Some(stake) = self.prompt("Gas Limit - Stake: ").await? else {
            return Ok(Flow::Exit);
        };

        self.gas.apply(GasSettingsUpdate {
            max_fee_gwei: optional_value(&max_fee, |s| Amount::parse_positive(s).ok()),
            priority_fee_gwei: optional_value(&priority_fee, |s| Amount::parse_positive(s).ok()),
            approval_limit: optional_value(&approval, parse_gas_limit),
            swap_limit: optional_value(&swap, parse_gas_limit),
            stake_limit: optional_value(&stake, parse_gas_limit),
        });
        Ok(Flow::Continue)
    }
}

fn parse_gas_limit(input: &str) -> Option<u64> {
    input.trim().parse::<u64>().ok().filter(|n| *n > 0)
}

/// Empty keeps the current value; unparseable input is ignored with a warning
fn optional_value<T>(input: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
    if input.trim().is_empty() {
        return None;
    }
    let value = parse(input);
    if value.is_none() {
        warn!(input = %input.trim(), "Ignoring invalid value");
    }
    value
}

fn print_menu() {
    println!("\nMAIN MENU");
    println!("  1. Swap USDC to R2USD");
    println!("  2. Swap R2USD to USDC");
    println!("  3. Stake R2USD to sR2USD");
    println!("  4. Check balances");
    println!("  5. Auto Mode (Swap -> Stake)");
    println!("  6. Gas Settings");
    println!("  7. Exit");
    println!("\nSelect an option (1-7):");
}

pub fn render_gas_settings(gas: &GasSettings) -> String {
    [
        ("Max Fee (gwei)", gas.max_fee_gwei.to_string()),
        ("Priority Fee (gwei)", gas.priority_fee_gwei.to_string()),
        ("Gas Limit - Approval", gas.limits.approval.to_string()),
        ("Gas Limit - Swap", gas.limits.swap.to_string()),
        ("Gas Limit - Stake", gas.limits.stake.to_string()),
    ]
    .iter()
    .map(|(name, value)| format!("  {:<22} {:>12}", name, value))
    .collect::<Vec<_>>()
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::mock::MockChain;
    use crate::executor::Outcome;
    use alloy::primitives::Address;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    struct ScriptedLines(VecDeque<String>);

    impl ScriptedLines {
        fn new(lines: &[&str]) -> Self {
            Self(lines.iter().map(|l| l.to_string()).collect())
        }
    }

    #[async_trait]
    impl LineSource for ScriptedLines {
        async fn next_line(&mut self) -> Result<Option<String>> {
            Ok(self.0.pop_front())
        }
    }

    #[derive(Default)]
    struct RecordingRunner {
        calls: Mutex<Vec<(Address, Action, String)>>,
    }

    #[async_trait]
    impl ActionRunner for RecordingRunner {
        async fn run(&self, account: &Account, action: Action, amount: &Amount, _: &GasSettings) -> Outcome {
            self.calls
                .lock()
                .unwrap()
                .push((account.address(), action, amount.to_string()));
            Outcome::Success
        }
    }

    fn accounts(n: u8) -> Vec<Account> {
        (1..=n)
            .map(|i| Account::new(i as usize, Arc::new(MockChain::with_address(Address::repeat_byte(i)))))
            .collect()
    }

    #[test]
    fn test_menu_choice_parse() {
        assert_eq!(MenuChoice::parse(" 1 "), Some(MenuChoice::SwapIn));
        assert_eq!(MenuChoice::parse("6"), Some(MenuChoice::GasSettings));
        assert_eq!(MenuChoice::parse("7"), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse("8"), None);
        assert_eq!(MenuChoice::parse("swap"), None);
    }

    #[test]
    fn test_wallet_selection_parse() {
        assert_eq!(parse_wallet_selection("ALL", 3), Some(WalletSelection::All));
        assert_eq!(parse_wallet_selection("2", 3), Some(WalletSelection::One(1)));
        assert_eq!(parse_wallet_selection("0", 3), None);
        assert_eq!(parse_wallet_selection("4", 3), None);
        assert_eq!(parse_wallet_selection("x", 3), None);
    }

    #[tokio::test]
    async fn test_invalid_entries_are_reprompted() {
        let accounts = accounts(2);
        let runner = RecordingRunner::default();
        let input = ScriptedLines::new(&["1", "all", "abc", "0", "5", "x", "-1", "2", "7"]);

        let mut console = ConsoleRunner::new(&accounts, &runner, GasSettings::default(), input);
        console.run().await.unwrap();

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 4);
        assert!(calls.iter().all(|(_, action, amount)| *action == Action::SwapIn && amount == "5"));
        assert_eq!(calls[0].0, Address::repeat_byte(1));
        assert_eq!(calls[3].0, Address::repeat_byte(2));
    }

    #[tokio::test]
    async fn test_invalid_wallet_selection_uses_first() {
        let accounts = accounts(3);
        let runner = RecordingRunner::default();
        let input = ScriptedLines::new(&["5", "9", "1.5", "1", "7"]);

        ConsoleRunner::new(&accounts, &runner, GasSettings::default(), input)
            .run()
            .await
            .unwrap();

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, Address::repeat_byte(1));
        assert_eq!(calls[0].1, Action::Auto);
    }

    #[tokio::test]
    async fn test_back_and_skip_return_to_menu() {
        let accounts = accounts(1);
        let runner = RecordingRunner::default();
        let input = ScriptedLines::new(&["2", "back", "3", "10", "skip", "8", "7"]);

        ConsoleRunner::new(&accounts, &runner, GasSettings::default(), input)
            .run()
            .await
            .unwrap();

        assert!(runner.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_eof_exits_cleanly() {
        let accounts = accounts(1);
        let runner = RecordingRunner::default();

        let mut console = ConsoleRunner::new(&accounts, &runner, GasSettings::default(), ScriptedLines::new(&[]));
        assert!(console.run().await.is_ok());

        // input ends mid-prompt
        let mut console =
            ConsoleRunner::new(&accounts, &runner, GasSettings::default(), ScriptedLines::new(&["1", "5"]));
        assert!(console.run().await.is_ok());
        assert!(runner.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_action_without_wallets_is_config_error() {
        let runner = RecordingRunner::default();
        let input = ScriptedLines::new(&["1", "x", "5", "7"]);

        let err = ConsoleRunner::new(&[], &runner, GasSettings::default(), input)
            .run()
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Config(_)), "got {err:?}");
        assert!(runner.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_gas_settings_edit() {
        let accounts = accounts(1);
        let runner = RecordingRunner::default();
        let input = ScriptedLines::new(&["6", "75", "", "abc", "600000", "-5", "7"]);

        let mut console = ConsoleRunner::new(&accounts, &runner, GasSettings::default(), input);
        console.run().await.unwrap();

        let gas = console.gas();
        assert_eq!(gas.max_fee_gwei.to_string(), "75");
        assert_eq!(gas.priority_fee_gwei.to_string(), "2");
        assert_eq!(gas.limits.approval, 100_000);
        assert_eq!(gas.limits.swap, 600_000);
        assert_eq!(gas.limits.stake, 100_000);
    }

    #[test]
    fn test_render_gas_settings() {
        let rendered = render_gas_settings(&GasSettings::default());
        assert!(rendered.contains("Max Fee (gwei)"));
        assert!(rendered.contains("500000"));
    }
}
