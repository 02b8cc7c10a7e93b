//! R2USD bot CLI
//!
//! Interactive console by default; `balances` and `batch` run once and exit.

use clap::{Parser, Subcommand, ValueEnum};
use r2usd_bot::balance::{render_table, snapshots};
use r2usd_bot::chain::connect_accounts;
use r2usd_bot::config::proxy::load_proxies;
use r2usd_bot::runner::{parse_wallet_selection, WalletSelection};
use r2usd_bot::wallet::private_keys_from_env;
use r2usd_bot::{
    run_batch, Account, Action, ActionExecutor, Amount, Config, ConsoleRunner, Error, Result,
    RpcConfig, StdinLines,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "r2usd-bot")]
#[command(about = "USDC/R2USD/sR2USD automation bot for Sepolia")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive menu (default)
    Run,

    /// Print balances for every wallet
    Balances,

    /// Run one batch without prompts
    Batch {
        #[arg(short, long, value_enum)]
        action: BatchAction,

        /// Amount per transaction, in the input token (ignored by `balances`)
        #[arg(long, default_value = "0")]
        amount: String,

        /// Repetitions per wallet
        #[arg(short, long, default_value_t = 1)]
        repeat: u32,

        /// Wallet number or "all"
        #[arg(short, long, default_value = "all")]
        wallet: String,
    },

    /// Show current configuration
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum BatchAction {
    SwapIn,
    SwapOut,
    Stake,
    Auto,
    Balances,
}

impl From<BatchAction> for Action {
    fn from(action: BatchAction) -> Self {
        match action {
            BatchAction::SwapIn => Action::SwapIn,
            BatchAction::SwapOut => Action::SwapOut,
            BatchAction::Stake => Action::Stake,
            BatchAction::Auto => Action::Auto,
            BatchAction::Balances => Action::Balances,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let command = cli.command.unwrap_or(Commands::Run);
    if let Commands::Config = command {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    tracing::info!("USDC/R2USD/sR2USD Bot Starting on Sepolia Testnet...");
    let accounts = load_accounts(&config).await?;

    match command {
        Commands::Run => {
            let executor = ActionExecutor::new(config.clone());
            let mut console = ConsoleRunner::new(&accounts, &executor, config.gas.clone(), StdinLines::new());
            console.run().await?;
        }
        Commands::Balances => {
            println!("{}", render_table(&snapshots(&accounts).await));
        }
        Commands::Batch {
            action,
            amount,
            repeat,
            wallet,
        } => {
            run_once(&config, &accounts, action.into(), &amount, repeat, &wallet).await?;
        }
        Commands::Config => {}
    }

    Ok(())
}

async fn load_accounts(config: &Config) -> Result<Vec<Account>> {
    let keys = private_keys_from_env()?;
    let proxies = match &config.proxies_file {
        Some(path) => load_proxies(Path::new(path))?,
        None => Vec::new(),
    };
    let rpc = RpcConfig::from_env(config);

    let accounts = connect_accounts(&keys, &rpc, &proxies).await;
    if accounts.is_empty() {
        return Err(Error::Config("No valid wallets initialized".to_string()));
    }
    Ok(accounts)
}

async fn run_once(
    config: &Config,
    accounts: &[Account],
    action: Action,
    amount: &str,
    repeat: u32,
    wallet: &str,
) -> Result<()> {
    let amount = match action {
        Action::Balances => Amount::zero(),
        _ => Amount::parse_positive(amount)?,
    };
    if repeat == 0 {
        return Err(Error::InvalidArgument("--repeat must be at least 1".to_string()));
    }

    let selected: Vec<Account> = match parse_wallet_selection(wallet, accounts.len()) {
        Some(WalletSelection::All) => accounts.to_vec(),
        Some(WalletSelection::One(index)) => vec![accounts[index].clone()],
        None => {
            return Err(Error::InvalidArgument(format!(
                "Invalid wallet '{}': expected 1-{} or \"all\"",
                wallet,
                accounts.len()
            )))
        }
    };

    let executor = ActionExecutor::new(config.clone());
    let report = run_batch(&executor, &selected, action, &amount, repeat, &config.gas).await;

    for wallet in &report.wallets {
        println!(
            "{}  {}/{} successful",
            wallet.address, wallet.successes, wallet.attempts
        );
    }
    Ok(())
}
