//! mintcap: bootstrap a capped-supply ledger and mint against it.

mod commands;
mod config;

use std::path::PathBuf;

use clap::Parser;
use mintcap_types::Address;
use mintcap_utils::LogFormat;

use crate::commands::Context;
use crate::config::CliConfig;

#[derive(Parser)]
#[command(name = "mintcap", about = "Capped-supply ledger tool", version)]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Ledger state file (JSON snapshot).
    #[arg(long, global = true, env = "MINTCAP_STATE")]
    state: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, global = true, env = "MINTCAP_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, global = true, env = "MINTCAP_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Create a new ledger and write its genesis state.
    Init {
        /// Owner identity; overrides `[genesis] owner` from the config.
        #[arg(long, env = "MINTCAP_OWNER")]
        owner: Option<Address>,

        /// Overwrite an existing state file.
        #[arg(long)]
        force: bool,
    },

    /// Show token metadata, owner and supply figures.
    Info,

    /// Print the current total supply.
    TotalSupply {
        /// Print base units instead of token notation.
        #[arg(long)]
        raw: bool,
    },

    /// Print a holder's balance.
    BalanceOf {
        holder: Address,

        /// Print base units instead of token notation.
        #[arg(long)]
        raw: bool,
    },

    /// Mint new supply to a holder (owner only).
    Mint {
        /// Identity submitting the mint.
        #[arg(long, env = "MINTCAP_CALLER")]
        caller: Address,

        /// Receiving holder.
        to: Address,

        /// Amount in token notation (e.g. "50" or "0.25").
        #[arg(allow_hyphen_values = true)]
        amount: String,

        /// Interpret `amount` as base units.
        #[arg(long)]
        raw: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let file_config = match cli.config {
        Some(ref path) => CliConfig::from_toml_file(path)?,
        None => CliConfig::default(),
    };

    mintcap_utils::init_logging(
        cli.log_format.unwrap_or(file_config.log_format),
        cli.log_level.as_deref().unwrap_or(&file_config.log_level),
    );
    if let Some(ref path) = cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    let ctx = Context {
        state_path: cli.state.unwrap_or(file_config.state_path),
        genesis: file_config.genesis,
    };

    let output = match cli.command {
        Command::Init { owner, force } => commands::init(&ctx, owner, force)?,
        Command::Info => commands::info(&ctx)?,
        Command::TotalSupply { raw } => commands::total_supply(&ctx, raw)?,
        Command::BalanceOf { holder, raw } => commands::balance_of(&ctx, &holder, raw)?,
        Command::Mint {
            caller,
            to,
            amount,
            raw,
        } => commands::mint(&ctx, &caller, &to, &amount, raw)?,
    };
    println!("{output}");

    Ok(())
}
