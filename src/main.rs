use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use swapcalc::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for swapcalc::AppCommand {
    fn from(cmd: Commands) -> swapcalc::AppCommand {
        match cmd {
            Commands::Quote {
                amount,
                from,
                to,
                reverse,
            } => swapcalc::AppCommand::Quote {
                from,
                to,
                amount,
                reverse,
            },
            Commands::Search { query, limit } => swapcalc::AppCommand::Search { query, limit },
            Commands::Recent { clear } => swapcalc::AppCommand::Recent { clear },
            Commands::Swap => swapcalc::AppCommand::Swap,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount between two tokens
    Quote {
        /// Amount to convert, up to 10 decimal places
        amount: String,
        /// Token id to pay with, defaults to the configured pair
        #[arg(long)]
        from: Option<String>,
        /// Token id to receive, defaults to the configured pair
        #[arg(long)]
        to: Option<String>,
        /// Treat the amount as the amount to receive
        #[arg(short, long)]
        reverse: bool,
    },
    /// Search tokens by symbol
    Search {
        #[arg(default_value = "")]
        query: String,
        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show recently picked tokens
    Recent {
        /// Forget all recent tokens
        #[arg(long)]
        clear: bool,
    },
    /// Start an interactive swap session
    Swap,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => swapcalc::cli::setup::setup(),
        Some(cmd) => swapcalc::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
