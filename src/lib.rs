pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

pub use crate::core::config;

use crate::core::cache::Cache;
use crate::core::config::AppConfig;
use crate::core::{LocalStorage, PriceProvider, Token, TokenListProvider};
use crate::providers::coingecko::{CoinGeckoPriceProvider, CoinGeckoTokenList};
use crate::store::memory::MemoryCache;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub enum AppCommand {
    /// One-shot conversion of `amount` between two tokens.
    Quote {
        from: Option<String>,
        to: Option<String>,
        amount: String,
        reverse: bool,
    },
    /// Fuzzy search of the token universe.
    Search {
        query: String,
        limit: Option<usize>,
    },
    /// Show or reset the recently used tokens.
    Recent { clear: bool },
    /// Interactive swap session on stdin/stdout.
    Swap,
}

/// Providers and storage shared by every command.
pub struct AppContext {
    pub config: AppConfig,
    pub price_provider: Arc<dyn PriceProvider>,
    pub token_list: Arc<dyn TokenListProvider>,
    pub storage: Arc<dyn LocalStorage>,
}

impl AppContext {
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let price_cache: Arc<dyn Cache<String, f64>> = Arc::new(MemoryCache::new());
        let list_cache: Arc<dyn Cache<String, Vec<Token>>> = Arc::new(MemoryCache::new());

        let coingecko = &config.providers.coingecko;
        let price_provider = Arc::new(CoinGeckoPriceProvider::new(coingecko, price_cache)?);
        let token_list = Arc::new(CoinGeckoTokenList::new(coingecko, list_cache)?);
        let storage = store::open_local_storage(&config);

        Ok(Self {
            config,
            price_provider,
            token_list,
            storage,
        })
    }
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("swapcalc starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let ctx = AppContext::from_config(config)?;

    match command {
        AppCommand::Quote {
            from,
            to,
            amount,
            reverse,
        } => cli::quote::run(&ctx, from.as_deref(), to.as_deref(), &amount, reverse).await,
        AppCommand::Search { query, limit } => cli::search::run(&ctx, &query, limit).await,
        AppCommand::Recent { clear } => cli::recent::run(ctx.storage.as_ref(), clear),
        AppCommand::Swap => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            cli::session::run(&ctx, stdin, &mut std::io::stdout()).await
        }
    }
}
