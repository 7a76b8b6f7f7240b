use super::search::DEFAULT_THRESHOLD;
use super::token::{Token, TokenPair};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_COINGECKO_URL: &str = "https://api.coingecko.com/api/v3";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CoinGeckoProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Seconds a fetched price stays fresh.
    #[serde(default = "default_staleness_secs")]
    pub staleness_secs: u64,
    /// Retries after a failed request.
    #[serde(default = "default_retries")]
    pub retries: usize,
}

fn default_base_url() -> String {
    DEFAULT_COINGECKO_URL.to_string()
}

fn default_staleness_secs() -> u64 {
    30
}

fn default_retries() -> usize {
    3
}

impl Default for CoinGeckoProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            staleness_secs: default_staleness_secs(),
            retries: default_retries(),
        }
    }
}

impl CoinGeckoProviderConfig {
    pub fn staleness(&self) -> Duration {
        Duration::from_secs(self.staleness_secs)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub coingecko: CoinGeckoProviderConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TokenConfig {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
}

impl From<&TokenConfig> for Token {
    fn from(config: &TokenConfig) -> Self {
        let name = config.name.as_deref().unwrap_or(&config.id);
        let symbol = config.symbol.as_deref().unwrap_or(name);
        Token::new(&config.id, name, symbol)
    }
}

impl From<&Token> for TokenConfig {
    fn from(token: &Token) -> Self {
        Self {
            id: token.id.clone(),
            name: Some(token.name.clone()),
            symbol: Some(token.symbol.clone()),
        }
    }
}

/// Tokens selected when a session starts.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PairConfig {
    pub from: TokenConfig,
    pub to: TokenConfig,
}

impl Default for PairConfig {
    fn default() -> Self {
        let pair = TokenPair::default();
        Self {
            from: pair.from_token().into(),
            to: pair.to_token().into(),
        }
    }
}

impl PairConfig {
    pub fn to_pair(&self) -> TokenPair {
        TokenPair::new((&self.from).into(), (&self.to).into())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SearchConfig {
    /// Highest score still counted as a match, between 0 and 1.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Most results listed at once.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_limit() -> usize {
    20
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            limit: default_limit(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub pair: PairConfig,
    #[serde(default)]
    pub search: SearchConfig,
    pub data_path: Option<String>,
}

impl AppConfig {
    /// Loads the config from the default location, or returns defaults when
    /// no config file exists there.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "swapcalc", "swapcalc")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("io", "swapcalc", "swapcalc")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
