use super::util::{http_client, with_retry};
use crate::core::cache::Cache;
use crate::core::config::CoinGeckoProviderConfig;
use crate::core::{PriceProvider, Token, TokenListProvider};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

const RETRY_DELAY_MS: u64 = 500;

/// `{ "<id>": { "usd": 1.0 } }`
type SimplePriceResponse = HashMap<String, UsdPrice>;

#[derive(Debug, Deserialize)]
struct UsdPrice {
    usd: Option<f64>,
}

/// Fetches a request body, retrying transport failures and rejecting
/// error statuses and empty bodies.
async fn fetch_body(client: &reqwest::Client, url: &str, retries: usize) -> Result<String> {
    debug!("Requesting {}", url);
    let response = with_retry(|| async { client.get(url).send().await }, retries, RETRY_DELAY_MS)
        .await
        .with_context(|| format!("Failed to send request to {url}"))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .with_context(|| format!("Failed to get response text from {url}"))?;

    if !status.is_success() {
        return Err(anyhow!("Request to {} failed with status {}: '{}'", url, status, body));
    }
    if body.trim().is_empty() {
        return Err(anyhow!("Received empty response from {}", url));
    }
    Ok(body)
}

/// USD prices from CoinGecko's `/simple/price` endpoint.
pub struct CoinGeckoPriceProvider {
    base_url: String,
    client: reqwest::Client,
    cache: Arc<dyn Cache<String, f64>>,
    staleness: Duration,
    retries: usize,
}

impl CoinGeckoPriceProvider {
    pub fn new(config: &CoinGeckoProviderConfig, cache: Arc<dyn Cache<String, f64>>) -> Result<Self> {
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client: http_client()?,
            cache,
            staleness: config.staleness(),
            retries: config.retries,
        })
    }

    fn price_url(&self, token_id: &str) -> Result<String> {
        let url = reqwest::Url::parse_with_params(
            &format!("{}/simple/price", self.base_url),
            &[("vs_currencies", "USD"), ("ids", token_id)],
        )
        .with_context(|| format!("Invalid price URL for {token_id}"))?;
        Ok(url.into())
    }
}

#[async_trait]
impl PriceProvider for CoinGeckoPriceProvider {
    async fn fetch_usd_price(&self, token_id: &str) -> Result<f64> {
        let url = self.price_url(token_id)?;
        if let Some(cached) = self.cache.get(&url).await {
            return Ok(cached);
        }

        let body = fetch_body(&self.client, &url, self.retries).await?;
        let prices: SimplePriceResponse = serde_json::from_str(&body).with_context(|| {
            format!("Failed to parse price response for {token_id}. Response: '{body}'")
        })?;

        let usd = prices
            .get(token_id)
            .and_then(|p| p.usd)
            .ok_or_else(|| anyhow!("No USD price returned for {}", token_id))?;

        debug!("Fetched USD price for {}: {}", token_id, usd);
        self.cache.put(url, usd, Some(self.staleness)).await;
        Ok(usd)
    }
}

/// The token universe from CoinGecko's `/coins/list` endpoint. Fetched once
/// and kept for the life of the process.
pub struct CoinGeckoTokenList {
    base_url: String,
    client: reqwest::Client,
    cache: Arc<dyn Cache<String, Vec<Token>>>,
    retries: usize,
}

impl CoinGeckoTokenList {
    pub fn new(
        config: &CoinGeckoProviderConfig,
        cache: Arc<dyn Cache<String, Vec<Token>>>,
    ) -> Result<Self> {
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client: http_client()?,
            cache,
            retries: config.retries,
        })
    }
}

#[async_trait]
impl TokenListProvider for CoinGeckoTokenList {
    async fn fetch_tokens(&self) -> Result<Vec<Token>> {
        let url = format!("{}/coins/list", self.base_url);
        if let Some(cached) = self.cache.get(&url).await {
            return Ok(cached);
        }

        let body = fetch_body(&self.client, &url, self.retries).await?;
        let tokens: Vec<Token> = match serde_json::from_str(&body) {
            Ok(tokens) => tokens,
            Err(e) => {
                error!(error = ?e, "Failed to parse token list response");
                return Err(e).context("Failed to parse token list response");
            }
        };

        debug!("Fetched {} tokens", tokens.len());
        self.cache.put(url, tokens.clone(), None).await;
        Ok(tokens)
    }
}
