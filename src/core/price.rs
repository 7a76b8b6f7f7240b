//! Pricing abstractions and core types

use super::token::Token;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Latest known USD price of one slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Quote {
    Pending,
    Ready { usd: f64, fetched_at: DateTime<Utc> },
    Failed(String),
}

impl Quote {
    pub fn from_result(result: &Result<f64>) -> Self {
        match result {
            Ok(usd) => Quote::Ready {
                usd: *usd,
                fetched_at: Utc::now(),
            },
            Err(e) => Quote::Failed(e.to_string()),
        }
    }

    pub fn usd(&self) -> Option<f64> {
        match self {
            Quote::Ready { usd, .. } => Some(*usd),
            _ => None,
        }
    }
}

#[async_trait]
pub trait PriceProvider: Send + Sync {
    async fn fetch_usd_price(&self, token_id: &str) -> Result<f64>;
}

#[async_trait]
pub trait TokenListProvider: Send + Sync {
    async fn fetch_tokens(&self) -> Result<Vec<Token>>;
}
