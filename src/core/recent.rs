//! Most-recently-used token list

use super::ring::FixedRing;
use super::storage::LocalStorage;
use super::token::Token;
use anyhow::{Context, Result};
use tracing::{debug, warn};

/// Number of recency slots.
pub const RECENT_CAPACITY: usize = 7;

/// Storage key of the persisted list.
pub const RECENT_KEY: &str = "recent";

/// The seven most recently picked tokens, newest first.
///
/// Re-inserting a token does not remove its older copies.
#[derive(Debug, Clone, PartialEq)]
pub struct RecencyList {
    ring: FixedRing<Token>,
}

impl Default for RecencyList {
    fn default() -> Self {
        Self {
            ring: FixedRing::filled_with(RECENT_CAPACITY, Token::placeholder),
        }
    }
}

impl RecencyList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        if tokens.len() != RECENT_CAPACITY {
            debug!(
                "Recency list has {} entries, normalizing to {}",
                tokens.len(),
                RECENT_CAPACITY
            );
        }
        Self {
            ring: FixedRing::from_items(RECENT_CAPACITY, tokens, Token::placeholder),
        }
    }

    /// Writes `token` at the front with an upper-cased symbol, evicting the
    /// oldest entry.
    pub fn insert_most_recent(&mut self, token: &Token) {
        let mut entry = token.clone();
        entry.symbol = entry.symbol.to_uppercase();
        self.ring.push_front(entry);
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.ring.get(index)
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().all(Token::is_placeholder)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.ring.iter()
    }

    pub fn to_json(&self) -> Result<String> {
        let tokens: Vec<&Token> = self.iter().collect();
        serde_json::to_string(&tokens).context("Failed to serialize recency list")
    }

    /// Loads the list from `storage`, falling back to an empty list when the
    /// key is missing or its content is unreadable.
    pub fn load(storage: &dyn LocalStorage) -> Self {
        let raw = match storage.get_item(RECENT_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No stored recency list, starting empty");
                return Self::default();
            }
            Err(e) => {
                warn!(error = %e, "Failed to read recency list, starting empty");
                return Self::default();
            }
        };

        match serde_json::from_str::<Vec<Token>>(&raw) {
            Ok(tokens) => Self::from_tokens(tokens),
            Err(e) => {
                warn!(error = %e, "Stored recency list is corrupt, starting empty");
                Self::default()
            }
        }
    }

    pub fn save(&self, storage: &dyn LocalStorage) -> Result<()> {
        storage.set_item(RECENT_KEY, &self.to_json()?)
    }

    /// Drops the stored list; the next load starts empty.
    pub fn forget(storage: &dyn LocalStorage) -> Result<()> {
        storage.remove_item(RECENT_KEY)
    }
}
