//! Token and token pair types

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// A token as listed by the market-data API.
///
/// Fields other than `id`, `name` and `symbol` are kept verbatim in `extra`
/// so a stored token round-trips without losing data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub id: String,
    pub name: String,
    pub symbol: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Token {
    pub fn new(id: &str, name: &str, symbol: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            symbol: symbol.to_string(),
            extra: serde_json::Map::new(),
        }
    }

    /// An unused recency slot.
    pub fn placeholder() -> Self {
        Self::default()
    }

    pub fn is_placeholder(&self) -> bool {
        self.id.is_empty() && self.symbol.is_empty()
    }

    pub fn display_symbol(&self) -> String {
        self.symbol.to_uppercase()
    }
}

/// One of the two slots of a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    From,
    To,
}

impl Side {
    pub fn index(self) -> usize {
        match self {
            Side::From => 0,
            Side::To => 1,
        }
    }

    pub fn other(self) -> Side {
        match self {
            Side::From => Side::To,
            Side::To => Side::From,
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Side::From => "from",
                Side::To => "to",
            }
        )
    }
}

impl FromStr for Side {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "from" | "0" => Ok(Side::From),
            "to" | "1" => Ok(Side::To),
            _ => Err(anyhow::anyhow!("Invalid side: {} (expected 'from' or 'to')", s)),
        }
    }
}

/// The two tokens being swapped. Both slots are always populated.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenPair {
    slots: [Token; 2],
}

impl TokenPair {
    pub fn new(from: Token, to: Token) -> Self {
        Self { slots: [from, to] }
    }

    pub fn get(&self, side: Side) -> &Token {
        &self.slots[side.index()]
    }

    /// Puts `token` into `side` and returns the token it displaced.
    pub fn replace(&mut self, side: Side, token: Token) -> Token {
        std::mem::replace(&mut self.slots[side.index()], token)
    }

    pub fn from_token(&self) -> &Token {
        self.get(Side::From)
    }

    pub fn to_token(&self) -> &Token {
        self.get(Side::To)
    }
}

impl Default for TokenPair {
    fn default() -> Self {
        Self::new(
            Token::new("dai", "dai", "dai"),
            Token::new("usd-coin", "usdc", "usdc"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_keeps_unknown_fields() {
        let json = r#"{"id":"bitcoin","name":"Bitcoin","symbol":"btc","platforms":{}}"#;
        let token: Token = serde_json::from_str(json).unwrap();

        assert_eq!(token.id, "bitcoin");
        assert_eq!(token.display_symbol(), "BTC");
        assert!(token.extra.contains_key("platforms"));

        let back = serde_json::to_value(&token).unwrap();
        assert!(back.get("platforms").is_some());
    }

    #[test]
    fn test_placeholder() {
        assert!(Token::placeholder().is_placeholder());
        assert!(!Token::new("dai", "dai", "dai").is_placeholder());
    }

    #[test]
    fn test_pair_replace_keeps_other_slot() {
        let mut pair = TokenPair::default();
        let old = pair.replace(Side::To, Token::new("ethereum", "Ethereum", "eth"));

        assert_eq!(old.id, "usd-coin");
        assert_eq!(pair.to_token().id, "ethereum");
        assert_eq!(pair.from_token().id, "dai");
    }

    #[test]
    fn test_side_parsing() {
        assert_eq!("from".parse::<Side>().unwrap(), Side::From);
        assert_eq!("TO".parse::<Side>().unwrap(), Side::To);
        assert_eq!("1".parse::<Side>().unwrap(), Side::To);
        assert!("left".parse::<Side>().is_err());
        assert_eq!(Side::From.other(), Side::To);
    }
}
