//! Token picker state: which slot is being replaced, the search query and
//! the selection rules.

use super::recent::RecencyList;
use super::search::FuzzySearch;
use super::token::{Side, Token, TokenPair};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PickerError {
    #[error("The token picker is not open")]
    NotOpen,
    #[error("No recent token at position {0}")]
    EmptyRecentSlot(usize),
    #[error("{0} is already selected for this side")]
    AlreadySelected(String),
}

#[derive(Debug, Clone, Default)]
pub struct TokenPicker {
    target: Option<Side>,
    query: String,
    search: FuzzySearch,
}

impl TokenPicker {
    pub fn new(search: FuzzySearch) -> Self {
        Self {
            target: None,
            query: String::new(),
            search,
        }
    }

    pub fn open(&mut self, side: Side) {
        debug!(%side, "Opening token picker");
        self.target = Some(side);
    }

    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<Side> {
        self.target
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    /// Tokens matching the current query.
    pub fn candidates<'a>(&self, universe: &'a [Token]) -> Vec<&'a Token> {
        self.search.search(universe, &self.query)
    }

    /// Closes the picker and clears the query. Used both after a selection
    /// and when the user interacts outside the picker.
    pub fn dismiss(&mut self) {
        self.target = None;
        self.query.clear();
    }

    fn checked_target(&self, pair: &TokenPair, token: &Token) -> Result<Side, PickerError> {
        let side = self.target.ok_or(PickerError::NotOpen)?;
        if pair.get(side).id == token.id {
            return Err(PickerError::AlreadySelected(token.display_symbol()));
        }
        Ok(side)
    }

    /// Selects a token from the search results. The token is also recorded
    /// in `recent`.
    pub fn select_listed(
        &mut self,
        token: &Token,
        pair: &mut TokenPair,
        recent: &mut RecencyList,
    ) -> Result<Side, PickerError> {
        let side = self.checked_target(pair, token)?;
        pair.replace(side, token.clone());
        recent.insert_most_recent(token);
        self.dismiss();
        debug!(%side, token = %token.id, "Selected token from list");
        Ok(side)
    }

    /// Selects the recent token at `index`. The recency list is left as is.
    pub fn select_recent(
        &mut self,
        index: usize,
        pair: &mut TokenPair,
        recent: &RecencyList,
    ) -> Result<Side, PickerError> {
        let token = recent
            .get(index)
            .filter(|t| !t.is_placeholder())
            .ok_or(PickerError::EmptyRecentSlot(index))?;
        let side = self.checked_target(pair, token)?;
        pair.replace(side, token.clone());
        self.dismiss();
        debug!(%side, token = %token.id, "Selected token from recents");
        Ok(side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn universe() -> Vec<Token> {
        vec![
            Token::new("bitcoin", "Bitcoin", "btc"),
            Token::new("ethereum", "Ethereum", "eth"),
            Token::new("dai", "dai", "dai"),
        ]
    }

    #[test]
    fn test_select_listed_replaces_slot_and_records_recent() {
        let tokens = universe();
        let mut pair = TokenPair::default();
        let mut recent = RecencyList::new();
        let mut picker = TokenPicker::default();

        picker.open(Side::To);
        picker.set_query("eth");
        let candidates = picker.candidates(&tokens);
        assert_eq!(candidates[0].id, "ethereum");

        let side = picker
            .select_listed(candidates[0], &mut pair, &mut recent)
            .unwrap();

        assert_eq!(side, Side::To);
        assert_eq!(pair.to_token().id, "ethereum");
        assert_eq!(pair.from_token().id, "dai");
        assert_eq!(recent.get(0).unwrap().symbol, "ETH");
        assert!(!picker.is_open());
        assert_eq!(picker.query(), "");
    }

    #[test]
    fn test_select_recent_leaves_recents_untouched() {
        let mut pair = TokenPair::default();
        let mut recent = RecencyList::new();
        recent.insert_most_recent(&Token::new("bitcoin", "Bitcoin", "btc"));
        recent.insert_most_recent(&Token::new("ethereum", "Ethereum", "eth"));
        let before = recent.clone();

        let mut picker = TokenPicker::default();
        picker.open(Side::From);
        picker.select_recent(1, &mut pair, &recent).unwrap();

        assert_eq!(pair.from_token().id, "bitcoin");
        assert_eq!(recent, before);
        assert!(!picker.is_open());
    }

    #[test]
    fn test_placeholder_recent_is_rejected() {
        let mut pair = TokenPair::default();
        let recent = RecencyList::new();
        let mut picker = TokenPicker::default();
        picker.open(Side::From);

        assert_eq!(
            picker.select_recent(0, &mut pair, &recent),
            Err(PickerError::EmptyRecentSlot(0))
        );
        assert_eq!(
            picker.select_recent(9, &mut pair, &recent),
            Err(PickerError::EmptyRecentSlot(9))
        );
        assert!(picker.is_open());
    }

    #[test]
    fn test_current_token_is_rejected() {
        let tokens = universe();
        let mut pair = TokenPair::default();
        let mut recent = RecencyList::new();
        let mut picker = TokenPicker::default();
        picker.open(Side::From);

        let dai = &tokens[2];
        assert_eq!(
            picker.select_listed(dai, &mut pair, &mut recent),
            Err(PickerError::AlreadySelected("DAI".to_string()))
        );
        assert!(recent.is_empty());
    }

    #[test]
    fn test_selection_requires_open_picker() {
        let tokens = universe();
        let mut pair = TokenPair::default();
        let mut recent = RecencyList::new();
        let mut picker = TokenPicker::default();

        assert_eq!(
            picker.select_listed(&tokens[0], &mut pair, &mut recent),
            Err(PickerError::NotOpen)
        );
    }

    #[test]
    fn test_dismiss_clears_query() {
        let mut picker = TokenPicker::default();
        picker.open(Side::To);
        picker.set_query("btc");
        picker.dismiss();

        assert!(!picker.is_open());
        assert_eq!(picker.query(), "");
    }
}
