//! Keeps the two amount fields of a swap consistent under a live rate.
//!
//! Both fields live in one [`InputPair`] together with the side the user
//! edited last. An edit that repeats the current value of its field is a
//! no-op, which also swallows the echo of a value the pair wrote itself.

use super::amount::{self, AmountError, CROSS_RATE_DIGITS};
use super::token::Side;
use rust_decimal::Decimal;
use tracing::debug;

/// USD prices of both slots, present only when both are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeRates {
    from_usd: Decimal,
    to_usd: Decimal,
}

impl ExchangeRates {
    pub fn new(from_usd: Option<f64>, to_usd: Option<f64>) -> Option<Self> {
        Some(Self {
            from_usd: amount::price_to_decimal(from_usd?)?,
            to_usd: amount::price_to_decimal(to_usd?)?,
        })
    }

    pub fn usd(&self, side: Side) -> Decimal {
        match side {
            Side::From => self.from_usd,
            Side::To => self.to_usd,
        }
    }

    /// "1 TO = x FROM", rounded to five places.
    pub fn cross_rate(&self) -> Option<String> {
        let rate = self.to_usd.checked_div(self.from_usd)?;
        Some(amount::format_rounded(rate, CROSS_RATE_DIGITS))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The field already held this value; nothing was recomputed.
    Unchanged,
    /// The edited field changed. `counterpart` is the recomputed value of
    /// the other field, or `None` when rates were unavailable.
    Updated { counterpart: Option<String> },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputPair {
    from: String,
    to: String,
    last_edited: Option<Side>,
    rates: Option<ExchangeRates>,
}

impl InputPair {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, side: Side) -> &str {
        match side {
            Side::From => &self.from,
            Side::To => &self.to,
        }
    }

    pub fn last_edited(&self) -> Option<Side> {
        self.last_edited
    }

    pub fn rates(&self) -> Option<ExchangeRates> {
        self.rates
    }

    fn set(&mut self, side: Side, value: String) {
        match side {
            Side::From => self.from = value,
            Side::To => self.to = value,
        }
    }

    /// Applies a user edit to `side`.
    ///
    /// Only input failing [`amount::validate`] is rejected, and it leaves
    /// both fields untouched.
    pub fn edit(&mut self, side: Side, raw: &str) -> Result<EditOutcome, AmountError> {
        amount::validate(raw)?;

        if self.value(side) == raw {
            debug!(%side, raw, "Edit matches current value, skipping recompute");
            return Ok(EditOutcome::Unchanged);
        }

        let counterpart = self
            .rates
            .map(|rates| amount::convert(raw, rates.usd(side), rates.usd(side.other())));

        self.set(side, raw.to_string());
        self.last_edited = Some(side);
        if let Some(value) = &counterpart {
            debug!(%side, raw, counterpart = %value, "Recomputed counterpart");
            self.set(side.other(), value.clone());
        } else {
            debug!(%side, raw, "Rates unknown, counterpart left as is");
        }

        Ok(EditOutcome::Updated { counterpart })
    }

    /// Records new rates. When both prices are known and differ from the
    /// last seen rates, the `to` field is recomputed from `from`.
    ///
    /// Returns whether the `to` field was recomputed.
    pub fn apply_rates(&mut self, rates: Option<ExchangeRates>) -> bool {
        if rates == self.rates {
            return false;
        }
        self.rates = rates;

        let Some(rates) = rates else {
            return false;
        };

        let to = amount::convert(&self.from, rates.from_usd, rates.to_usd);
        debug!(from = %self.from, %to, "Rates changed, recomputed 'to'");
        self.to = to;
        true
    }

    /// Submission requires both amounts.
    pub fn can_submit(&self) -> bool {
        !self.from.is_empty() && !self.to.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair_with_rates(from_usd: f64, to_usd: f64) -> InputPair {
        let mut pair = InputPair::new();
        pair.apply_rates(ExchangeRates::new(Some(from_usd), Some(to_usd)));
        pair
    }

    #[test]
    fn test_edit_from_recomputes_to() {
        let mut pair = pair_with_rates(2.0, 4.0);
        let outcome = pair.edit(Side::From, "10").unwrap();

        assert_eq!(
            outcome,
            EditOutcome::Updated {
                counterpart: Some("5".to_string())
            }
        );
        assert_eq!(pair.value(Side::From), "10");
        assert_eq!(pair.value(Side::To), "5");
        assert_eq!(pair.last_edited(), Some(Side::From));
    }

    #[test]
    fn test_edit_to_recomputes_from() {
        let mut pair = pair_with_rates(2.0, 4.0);
        pair.edit(Side::To, "10").unwrap();

        assert_eq!(pair.value(Side::From), "20");
        assert_eq!(pair.value(Side::To), "10");
    }

    #[test]
    fn test_rejected_edit_preserves_state() {
        let mut pair = pair_with_rates(1.0, 1.0);
        pair.edit(Side::From, "1.5").unwrap();

        let err = pair.edit(Side::From, "1.00000000001").unwrap_err();
        assert!(matches!(err, AmountError::TooManyDecimals(_)));
        assert_eq!(pair.value(Side::From), "1.5");
        assert_eq!(pair.value(Side::To), "1.5");
    }

    #[test]
    fn test_repeated_edit_is_unchanged() {
        let mut pair = pair_with_rates(1.0, 3.0);
        pair.edit(Side::From, "1").unwrap();
        assert_eq!(pair.edit(Side::From, "1").unwrap(), EditOutcome::Unchanged);
    }

    #[test]
    fn test_echo_of_computed_value_is_unchanged() {
        let mut pair = pair_with_rates(1.0, 3.0);
        pair.edit(Side::From, "1").unwrap();

        let echoed = pair.value(Side::To).to_string();
        assert_eq!(pair.edit(Side::To, &echoed).unwrap(), EditOutcome::Unchanged);
        assert_eq!(pair.value(Side::From), "1");
        assert_eq!(pair.last_edited(), Some(Side::From));
    }

    #[test]
    fn test_unknown_rates_update_only_edited_field() {
        let mut pair = InputPair::new();
        pair.edit(Side::To, "7").unwrap();
        let outcome = pair.edit(Side::From, "3").unwrap();

        assert_eq!(outcome, EditOutcome::Updated { counterpart: None });
        assert_eq!(pair.value(Side::From), "3");
        assert_eq!(pair.value(Side::To), "7");
    }

    #[test]
    fn test_zero_result_clears_counterpart() {
        let mut pair = pair_with_rates(1.0, 1.0);
        pair.edit(Side::From, "100").unwrap();
        assert_eq!(pair.value(Side::To), "100");

        pair.edit(Side::From, "").unwrap();
        assert_eq!(pair.value(Side::From), "");
        assert_eq!(pair.value(Side::To), "");
        assert!(!pair.can_submit());
    }

    #[test]
    fn test_rate_change_recomputes_to_from_from() {
        let mut pair = InputPair::new();
        pair.edit(Side::From, "3").unwrap();
        assert_eq!(pair.value(Side::To), "");

        assert!(pair.apply_rates(ExchangeRates::new(Some(2.0), Some(1.0))));
        assert_eq!(pair.value(Side::To), "6");

        // Same rates again do nothing.
        assert!(!pair.apply_rates(ExchangeRates::new(Some(2.0), Some(1.0))));

        assert!(pair.apply_rates(ExchangeRates::new(Some(4.0), Some(1.0))));
        assert_eq!(pair.value(Side::To), "12");
    }

    #[test]
    fn test_losing_rates_keeps_fields() {
        let mut pair = pair_with_rates(1.0, 2.0);
        pair.edit(Side::From, "4").unwrap();

        assert!(!pair.apply_rates(None));
        assert_eq!(pair.value(Side::To), "2");
        assert!(pair.rates().is_none());
    }

    fn assert_close(value: &str, expected: f64) {
        let parsed: f64 = value.parse().unwrap();
        assert!((parsed / expected - 1.0).abs() < 1e-9, "{value}");
    }

    #[test]
    fn test_long_whole_number_is_accepted() {
        let long = "123456789012345678901234567890";
        let mut pair = pair_with_rates(1.0, 1.0);

        pair.edit(Side::From, long).unwrap();
        assert_eq!(pair.value(Side::From), long);
        assert_eq!(pair.value(Side::To), long);

        let mut pair = pair_with_rates(1.0, 2.0);
        pair.edit(Side::From, long).unwrap();
        assert_eq!(pair.value(Side::From), long);
        assert!(pair.value(Side::To).starts_with("617283945061728"));
    }

    #[test]
    fn test_equal_prices_keep_every_digit() {
        let mut pair = pair_with_rates(1.0, 1.0);
        pair.edit(Side::To, "1234567890123456789012.1234567890").unwrap();

        assert_eq!(pair.value(Side::From), "1234567890123456789012.123456789");
    }

    #[test]
    fn test_result_beyond_decimal_range_is_accepted() {
        let mut pair = pair_with_rates(1.0, 1e-12);
        let outcome = pair.edit(Side::From, "100000000000000000").unwrap();

        assert!(matches!(outcome, EditOutcome::Updated { counterpart: Some(_) }));
        assert_eq!(pair.value(Side::From), "100000000000000000");
        assert_close(pair.value(Side::To), 1e29);
    }

    #[test]
    fn test_rate_change_beyond_decimal_range_recomputes_to() {
        let mut pair = pair_with_rates(1.0, 1.0);
        pair.edit(Side::From, "100000000000000000").unwrap();
        assert_eq!(pair.value(Side::To), "100000000000000000");

        assert!(pair.apply_rates(ExchangeRates::new(Some(1.0), Some(1e-12))));
        assert_close(pair.value(Side::To), 1e29);
    }

    #[test]
    fn test_cross_rate() {
        let rates = ExchangeRates::new(Some(3.0), Some(1.0)).unwrap();
        assert_eq!(rates.cross_rate().as_deref(), Some("0.33333"));
        assert!(ExchangeRates::new(Some(1.0), None).is_none());
        assert!(ExchangeRates::new(Some(0.0), Some(1.0)).is_none());
    }
}
