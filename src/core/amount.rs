//! Decimal amount validation, parsing and conversion.
//!
//! Amounts are computed exactly with `Decimal` when they fit its 28
//! significant digits. Longer amounts fall back to `f64`, rounded to ten
//! places.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

/// Most fractional digits an amount may carry.
pub const MAX_FRACTION_DIGITS: u32 = 10;

/// Fractional digits shown for the cross rate.
pub const CROSS_RATE_DIGITS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("Only up to 10 decimal places are allowed: '{0}'")]
    TooManyDecimals(String),
    #[error("Not a valid amount: '{0}'")]
    Malformed(String),
}

/// Checks `raw` against "digits, an optional '.', at most ten digits after it".
pub fn validate(raw: &str) -> Result<(), AmountError> {
    let (whole, fraction) = match raw.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (raw, None),
    };

    if !whole.chars().all(|c| c.is_ascii_digit()) {
        return Err(AmountError::Malformed(raw.to_string()));
    }

    if let Some(fraction) = fraction {
        if !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(AmountError::Malformed(raw.to_string()));
        }
        if fraction.len() > MAX_FRACTION_DIGITS as usize {
            return Err(AmountError::TooManyDecimals(raw.to_string()));
        }
    }

    Ok(())
}

/// Canonical text of a valid amount: no leading zeros in the whole part, no
/// trailing zeros in the fraction. Zero is the empty string.
pub fn canonical(raw: &str) -> String {
    let (whole, fraction) = raw.split_once('.').unwrap_or((raw, ""));
    let whole = whole.trim_start_matches('0');
    let fraction = fraction.trim_end_matches('0');
    match (whole.is_empty(), fraction.is_empty()) {
        (true, true) => String::new(),
        (true, false) => format!("0.{fraction}"),
        (false, true) => whole.to_string(),
        (false, false) => format!("{whole}.{fraction}"),
    }
}

/// Parses a valid amount. Empty input and a lone '.' read as zero.
///
/// `Ok(None)` means the amount is valid but does not fit a `Decimal`
/// without losing digits.
pub fn parse(raw: &str) -> Result<Option<Decimal>, AmountError> {
    validate(raw)?;

    let text = canonical(raw);
    if text.is_empty() {
        return Ok(Some(Decimal::ZERO));
    }
    match Decimal::from_str(&text) {
        Ok(value) if value.normalize().to_string() == text => Ok(Some(value)),
        _ => Ok(None),
    }
}

/// Converts a USD price into a `Decimal`. Zero, negative and non-finite
/// prices are treated as unknown.
pub fn price_to_decimal(usd: f64) -> Option<Decimal> {
    if !usd.is_finite() || usd <= 0.0 {
        return None;
    }
    Decimal::from_f64(usd).filter(|d| !d.is_zero())
}

/// Renders an amount rounded to `dp` places without trailing zeros.
pub fn format_rounded(value: Decimal, dp: u32) -> String {
    value
        .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
        .to_string()
}

fn scale_exact(value: Decimal, mul: Decimal, div: Decimal) -> Option<String> {
    let scaled = value.checked_mul(mul)?.checked_div(div)?;
    let rounded = scaled.round_dp_with_strategy(
        MAX_FRACTION_DIGITS,
        RoundingStrategy::MidpointAwayFromZero,
    );
    Some(canonical(&rounded.normalize().to_string()))
}

fn scale_approx(text: &str, mul: Decimal, div: Decimal) -> Option<String> {
    let value: f64 = text.parse().ok()?;
    let scaled = value * mul.to_f64()? / div.to_f64()?;
    if !scaled.is_finite() {
        return None;
    }
    Some(canonical(&format!("{:.*}", MAX_FRACTION_DIGITS as usize, scaled)))
}

/// Computes `raw * mul / div` rounded to ten places. `raw` must be valid.
///
/// A zero result is rendered as an empty string so the counterpart field
/// clears instead of showing "0". A result that cannot be represented at
/// all is also empty.
pub fn scale(raw: &str, mul: Decimal, div: Decimal) -> String {
    let text = canonical(raw);
    if text.is_empty() || mul == div {
        return text;
    }

    if let Ok(Some(value)) = parse(&text) {
        if let Some(result) = scale_exact(value, mul, div) {
            return result;
        }
    }

    debug!(amount = %text, "Amount exceeds decimal precision, using f64");
    scale_approx(&text, mul, div).unwrap_or_else(|| {
        warn!(amount = %text, %mul, %div, "Conversion out of range, clearing result");
        String::new()
    })
}

/// Computes `amount * edited_usd / other_usd` for the counterpart field.
pub fn convert(raw: &str, edited_usd: Decimal, other_usd: Decimal) -> String {
    scale(raw, edited_usd, other_usd)
}

/// USD value of an amount field, e.g. "$ 150.5". `None` when the field is
/// empty, invalid or the price is unknown.
pub fn usd_value(raw: &str, usd: Option<f64>) -> Option<String> {
    if raw.is_empty() || validate(raw).is_err() {
        return None;
    }
    let usd = price_to_decimal(usd?)?;
    let value = scale(raw, usd, Decimal::ONE);
    Some(format!("$ {}", if value.is_empty() { "0" } else { &value }))
}
