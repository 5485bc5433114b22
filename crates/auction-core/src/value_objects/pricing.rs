//! Pricing rules: the minimum-increment ladder and amount parsing/formatting
//!
//! All amounts are in the marketplace's base currency unit (PokéCoins).
//! Pure functions, no side effects.

use std::fmt::Write as _;

/// The increment ladder: price bands paired with the minimum raise required
/// at that band. Bands are checked in order; the first one whose upper bound
/// exceeds the current bid wins.
const LADDER: [(i64, i64); 9] = [
    (20_000, 1_000),
    (50_000, 2_000),
    (100_000, 5_000),
    (200_000, 10_000),
    (300_000, 15_000),
    (500_000, 20_000),
    (750_000, 25_000),
    (1_000_000, 30_000),
    (2_000_000, 40_000),
];

/// Increment required above the top ladder band
const TOP_INCREMENT: i64 = 50_000;

/// Minimum raise required over the given current bid.
///
/// Non-decreasing in `current`; any current bid at or below zero maps to the
/// smallest increment.
pub fn min_increment(current: i64) -> i64 {
    if current <= 0 {
        return LADDER[0].1;
    }
    for (upper, increment) in LADDER {
        if current < upper {
            return increment;
        }
    }
    TOP_INCREMENT
}

/// Error when parsing an amount from user input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountParseError {
    #[error("amount is empty")]
    Empty,
    #[error("not a valid amount: {0}")]
    Invalid(String),
    #[error("amount must be positive")]
    NotPositive,
}

/// Parse a user-entered amount.
///
/// Accepts plain digits, `,`/`_` separators, and `k`/`m` suffixes with an
/// optional fractional part: `"19k"` → 19,000, `"1.5m"` → 1,500,000.
pub fn parse_amount(input: &str) -> Result<i64, AmountParseError> {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '_' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Err(AmountParseError::Empty);
    }

    let lower = cleaned.to_lowercase();
    let (number, multiplier) = match lower.strip_suffix('k') {
        Some(rest) => (rest, 1_000_f64),
        None => match lower.strip_suffix('m') {
            Some(rest) => (rest, 1_000_000_f64),
            None => (lower.as_str(), 1_f64),
        },
    };

    let value: f64 = number
        .parse()
        .map_err(|_| AmountParseError::Invalid(input.trim().to_string()))?;
    if !value.is_finite() {
        return Err(AmountParseError::Invalid(input.trim().to_string()));
    }

    let amount = (value * multiplier).round() as i64;
    if amount <= 0 {
        return Err(AmountParseError::NotPositive);
    }
    Ok(amount)
}

/// Format an amount with a `K`/`M` suffix: 1,500,000 → `"1.5M"`.
pub fn format_amount(amount: i64) -> String {
    if amount >= 1_000_000 {
        format_scaled(amount, 1_000_000, 'M')
    } else if amount >= 1_000 {
        format_scaled(amount, 1_000, 'K')
    } else {
        amount.to_string()
    }
}

fn format_scaled(amount: i64, unit: i64, suffix: char) -> String {
    let whole = amount / unit;
    // One decimal place, dropped when it is zero
    let tenth = (amount % unit) * 10 / unit;
    let mut out = String::new();
    if tenth == 0 {
        let _ = write!(out, "{whole}{suffix}");
    } else {
        let _ = write!(out, "{whole}.{tenth}{suffix}");
    }
    out
}
