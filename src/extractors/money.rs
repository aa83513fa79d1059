// src/extractors/money.rs

// --- Imports ---
use crate::utils::error::ExtractError;
use num_format::{CustomFormat, Grouping, ToFormattedString};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

// --- Constants ---
pub const CURRENCY_PREFIX: &str = "R$";

// Thousands grouping with '.' (pt-BR style), used for the integer part only.
static THOUSANDS: Lazy<CustomFormat> = Lazy::new(|| {
    CustomFormat::builder()
        .grouping(Grouping::Standard)
        .separator(".")
        .build()
        .expect("Failed to build THOUSANDS format")
});

// First run of digits and separators inside a cell, without trailing punctuation.
static CELL_NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9](?:[0-9.,]*[0-9])?").expect("Failed to compile CELL_NUMBER_RE")
});

// --- Data Structures ---

/// A detected currency amount, stored as whole cents.
///
/// Always rendered in the canonical form `R$ 1.234,56`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonetaryValue {
    cents: u64,
}

impl MonetaryValue {
    pub fn from_cents(cents: u64) -> Self {
        Self { cents }
    }

    #[cfg(test)]
    pub fn cents(&self) -> u64 {
        self.cents
    }

    /// Builds a value from the pieces of a canonical match: an integer part that may
    /// carry '.' thousands separators and exactly two fraction digits.
    pub(crate) fn from_canonical_parts(integer: &str, fraction: &str) -> Result<Self, ExtractError> {
        let whole: u64 = integer
            .replace('.', "")
            .parse()
            .map_err(|_| ExtractError::MalformedFragment(format!("{},{}", integer, fraction)))?;
        let frac: u64 = fraction
            .parse()
            .map_err(|_| ExtractError::MalformedFragment(format!("{},{}", integer, fraction)))?;
        whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac))
            .map(Self::from_cents)
            .ok_or_else(|| ExtractError::MalformedFragment(format!("{},{}", integer, fraction)))
    }
}

impl fmt::Display for MonetaryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {},{:02}",
            CURRENCY_PREFIX,
            (self.cents / 100).to_formatted_string(&*THOUSANDS),
            self.cents % 100
        )
    }
}

/// Parses a single amount out of a table cell.
///
/// Accepts both decimal conventions (`1.234,56` and `1,234.56`), bare integers and
/// spreadsheet floats such as `8.99`. A lone separator followed by exactly three digits
/// is read as a thousands separator (`1.500` is fifteen hundred). More than two fraction
/// digits are rounded half-up.
pub fn parse_amount(cell: &str) -> Result<MonetaryValue, ExtractError> {
    let malformed = || ExtractError::MalformedFragment(cell.trim().to_string());

    let token = CELL_NUMBER_RE.find(cell).ok_or_else(malformed)?.as_str();

    let (decimal_sep, thousands_sep) = match (token.rfind(','), token.rfind('.')) {
        (Some(comma), Some(dot)) => {
            if comma > dot { (Some(','), Some('.')) } else { (Some('.'), Some(',')) }
        }
        (Some(_), None) => classify_single_separator(token, ','),
        (None, Some(_)) => classify_single_separator(token, '.'),
        (None, None) => (None, None),
    };

    let (integer, fraction) = match decimal_sep {
        Some(sep) => {
            let idx = token.rfind(sep).ok_or_else(malformed)?;
            (&token[..idx], &token[idx + 1..])
        }
        None => (token, ""),
    };

    let whole = parse_grouped_integer(integer, thousands_sep).ok_or_else(malformed)?;
    let frac = round_fraction(fraction).ok_or_else(malformed)?;

    whole
        .checked_mul(100)
        .and_then(|c| c.checked_add(frac))
        .map(MonetaryValue::from_cents)
        .ok_or_else(malformed)
}

/// Decides whether a token carrying only one kind of separator uses it for decimals
/// or for thousands. Returns `(decimal, thousands)`.
fn classify_single_separator(token: &str, sep: char) -> (Option<char>, Option<char>) {
    let occurrences = token.matches(sep).count();
    let digits_after_last = token.rsplit(sep).next().map(str::len).unwrap_or(0);
    if occurrences == 1 && digits_after_last != 3 {
        (Some(sep), None)
    } else {
        (None, Some(sep))
    }
}

fn parse_grouped_integer(integer: &str, thousands_sep: Option<char>) -> Option<u64> {
    let groups: Vec<&str> = match thousands_sep {
        Some(sep) => integer.split(sep).collect(),
        None => vec![integer],
    };

    let first = groups.first()?;
    if first.is_empty() || !first.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if groups.len() > 1 {
        if first.len() > 3 {
            return None;
        }
        let tail_ok = groups[1..]
            .iter()
            .all(|g| g.len() == 3 && g.bytes().all(|b| b.is_ascii_digit()));
        if !tail_ok {
            return None;
        }
    }

    groups.concat().parse().ok()
}

/// Converts fraction digits to cents, rounding half-up past the second digit.
fn round_fraction(fraction: &str) -> Option<u64> {
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let bytes = fraction.as_bytes();
    let digit = |i: usize| bytes.get(i).map(|b| u64::from(b - b'0')).unwrap_or(0);
    let cents = digit(0) * 10 + digit(1);
    if digit(2) >= 5 {
        Some(cents + 1)
    } else {
        Some(cents)
    }
}
