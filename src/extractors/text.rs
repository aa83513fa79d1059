// src/extractors/text.rs
use crate::extractors::money::{MonetaryValue, CURRENCY_PREFIX};
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

// --- Regex Patterns (Lazy Static) ---
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").expect("Failed to compile WHITESPACE_RE")
});

// OCR tends to split "R$" into "R $", "R, $" or read the dollar sign as a cent sign.
// Runs on whitespace-collapsed text, so at most one space sits on each side.
static SPLIT_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[Rr] ?[,.]? ?[$¢]").expect("Failed to compile SPLIT_PREFIX_RE")
});

// Optional prefix, 1-3 digits, '.'-separated groups of three, ',' and two decimals.
// The word boundaries keep a match from starting or ending inside a longer digit run.
// '.' and ',' are boundaries too, so `scan_values` also checks the neighbouring bytes.
static VALUE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:R\$ ?)?\b([0-9]{1,3}(?:\.[0-9]{3})*),([0-9]{2})\b")
        .expect("Failed to compile VALUE_RE")
});

/// Collapses whitespace runs to a single space, trims the ends and repairs a
/// currency prefix split apart by OCR. Idempotent.
pub fn normalize(text: &str) -> String {
    let collapsed = WHITESPACE_RE.replace_all(text.trim(), " ");
    SPLIT_PREFIX_RE
        .replace_all(&collapsed, NoExpand(CURRENCY_PREFIX))
        .into_owned()
}

/// Scans already-normalized text left to right, without any duplicate suppression.
pub(crate) fn scan_values(normalized: &str) -> Vec<MonetaryValue> {
    VALUE_RE
        .captures_iter(normalized)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            if inside_longer_number(normalized, whole.start(), whole.end()) {
                tracing::debug!("Skipping '{}': part of a longer number", whole.as_str());
                return None;
            }
            let integer = caps.get(1)?.as_str();
            let fraction = caps.get(2)?.as_str();
            match MonetaryValue::from_canonical_parts(integer, fraction) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::debug!("Skipping candidate value: {}", e);
                    None
                }
            }
        })
        .collect()
}

// True when the match at `start..end` is glued to more digits by a separator,
// as in `1.23,45` or `12,34.5`.
fn inside_longer_number(text: &str, start: usize, end: usize) -> bool {
    let bytes = text.as_bytes();
    let is_separator = |b: u8| b == b'.' || b == b',';
    let before = start >= 2 && is_separator(bytes[start - 1]) && bytes[start - 2].is_ascii_digit();
    let after = end + 1 < bytes.len() && is_separator(bytes[end]) && bytes[end + 1].is_ascii_digit();
    before || after
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(text: &str) -> Vec<String> {
        scan_values(&normalize(text)).iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("  Arroz\t5kg \r\n\n R$ 21,90  "), "Arroz 5kg R$ 21,90");
    }

    #[test]
    fn test_normalize_repairs_split_prefix() {
        assert_eq!(normalize("Total R $ 10,00"), "Total R$ 10,00");
        assert_eq!(normalize("Total R, $10,00"), "Total R$10,00");
        assert_eq!(normalize("Total R ¢ 10,00"), "Total R$ 10,00");
        assert_eq!(normalize("Total r$ 10,00"), "Total R$ 10,00");
        assert_eq!(normalize("VALOR $ 10,00"), "VALOR $ 10,00", "Trailing R of a word is not a prefix");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "",
            "   ",
            "R R $ 1,00",
            "Feijão\n\nR , $ 7,49\tR$8,00",
            "r ¢ 3,50 e R. $ 4,00",
            "linha 1\r\nlinha 2",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "normalize not idempotent for {:?}", s);
        }
    }

    #[test]
    fn test_scan_accepts_prefixed_and_bare_amounts() {
        assert_eq!(rendered("R$ 1.234,56 e 7,50 e R$9,99"), vec!["R$ 1.234,56", "R$ 7,50", "R$ 9,99"]);
    }

    #[test]
    fn test_scan_rejects_partial_digit_runs() {
        assert!(rendered("1234,56").is_empty(), "Ungrouped thousands are not canonical");
        assert!(rendered("12,505").is_empty(), "Three decimals are not canonical");
        assert!(rendered("1.2345,67").is_empty());
        assert!(rendered("Total 1.23,45").is_empty(), "Inconsistent separators are malformed");
        assert!(rendered("1,234,56").is_empty());
        assert!(rendered("12,34.5").is_empty());
        assert_eq!(rendered("Total: 10,00. Troco 2,50,"), vec!["R$ 10,00", "R$ 2,50"]);
        assert!(rendered("sem valores aqui, 12 itens.").is_empty());
    }
}
