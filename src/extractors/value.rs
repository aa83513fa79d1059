// src/extractors/value.rs

// --- Imports ---
use crate::extractors::config::ExtractorConfig;
use crate::extractors::fuzzy::partial_ratio;
use crate::extractors::money::{parse_amount, MonetaryValue};
use crate::extractors::table::Table;
use crate::extractors::text::{normalize, scan_values};
use crate::utils::error::ExtractError;
use std::fmt;

// --- Constants ---
// Column-name fragments that mark a state/region column usable as a row label.
const LABEL_COLUMN_HINTS: [&str; 2] = ["estado", "uf"];
// Tokens shorter than this (or than the item itself) are not scored in blob mode.
const MIN_SCORED_TOKEN_CHARS: usize = 3;

// --- Data Structures ---

/// Outcome of a query-scoped lookup.
///
/// `NotFound` means nothing matched the query above threshold. `Found` with an empty
/// vector means a location matched but held no values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(Vec<T>),
    NotFound,
}

/// A value paired with the label of the row it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowValue {
    pub label: String,
    pub value: MonetaryValue,
}

impl fmt::Display for RowValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.value)
    }
}

// --- Main Extractor Structure ---
#[derive(Debug, Clone, Default)]
pub struct ValueExtractor {
    config: ExtractorConfig,
}

impl ValueExtractor {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ExtractorConfig) -> Result<Self, ExtractError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Every currency amount in `text`, in order of appearance.
    pub fn find_values(&self, text: &str) -> Vec<MonetaryValue> {
        let normalized = normalize(text);
        self.config.dedup.apply(scan_values(&normalized))
    }

    /// Currency amounts on the lines (or token windows) that fuzzy-match `item`.
    ///
    /// Multi-line text is scored line by line. A single unbroken blob, typical of OCR
    /// output, is split into tokens and every matching token opens a window of
    /// `window_radius` tokens on each side.
    pub fn find_values_near(&self, text: &str, item: &str) -> Lookup<MonetaryValue> {
        let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
        if lines.is_empty() {
            tracing::debug!("Empty text, nothing to search for '{}'", item);
            return Lookup::Found(Vec::new());
        }

        let candidates = if lines.len() > 1 {
            self.matching_lines(&lines, item)
        } else {
            self.matching_windows(lines[0], item)
        };

        if candidates.is_empty() {
            tracing::debug!(
                "No line or window reached threshold {} for '{}'",
                self.config.line_threshold,
                item
            );
            return Lookup::NotFound;
        }

        let raw: Vec<MonetaryValue> = candidates.iter().flat_map(|c| scan_values(c)).collect();
        Lookup::Found(self.config.dedup.apply(raw))
    }

    /// Values of the column whose name best matches `item`, one per parseable row.
    pub fn find_column_values(&self, table: &Table, item: &str) -> Lookup<RowValue> {
        let Some((column, score)) = self.best_column(table, item) else {
            tracing::debug!("Table has no columns to match '{}'", item);
            return Lookup::NotFound;
        };

        if score < self.config.column_threshold {
            tracing::debug!(
                "Best column '{}' scored {} for '{}', below threshold {}",
                table.columns()[column],
                score,
                item,
                self.config.column_threshold
            );
            return Lookup::NotFound;
        }
        tracing::debug!("Selected column '{}' (score {}) for '{}'", table.columns()[column], score, item);

        let label_column = table.columns().iter().enumerate().position(|(i, name)| {
            let name = name.to_lowercase();
            i != column && LABEL_COLUMN_HINTS.iter().any(|hint| name.contains(hint))
        });

        let mut results = Vec::new();
        for row in 0..table.rows().len() {
            let cell = table.cell(row, column);
            if cell.trim().is_empty() {
                continue;
            }
            let value = match parse_amount(cell) {
                Ok(value) => value,
                Err(e) => {
                    tracing::debug!("Row {}: {}", row + 1, e);
                    continue;
                }
            };
            let label = label_column
                .map(|c| table.cell(row, c).trim())
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("row {}", row + 1));
            results.push(RowValue { label, value });
        }

        Lookup::Found(results)
    }

    // --- Helpers ---

    fn matching_lines(&self, lines: &[&str], item: &str) -> Vec<String> {
        lines
            .iter()
            .map(|line| normalize(line))
            .filter(|line| {
                let score = partial_ratio(item, line);
                tracing::trace!("Line score {} for '{}': '{}'", score, item, line);
                score >= self.config.line_threshold
            })
            .collect()
    }

    fn matching_windows(&self, blob: &str, item: &str) -> Vec<String> {
        let normalized = normalize(blob);
        let tokens: Vec<&str> = normalized.split(' ').collect();
        let min_chars = MIN_SCORED_TOKEN_CHARS.min(item.trim().chars().count());
        let radius = self.config.window_radius;

        // Overlapping or touching windows are merged so no token is scanned twice.
        let mut spans: Vec<(usize, usize)> = Vec::new();
        for (i, token) in tokens.iter().enumerate() {
            if token.chars().count() < min_chars || !token.chars().any(char::is_alphabetic) {
                continue;
            }
            let score = partial_ratio(item, token);
            tracing::trace!("Token score {} for '{}': '{}'", score, item, token);
            if score < self.config.line_threshold {
                continue;
            }
            let start = i.saturating_sub(radius);
            let end = (i + radius + 1).min(tokens.len());
            match spans.last_mut() {
                Some(last) if start <= last.1 => last.1 = last.1.max(end),
                _ => spans.push((start, end)),
            }
        }
        spans
            .into_iter()
            .map(|(start, end)| tokens[start..end].join(" "))
            .collect()
    }

    /// Highest-scoring column; the first one wins ties.
    fn best_column(&self, table: &Table, item: &str) -> Option<(usize, u8)> {
        let mut best: Option<(usize, u8)> = None;
        for (i, name) in table.columns().iter().enumerate() {
            let score = partial_ratio(item, name);
            tracing::trace!("Column score {} for '{}': '{}'", score, item, name);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((i, score));
            }
        }
        best
    }
}
