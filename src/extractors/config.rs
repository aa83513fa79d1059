// src/extractors/config.rs
use crate::extractors::money::MonetaryValue;
use crate::utils::error::ExtractError;
use std::collections::HashSet;
use std::str::FromStr;

// --- Constants ---
pub const DEFAULT_LINE_THRESHOLD: u8 = 70;
pub const DEFAULT_COLUMN_THRESHOLD: u8 = 60;
pub const DEFAULT_WINDOW_RADIUS: usize = 3;

/// How repeated values are suppressed in an extraction result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupPolicy {
    /// Drop a value only when it repeats the one right before it.
    #[default]
    Consecutive,
    /// Keep only the first occurrence of each value.
    Global,
    /// Keep every occurrence.
    Keep,
}

impl DedupPolicy {
    pub fn apply(self, values: Vec<MonetaryValue>) -> Vec<MonetaryValue> {
        match self {
            DedupPolicy::Keep => values,
            DedupPolicy::Consecutive => {
                let mut values = values;
                values.dedup();
                values
            }
            DedupPolicy::Global => {
                let mut seen = HashSet::new();
                values.into_iter().filter(|v| seen.insert(*v)).collect()
            }
        }
    }
}

impl FromStr for DedupPolicy {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "consecutive" => Ok(DedupPolicy::Consecutive),
            "global" => Ok(DedupPolicy::Global),
            "keep" | "none" => Ok(DedupPolicy::Keep),
            other => Err(ExtractError::Config(format!("unknown dedup policy '{}'", other))),
        }
    }
}

/// Tunable knobs of the value extractor. Thresholds are on the 0–100 partial-ratio scale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    pub line_threshold: u8,
    pub column_threshold: u8,
    /// Tokens kept on each side of a matched token in a single-line blob.
    pub window_radius: usize,
    pub dedup: DedupPolicy,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            line_threshold: DEFAULT_LINE_THRESHOLD,
            column_threshold: DEFAULT_COLUMN_THRESHOLD,
            window_radius: DEFAULT_WINDOW_RADIUS,
            dedup: DedupPolicy::default(),
        }
    }
}

impl ExtractorConfig {
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.line_threshold > 100 {
            return Err(ExtractError::Config(format!(
                "line threshold {} is outside 0..=100",
                self.line_threshold
            )));
        }
        if self.column_threshold > 100 {
            return Err(ExtractError::Config(format!(
                "column threshold {} is outside 0..=100",
                self.column_threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(cents: &[u64]) -> Vec<MonetaryValue> {
        cents.iter().copied().map(MonetaryValue::from_cents).collect()
    }

    #[test]
    fn test_dedup_policies() {
        let input = values(&[500, 500, 600, 500]);
        assert_eq!(DedupPolicy::Consecutive.apply(input.clone()), values(&[500, 600, 500]));
        assert_eq!(DedupPolicy::Global.apply(input.clone()), values(&[500, 600]));
        assert_eq!(DedupPolicy::Keep.apply(input.clone()), input);
    }

    #[test]
    fn test_dedup_policy_parsing() {
        assert_eq!("Global".parse::<DedupPolicy>().unwrap(), DedupPolicy::Global);
        assert_eq!("none".parse::<DedupPolicy>().unwrap(), DedupPolicy::Keep);
        assert!("sometimes".parse::<DedupPolicy>().is_err());
    }

    #[test]
    fn test_config_validation() {
        assert!(ExtractorConfig::default().validate().is_ok());
        let bad = ExtractorConfig { column_threshold: 101, ..Default::default() };
        assert!(matches!(bad.validate(), Err(ExtractError::Config(_))));
    }
}
