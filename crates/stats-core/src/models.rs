use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three gaming ecosystems whose data is unioned.
///
/// Ordering is alphabetical by directory name, which is also the order
/// grouped summary rows are emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    PlayStation,
    Steam,
    Xbox,
}

impl Platform {
    /// Order in which platform tables are loaded and concatenated.
    pub const LOAD_ORDER: [Platform; 3] = [Platform::PlayStation, Platform::Xbox, Platform::Steam];

    /// Subdirectory name under the dataset root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Platform::PlayStation => "playstation",
            Platform::Steam => "steam",
            Platform::Xbox => "xbox",
        }
    }

    /// Human-readable name for chart legends.
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::PlayStation => "PlayStation",
            Platform::Steam => "Steam",
            Platform::Xbox => "Xbox",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Cell values treated as "no value" when reading CSV tables.
const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// `true` when `cell` carries no value.
pub fn is_missing(cell: &str) -> bool {
    MISSING_TOKENS.contains(&cell.trim())
}

/// Returns the trimmed cell, or `None` when it carries no value.
pub fn non_missing(cell: &str) -> Option<&str> {
    if is_missing(cell) {
        None
    } else {
        Some(cell.trim())
    }
}

/// Normalized price attached to a game after the prices merge.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceValue {
    /// No price observation could be attached.
    Missing,
    /// A numeric amount in the resolved currency column.
    Amount(f64),
    /// A non-empty cell that is not a number.
    Unparsed(String),
}

impl PriceValue {
    /// Classify a raw CSV cell.
    pub fn from_cell(cell: &str) -> Self {
        match non_missing(cell) {
            None => PriceValue::Missing,
            Some(text) => match text.parse::<f64>() {
                Ok(v) if v.is_nan() => PriceValue::Missing,
                Ok(v) => PriceValue::Amount(v),
                Err(_) => PriceValue::Unparsed(text.to_string()),
            },
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, PriceValue::Missing)
    }
}

/// Canonical genre of a game: a lowercase token plus its title-cased form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GenreLabel {
    /// Lowercase normalized token, `"unknown"` when nothing usable remained.
    pub token: String,
    /// Title-cased variant used for display and grouping.
    pub display: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_dir_names() {
        assert_eq!(Platform::PlayStation.dir_name(), "playstation");
        assert_eq!(Platform::Steam.dir_name(), "steam");
        assert_eq!(Platform::Xbox.dir_name(), "xbox");
    }

    #[test]
    fn test_platform_ordering_is_alphabetical() {
        let mut all = Platform::LOAD_ORDER.to_vec();
        all.sort();
        assert_eq!(all, vec![Platform::PlayStation, Platform::Steam, Platform::Xbox]);
    }

    #[test]
    fn test_platform_serializes_lowercase() {
        let json = serde_json::to_string(&Platform::PlayStation).unwrap();
        assert_eq!(json, "\"playstation\"");
    }

    #[test]
    fn test_is_missing_tokens() {
        assert!(is_missing(""));
        assert!(is_missing("  "));
        assert!(is_missing("NaN"));
        assert!(is_missing("N/A"));
        assert!(!is_missing("0"));
        assert!(!is_missing("Action"));
    }

    #[test]
    fn test_price_value_from_cell() {
        assert_eq!(PriceValue::from_cell("19.99"), PriceValue::Amount(19.99));
        assert_eq!(PriceValue::from_cell(" 0 "), PriceValue::Amount(0.0));
        assert_eq!(PriceValue::from_cell(""), PriceValue::Missing);
        assert_eq!(PriceValue::from_cell("nan"), PriceValue::Missing);
        assert_eq!(
            PriceValue::from_cell("free"),
            PriceValue::Unparsed("free".to_string())
        );
    }

    #[test]
    fn test_price_value_is_missing() {
        assert!(PriceValue::Missing.is_missing());
        assert!(!PriceValue::Unparsed("x".into()).is_missing());
    }
}
