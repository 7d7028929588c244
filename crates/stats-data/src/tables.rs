//! In-memory table types passed between the loading, cleaning and
//! aggregation stages.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use stats_core::models::{GenreLabel, Platform, PriceValue};

// ── Raw stage ─────────────────────────────────────────────────────────────────

/// One catalog row for a single platform, with its merged price.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    pub platform: Platform,
    /// Unified game identifier; `None` when the table has no ID column or
    /// the cell is empty.
    pub game_id: Option<String>,
    /// Every other games column that carried a value, keyed by header.
    pub fields: BTreeMap<String, String>,
    pub price: PriceValue,
}

impl GameRecord {
    pub fn field(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }
}

/// All catalog rows of one platform, as produced by
/// [`load_platform_games`](crate::reader::load_platform_games).
#[derive(Debug, Clone)]
pub struct GameTable {
    pub platform: Platform,
    /// Passthrough column names, in file order (the ID column excluded).
    pub columns: Vec<String>,
    /// Header that was unified into `game_id`.
    pub id_column: Option<String>,
    /// Prices header whose values were merged into `price`.
    pub price_column: Option<String>,
    pub records: Vec<GameRecord>,
}

impl GameTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of rows with a price attached.
    pub fn priced_count(&self) -> usize {
        self.records.iter().filter(|r| !r.price.is_missing()).count()
    }
}

/// One player account row.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub platform: Platform,
    /// Raw `created` cell.
    pub created: Option<String>,
    /// Year derived from `created` during cleaning.
    pub creation_year: Option<i32>,
}

/// Player accounts of one or more platforms.
///
/// An empty table (no columns, no rows) means "no player data", not an
/// error.
#[derive(Debug, Clone, Default)]
pub struct PlayerTable {
    /// Union of the source headers, in first-seen order.
    pub columns: Vec<String>,
    /// Whether any source table carried the `created` column.
    pub has_created: bool,
    pub records: Vec<PlayerRecord>,
}

impl PlayerTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The two tables loaded for a single platform.
#[derive(Debug, Clone)]
pub struct PlatformTables {
    pub games: GameTable,
    pub players: PlayerTable,
}

// ── Clean stage ───────────────────────────────────────────────────────────────

/// A priced, normalized catalog row.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanGame {
    pub platform: Platform,
    pub game_id: Option<String>,
    pub fields: BTreeMap<String, String>,
    pub price: f64,
    pub release_date: Option<NaiveDate>,
    pub release_year: Option<i32>,
    pub genre: GenreLabel,
}

/// A price cell that could not be cast to a number.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedPrice {
    pub platform: Platform,
    pub game_id: Option<String>,
    pub value: String,
}

/// The unioned, price-filtered catalog used by every price-based summary.
#[derive(Debug, Clone, Default)]
pub struct CleanGames {
    /// Union of the passthrough columns, in first-seen order.
    pub columns: Vec<String>,
    /// Header the genre labels were derived from.
    pub genre_column: Option<String>,
    pub records: Vec<CleanGame>,
    /// Rows dropped because no price could be attached.
    pub dropped_missing_price: usize,
    pub rejected_prices: Vec<RejectedPrice>,
}

impl CleanGames {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Append the names in `source` that `target` does not hold yet.
pub(crate) fn extend_columns(target: &mut Vec<String>, source: &[String]) {
    for col in source {
        if !target.contains(col) {
            target.push(col.clone());
        }
    }
}
