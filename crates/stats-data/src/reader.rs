//! CSV loading for the per-platform dataset directories.
//!
//! Each platform directory holds `games.csv`, and optionally `prices.csv` and
//! `players.csv`. Only the games table is mandatory; the optional tables
//! degrade to missing prices or an empty player table.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use csv::ReaderBuilder;
use stats_core::dates::DateParser;
use stats_core::error::{Result, StatsError};
use stats_core::models::{non_missing, Platform, PriceValue};
use tracing::{debug, warn};

use crate::columns::{ACQUIRED_AT, CREATED, GAME_ID, PRICE};
use crate::tables::{GameRecord, GameTable, PlayerRecord, PlayerTable};

pub const GAMES_FILE: &str = "games.csv";
pub const PRICES_FILE: &str = "prices.csv";
pub const PLAYERS_FILE: &str = "players.csv";

// ── RawTable ──────────────────────────────────────────────────────────────────

/// A CSV file read fully into memory as strings.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    /// Data rows; short rows are padded to the header width.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Read `path`, treating the first record as the header row.
    pub fn read(path: &Path) -> Result<Self> {
        let mut reader = open_csv(path)?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| csv_error(path, e))?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| csv_error(path, e))?;
            let mut row: Vec<String> = record
                .iter()
                .take(headers.len())
                .map(|c| c.to_string())
                .collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        debug!(
            "Read {} rows x {} columns from {}",
            rows.len(),
            headers.len(),
            path.display()
        );

        Ok(Self { headers, rows })
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Directory holding one platform's tables.
pub fn platform_dir(root: &Path, platform: Platform) -> PathBuf {
    root.join(platform.dir_name())
}

/// Load a platform's games table and merge the latest price per game.
///
/// The games file is mandatory. A missing prices file, a missing ID column
/// on either side, or a prices table without any recognised price column
/// leaves every row with [`PriceValue::Missing`].
pub fn load_platform_games(root: &Path, platform: Platform) -> Result<GameTable> {
    let dir = platform_dir(root, platform);
    let games_path = dir.join(GAMES_FILE);
    if !games_path.is_file() {
        return Err(StatsError::GamesFileMissing {
            platform,
            path: games_path,
        });
    }

    let games = RawTable::read(&games_path)?;
    let id_idx = GAME_ID.resolve_index(&games.headers);
    let id_column = id_idx.map(|i| games.headers[i].clone());
    if id_column.is_none() {
        warn!(
            "{}: games table has no {} column; prices cannot be attached",
            platform, GAME_ID.field
        );
    }

    let latest = load_latest_prices(&dir.join(PRICES_FILE), platform)?;

    let columns: Vec<String> = games
        .headers
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != id_idx)
        .map(|(_, h)| h.clone())
        .collect();

    let mut matched = 0usize;
    let records: Vec<GameRecord> = games
        .rows
        .iter()
        .map(|row| {
            let game_id = id_idx.and_then(|i| non_missing(&row[i])).map(normalize_id);

            let price = match (&game_id, &latest) {
                (Some(id), Some(prices)) if id_column.is_some() => prices
                    .by_id
                    .get(id)
                    .map(|obs| obs.price.clone())
                    .unwrap_or(PriceValue::Missing),
                _ => PriceValue::Missing,
            };
            if !price.is_missing() {
                matched += 1;
            }

            let fields: BTreeMap<String, String> = games
                .headers
                .iter()
                .zip(row.iter())
                .enumerate()
                .filter(|(i, _)| Some(*i) != id_idx)
                .filter_map(|(_, (h, cell))| non_missing(cell).map(|v| (h.clone(), v.to_string())))
                .collect();

            GameRecord {
                platform,
                game_id,
                fields,
                price,
            }
        })
        .collect();

    debug!(
        "{}: {} games loaded, {} with a price",
        platform,
        records.len(),
        matched
    );

    Ok(GameTable {
        platform,
        columns,
        id_column,
        price_column: latest.map(|p| p.price_column),
        records,
    })
}

/// Load a platform's player accounts.
///
/// Returns an empty table when `players.csv` is absent. Only the `created`
/// cell is kept per row.
pub fn load_platform_players(root: &Path, platform: Platform) -> Result<PlayerTable> {
    let path = platform_dir(root, platform).join(PLAYERS_FILE);
    if !path.is_file() {
        debug!("{}: no {} found", platform, PLAYERS_FILE);
        return Ok(PlayerTable::default());
    }

    let mut reader = open_csv(&path)?;
    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(&path, e))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let created_idx = CREATED.resolve_index(&columns);

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_error(&path, e))?;
        let created = created_idx
            .and_then(|i| record.get(i))
            .and_then(non_missing)
            .map(|s| s.to_string());
        records.push(PlayerRecord {
            platform,
            created,
            creation_year: None,
        });
    }

    debug!("{}: {} player accounts loaded", platform, records.len());

    Ok(PlayerTable {
        columns,
        has_created: created_idx.is_some(),
        records,
    })
}

// ── Prices ────────────────────────────────────────────────────────────────────

/// The observation kept for one game.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceObservation {
    pub game_id: String,
    pub observed_at: Option<NaiveDateTime>,
    pub price: PriceValue,
}

/// Latest price per game plus the column it came from.
#[derive(Debug, Clone)]
pub struct LatestPrices {
    pub price_column: String,
    pub by_id: HashMap<String, PriceObservation>,
}

/// Read `prices.csv` and keep the most recent observation per game.
///
/// Observations are ranked by acquisition date; an undated observation
/// ranks before any dated one, and among equal dates the later row wins.
/// Without a `date_acquired` column this reduces to "last row wins".
/// Undated rows deliberately lose to dated ones instead of sorting last
/// and being kept as the latest.
///
/// Returns `Ok(None)` when the file is absent or has no usable ID or
/// price column.
pub fn load_latest_prices(path: &Path, platform: Platform) -> Result<Option<LatestPrices>> {
    if !path.is_file() {
        warn!("{}: no {}; prices left missing", platform, PRICES_FILE);
        return Ok(None);
    }

    let table = RawTable::read(path)?;

    let Some(id_idx) = GAME_ID.resolve_index(&table.headers) else {
        warn!(
            "{}: {} has no {} column; prices left missing",
            platform, PRICES_FILE, GAME_ID.field
        );
        return Ok(None);
    };
    let Some(price_idx) = PRICE.resolve_index(&table.headers) else {
        warn!(
            "{}: {} has no {} column among {:?}; prices left missing",
            platform, PRICES_FILE, PRICE.field, PRICE.candidates
        );
        return Ok(None);
    };
    let acquired_idx = ACQUIRED_AT.resolve_index(&table.headers);

    let mut by_id: HashMap<String, PriceObservation> = HashMap::new();
    for row in &table.rows {
        let Some(game_id) = non_missing(&row[id_idx]).map(normalize_id) else {
            continue;
        };
        let observed_at = acquired_idx.and_then(|i| DateParser::parse_datetime(&row[i]));
        let obs = PriceObservation {
            game_id: game_id.clone(),
            observed_at,
            price: PriceValue::from_cell(&row[price_idx]),
        };

        let newer = by_id
            .get(&game_id)
            .map_or(true, |current| obs.observed_at >= current.observed_at);
        if newer {
            by_id.insert(game_id, obs);
        }
    }

    let price_column = table.headers[price_idx].clone();
    debug!(
        "{}: {} price rows reduced to {} games using column {:?}",
        platform,
        table.rows.len(),
        by_id.len(),
        price_column
    );

    Ok(Some(LatestPrices {
        price_column,
        by_id,
    }))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn open_csv(path: &Path) -> Result<csv::Reader<File>> {
    let file = File::open(path).map_err(|source| StatsError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(ReaderBuilder::new().flexible(true).from_reader(file))
}

fn csv_error(path: &Path, source: csv::Error) -> StatsError {
    StatsError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

/// Canonical form of an ID cell, so `"42"` and `"42.0"` join.
fn normalize_id(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.strip_suffix(".0") {
        Some(int) if !int.is_empty() && int.chars().all(|c| c.is_ascii_digit()) => int.to_string(),
        _ => trimmed.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
