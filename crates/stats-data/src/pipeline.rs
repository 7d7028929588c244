//! Load, merge and clean pipeline.
//!
//! Loads every platform directory, unions the tables, drops unpriced rows,
//! derives release and creation years plus genre labels, and hands the
//! result to the aggregator as a [`PipelineOutput`].

use std::path::Path;
use std::time::Instant;

use chrono::Datelike;
use stats_core::dates::DateParser;
use stats_core::error::{Result, StatsError};
use stats_core::genre::genre_label;
use stats_core::models::{Platform, PriceValue};
use tracing::{debug, info, warn};

use crate::aggregator::{AggregationConfig, Summaries};
use crate::columns::{GENRE, RELEASE_DATE};
use crate::reader::{load_platform_games, load_platform_players};
use crate::tables::{
    extend_columns, CleanGame, CleanGames, PlatformTables, PlayerTable, RejectedPrice,
};

// ── Public types ──────────────────────────────────────────────────────────────

/// Timings and counts produced alongside the cleaned tables.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PipelineMetadata {
    pub platforms_loaded: Vec<Platform>,
    /// Game rows across all platforms before price filtering.
    pub raw_games: usize,
    pub load_time_seconds: f64,
    pub transform_time_seconds: f64,
}

/// The complete output of [`run_pipeline`].
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub games: CleanGames,
    pub players: PlayerTable,
    pub summaries: Summaries,
    pub metadata: PipelineMetadata,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Load both tables of one platform.
pub fn load_platform(root: &Path, platform: Platform) -> Result<PlatformTables> {
    let games = load_platform_games(root, platform)?;
    let players = load_platform_players(root, platform)?;
    info!(
        "Loaded {}: {} games ({} priced), {} players",
        platform.display_name(),
        games.len(),
        games.priced_count(),
        players.len()
    );
    Ok(PlatformTables { games, players })
}

/// Run the full pipeline over a dataset root.
///
/// 1. Load every platform in [`Platform::LOAD_ORDER`].
/// 2. Merge and clean the tables.
/// 3. Compute the [`Summaries`].
pub fn run_pipeline(root: &Path, config: &AggregationConfig) -> Result<PipelineOutput> {
    let load_start = Instant::now();
    let tables = Platform::LOAD_ORDER
        .iter()
        .map(|&platform| load_platform(root, platform))
        .collect::<Result<Vec<_>>>()?;
    let load_time = load_start.elapsed().as_secs_f64();

    Ok(analyze(tables, config, load_time))
}

/// Merge already-loaded platform tables and aggregate them.
pub fn analyze(
    tables: Vec<PlatformTables>,
    config: &AggregationConfig,
    load_time_seconds: f64,
) -> PipelineOutput {
    let platforms_loaded = tables.iter().map(|t| t.games.platform).collect();
    let raw_games = tables.iter().map(|t| t.games.len()).sum();

    let transform_start = Instant::now();
    let (games, players) = merge_and_clean(tables);
    let summaries = Summaries::compute(&games, &players, config);
    let transform_time = transform_start.elapsed().as_secs_f64();

    info!(
        "Pipeline finished: {} priced games, {} players in {:.2}s",
        games.len(),
        players.len(),
        load_time_seconds + transform_time
    );

    PipelineOutput {
        games,
        players,
        summaries,
        metadata: PipelineMetadata {
            platforms_loaded,
            raw_games,
            load_time_seconds,
            transform_time_seconds: transform_time,
        },
    }
}

/// Union the per-platform tables and normalize them for aggregation.
///
/// Rows without a price are dropped. Rows whose price cell is not a number
/// are rejected one by one and reported in
/// [`CleanGames::rejected_prices`].
pub fn merge_and_clean(tables: Vec<PlatformTables>) -> (CleanGames, PlayerTable) {
    let mut games = CleanGames::default();
    let mut players = PlayerTable::default();

    for table in &tables {
        extend_columns(&mut games.columns, &table.games.columns);
        extend_columns(&mut players.columns, &table.players.columns);
        players.has_created |= table.players.has_created;
    }

    games.genre_column = GENRE.resolve(&games.columns).map(str::to_string);
    let release_column = RELEASE_DATE.resolve(&games.columns).map(str::to_string);
    if games.genre_column.is_none() {
        warn!("No genre column in any games table; every game is labelled unknown");
    }
    if release_column.is_none() {
        warn!("No release_date column in any games table; release years unavailable");
    }

    for table in tables {
        for record in table.games.records {
            let price = match record.price {
                PriceValue::Missing => {
                    games.dropped_missing_price += 1;
                    continue;
                }
                PriceValue::Unparsed(value) => {
                    let err = StatsError::InvalidPrice {
                        platform: record.platform,
                        game_id: record.game_id.clone().unwrap_or_default(),
                        value: value.clone(),
                    };
                    warn!("{}; row skipped", err);
                    games.rejected_prices.push(RejectedPrice {
                        platform: record.platform,
                        game_id: record.game_id,
                        value,
                    });
                    continue;
                }
                PriceValue::Amount(v) => v,
            };

            let release_date = release_column
                .as_deref()
                .and_then(|c| record.fields.get(c))
                .and_then(|raw| DateParser::parse_date(raw));
            let genre = genre_label(
                games
                    .genre_column
                    .as_deref()
                    .and_then(|c| record.fields.get(c))
                    .map(String::as_str),
            );

            games.records.push(CleanGame {
                platform: record.platform,
                game_id: record.game_id,
                fields: record.fields,
                price,
                release_year: release_date.map(|d| d.year()),
                release_date,
                genre,
            });
        }

        for mut player in table.players.records {
            player.creation_year = player.created.as_deref().and_then(DateParser::year);
            players.records.push(player);
        }
    }

    debug!(
        "Merged {} priced games ({} without price, {} rejected), {} players",
        games.len(),
        games.dropped_missing_price,
        games.rejected_prices.len(),
        players.len()
    );

    (games, players)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
