//! Summary tables behind the five dashboard questions.
//!
//! Every function here is a pure reduction over the cleaned tables. Grouping
//! goes through `BTreeMap` and every ranking carries an explicit tie-break,
//! so two runs over the same input serialize to identical bytes.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use stats_core::models::Platform;
use stats_core::settings::{MIN_GAMES_PER_GENRE, TOP_GENRES};
use stats_core::Result;

use crate::tables::{CleanGames, PlayerTable};

// ── Row types ─────────────────────────────────────────────────────────────────

/// Q1: mean price of one platform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformPrice {
    pub platform: Platform,
    pub mean_price: f64,
    pub n_games: usize,
}

/// Q2: releases of one platform in one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseCount {
    pub release_year: i32,
    pub platform: Platform,
    pub count: usize,
}

/// Q3: games of one genre on one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreCount {
    pub platform: Platform,
    pub genre: String,
    pub count: usize,
}

/// A genre's count summed over all platforms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreTotal {
    pub genre: String,
    pub total: usize,
}

/// Q3: the overall top genres and their per-platform breakdown.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TopGenres {
    /// Highest totals first.
    pub ranking: Vec<GenreTotal>,
    /// Per-platform counts restricted to the ranked genres, ordered by
    /// platform then genre.
    pub rows: Vec<GenreCount>,
}

impl TopGenres {
    /// Count for `(platform, genre)`, zero when the platform has none.
    pub fn count(&self, platform: Platform, genre: &str) -> usize {
        self.rows
            .iter()
            .find(|r| r.platform == platform && r.genre == genre)
            .map_or(0, |r| r.count)
    }
}

/// Q4: mean price of one genre on one platform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenrePrice {
    pub platform: Platform,
    pub genre: String,
    pub mean_price: f64,
    pub n_games: usize,
}

/// Q4: filtered and ranked genre prices.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GenrePriceTable {
    /// Threshold the rows were filtered with.
    pub min_games: usize,
    /// Descending mean price.
    pub rows: Vec<GenrePrice>,
    /// Genres by the descending mean of their per-platform means.
    pub genre_order: Vec<String>,
}

/// Q5: accounts created in one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

/// Q5 result. `Unavailable` when no players table had a `created` column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "years", rename_all = "snake_case")]
pub enum CreationYears {
    Unavailable,
    Available(Vec<YearCount>),
}

impl CreationYears {
    pub fn is_available(&self) -> bool {
        matches!(self, CreationYears::Available(_))
    }
}

// ── Reductions ────────────────────────────────────────────────────────────────

/// Mean price and row count per platform, ordered by platform.
pub fn mean_price_by_platform(games: &CleanGames) -> Vec<PlatformPrice> {
    let mut groups: BTreeMap<Platform, (f64, usize)> = BTreeMap::new();
    for game in &games.records {
        let entry = groups.entry(game.platform).or_default();
        entry.0 += game.price;
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|(platform, (sum, n))| PlatformPrice {
            platform,
            mean_price: sum / n as f64,
            n_games: n,
        })
        .collect()
}

/// Game count per (release year, platform) over rows with a release year.
pub fn release_counts(games: &CleanGames) -> Vec<ReleaseCount> {
    let mut groups: BTreeMap<(i32, Platform), usize> = BTreeMap::new();
    for game in &games.records {
        if let Some(year) = game.release_year {
            *groups.entry((year, game.platform)).or_default() += 1;
        }
    }

    groups
        .into_iter()
        .map(|((release_year, platform), count)| ReleaseCount {
            release_year,
            platform,
            count,
        })
        .collect()
}

/// Game count per (platform, genre), ordered by platform then genre.
pub fn genre_counts(games: &CleanGames) -> Vec<GenreCount> {
    let mut groups: BTreeMap<(Platform, &str), usize> = BTreeMap::new();
    for game in &games.records {
        *groups
            .entry((game.platform, game.genre.display.as_str()))
            .or_default() += 1;
    }

    groups
        .into_iter()
        .map(|((platform, genre), count)| GenreCount {
            platform,
            genre: genre.to_string(),
            count,
        })
        .collect()
}

/// The `n` genres with the highest total count across platforms.
pub fn top_genres_overall(counts: &[GenreCount], n: usize) -> TopGenres {
    let mut totals: BTreeMap<&str, usize> = BTreeMap::new();
    for row in counts {
        *totals.entry(row.genre.as_str()).or_default() += row.count;
    }

    let mut ranking: Vec<GenreTotal> = totals
        .into_iter()
        .map(|(genre, total)| GenreTotal {
            genre: genre.to_string(),
            total,
        })
        .collect();
    ranking.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.genre.cmp(&b.genre)));
    ranking.truncate(n);

    let kept: BTreeSet<&str> = ranking.iter().map(|r| r.genre.as_str()).collect();
    let rows = counts
        .iter()
        .filter(|r| kept.contains(r.genre.as_str()))
        .cloned()
        .collect();

    TopGenres { ranking, rows }
}

/// For each platform, its `n` highest genre counts.
///
/// Output is grouped by platform; within a platform, highest count first.
pub fn top_genres_per_platform(counts: &[GenreCount], n: usize) -> Vec<GenreCount> {
    let mut by_platform: BTreeMap<Platform, Vec<&GenreCount>> = BTreeMap::new();
    for row in counts {
        by_platform.entry(row.platform).or_default().push(row);
    }

    by_platform
        .into_values()
        .flat_map(|mut rows| {
            rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.genre.cmp(&b.genre)));
            rows.into_iter().take(n).cloned()
        })
        .collect()
}

/// Mean price per (platform, genre) for combinations with at least
/// `min_games` rows.
pub fn price_by_genre(games: &CleanGames, min_games: usize) -> GenrePriceTable {
    let mut groups: BTreeMap<(Platform, &str), (f64, usize)> = BTreeMap::new();
    for game in &games.records {
        let entry = groups
            .entry((game.platform, game.genre.display.as_str()))
            .or_default();
        entry.0 += game.price;
        entry.1 += 1;
    }

    let mut rows: Vec<GenrePrice> = groups
        .into_iter()
        .filter(|(_, (_, n))| *n >= min_games)
        .map(|((platform, genre), (sum, n))| GenrePrice {
            platform,
            genre: genre.to_string(),
            mean_price: sum / n as f64,
            n_games: n,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.mean_price
            .total_cmp(&a.mean_price)
            .then_with(|| a.platform.cmp(&b.platform))
            .then_with(|| a.genre.cmp(&b.genre))
    });

    let mut per_genre: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for row in &rows {
        let entry = per_genre.entry(row.genre.as_str()).or_default();
        entry.0 += row.mean_price;
        entry.1 += 1;
    }
    let mut order: Vec<(&str, f64)> = per_genre
        .into_iter()
        .map(|(genre, (sum, n))| (genre, sum / n as f64))
        .collect();
    order.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    let genre_order = order.into_iter().map(|(g, _)| g.to_string()).collect();

    GenrePriceTable {
        min_games,
        rows,
        genre_order,
    }
}

/// Accounts per creation year, ascending, or `Unavailable` when no source
/// carried the `created` column.
pub fn creation_year_counts(players: &PlayerTable) -> CreationYears {
    if !players.has_created {
        return CreationYears::Unavailable;
    }

    let mut years: BTreeMap<i32, usize> = BTreeMap::new();
    for player in &players.records {
        if let Some(year) = player.creation_year {
            *years.entry(year).or_default() += 1;
        }
    }

    CreationYears::Available(
        years
            .into_iter()
            .map(|(year, count)| YearCount { year, count })
            .collect(),
    )
}

// ── Summaries ─────────────────────────────────────────────────────────────────

/// Tunable knobs of the aggregation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AggregationConfig {
    pub min_games_per_genre: usize,
    pub top_genres: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            min_games_per_genre: MIN_GAMES_PER_GENRE,
            top_genres: TOP_GENRES,
        }
    }
}

/// Row counts describing the input behind a [`Summaries`] bundle.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SummaryMetadata {
    /// Platforms with at least one priced game.
    pub platforms: Vec<Platform>,
    pub priced_games: usize,
    pub dropped_missing_price: usize,
    pub rejected_prices: usize,
    pub players: usize,
    pub config: Option<AggregationConfig>,
}

/// All five answers, ready for presentation or JSON export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summaries {
    pub metadata: SummaryMetadata,
    pub price_by_platform: Vec<PlatformPrice>,
    pub releases: Vec<ReleaseCount>,
    pub genre_counts: Vec<GenreCount>,
    pub top_genres: TopGenres,
    pub top_genres_per_platform: Vec<GenreCount>,
    pub price_by_genre: GenrePriceTable,
    pub creation_years: CreationYears,
}

impl Summaries {
    pub fn compute(games: &CleanGames, players: &PlayerTable, config: &AggregationConfig) -> Self {
        let counts = genre_counts(games);
        let top_genres = top_genres_overall(&counts, config.top_genres);
        let top_genres_per_platform = top_genres_per_platform(&counts, config.top_genres);

        let platforms: BTreeSet<Platform> = games.records.iter().map(|g| g.platform).collect();
        let metadata = SummaryMetadata {
            platforms: platforms.into_iter().collect(),
            priced_games: games.len(),
            dropped_missing_price: games.dropped_missing_price,
            rejected_prices: games.rejected_prices.len(),
            players: players.len(),
            config: Some(*config),
        };

        Self {
            metadata,
            price_by_platform: mean_price_by_platform(games),
            releases: release_counts(games),
            genre_counts: counts,
            top_genres,
            top_genres_per_platform,
            price_by_genre: price_by_genre(games, config.min_games_per_genre),
            creation_years: creation_year_counts(players),
        }
    }

    /// Pretty JSON rendering used by the report view.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
