//! Memoizing wrapper around the load and aggregation pipeline.
//!
//! [`PipelineContext`] caches each platform's tables per dataset root and
//! the last [`PipelineOutput`]. Entries stay valid while the size and
//! modification time of every input file are unchanged; there is no TTL.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime};

use stats_core::error::Result;
use stats_core::models::Platform;
use stats_data::aggregator::AggregationConfig;
use stats_data::pipeline::{analyze, PipelineOutput};
use stats_data::reader::{
    load_platform_games, load_platform_players, platform_dir, GAMES_FILE, PLAYERS_FILE,
    PRICES_FILE,
};
use stats_data::tables::{GameTable, PlatformTables, PlayerTable};

// ── Fingerprints ──────────────────────────────────────────────────────────────

/// Size and modification time of one input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileStamp {
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl FileStamp {
    /// `None` when the file does not exist.
    pub fn of(path: &Path) -> Option<Self> {
        let meta = std::fs::metadata(path).ok()?;
        if !meta.is_file() {
            return None;
        }
        Some(Self {
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

/// Stamps of every file one platform's tables are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlatformFingerprint {
    pub games: Option<FileStamp>,
    pub prices: Option<FileStamp>,
    pub players: Option<FileStamp>,
}

impl PlatformFingerprint {
    pub fn capture(root: &Path, platform: Platform) -> Self {
        let dir = platform_dir(root, platform);
        Self {
            games: FileStamp::of(&dir.join(GAMES_FILE)),
            prices: FileStamp::of(&dir.join(PRICES_FILE)),
            players: FileStamp::of(&dir.join(PLAYERS_FILE)),
        }
    }
}

type TableKey = (PathBuf, Platform);

#[derive(Debug, Clone, PartialEq)]
struct OutputKey {
    root: PathBuf,
    fingerprints: Vec<PlatformFingerprint>,
    config: AggregationConfig,
}

/// Hit and miss counters, for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub table_hits: usize,
    pub table_misses: usize,
    pub output_hits: usize,
    pub output_misses: usize,
}

// ── PipelineContext ───────────────────────────────────────────────────────────

/// Owns every cache of a process; pass it wherever tables are needed.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use stats_data::aggregator::AggregationConfig;
/// use stats_runtime::context::PipelineContext;
///
/// let mut ctx = PipelineContext::new();
/// let out = ctx.run(Path::new("/data/gaming"), &AggregationConfig::default())?;
/// println!("{} priced games", out.games.len());
/// # Ok::<(), stats_core::StatsError>(())
/// ```
#[derive(Debug, Default)]
pub struct PipelineContext {
    games: HashMap<TableKey, (PlatformFingerprint, GameTable)>,
    players: HashMap<TableKey, (Option<FileStamp>, PlayerTable)>,
    last: Option<(OutputKey, PipelineOutput)>,
    stats: CacheStats,
}

impl PipelineContext {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// The platform's games table, reloaded only when its games or prices
    /// file changed.
    pub fn games(&mut self, root: &Path, platform: Platform) -> Result<GameTable> {
        let key = (root.to_path_buf(), platform);
        let mut fingerprint = PlatformFingerprint::capture(root, platform);
        fingerprint.players = None;

        if let Some((cached_fp, table)) = self.games.get(&key) {
            if *cached_fp == fingerprint {
                self.stats.table_hits += 1;
                tracing::debug!(%platform, "games table served from cache");
                return Ok(table.clone());
            }
        }

        self.stats.table_misses += 1;
        let table = load_platform_games(root, platform)?;
        self.games.insert(key, (fingerprint, table.clone()));
        Ok(table)
    }

    /// The platform's players table, reloaded only when `players.csv`
    /// changed.
    pub fn players(&mut self, root: &Path, platform: Platform) -> Result<PlayerTable> {
        let key = (root.to_path_buf(), platform);
        let stamp = FileStamp::of(&platform_dir(root, platform).join(PLAYERS_FILE));

        if let Some((cached, table)) = self.players.get(&key) {
            if *cached == stamp {
                self.stats.table_hits += 1;
                tracing::debug!(%platform, "players table served from cache");
                return Ok(table.clone());
            }
        }

        self.stats.table_misses += 1;
        let table = load_platform_players(root, platform)?;
        self.players.insert(key, (stamp, table.clone()));
        Ok(table)
    }

    /// Run the whole pipeline, returning the previous output when neither
    /// the inputs nor `config` changed. A failed reload keeps the previous
    /// output.
    pub fn run(&mut self, root: &Path, config: &AggregationConfig) -> Result<&PipelineOutput> {
        let key = OutputKey {
            root: root.to_path_buf(),
            fingerprints: Platform::LOAD_ORDER
                .iter()
                .map(|&p| PlatformFingerprint::capture(root, p))
                .collect(),
            config: *config,
        };

        let (key, output) = match self.last.take() {
            Some((cached, output)) if cached == key => {
                self.stats.output_hits += 1;
                tracing::debug!("pipeline output served from cache");
                (cached, output)
            }
            previous => {
                self.stats.output_misses += 1;
                match self.load_and_analyze(root, config) {
                    Ok(output) => (key, output),
                    Err(e) => {
                        self.last = previous;
                        return Err(e);
                    }
                }
            }
        };

        let (_, output) = self.last.insert((key, output));
        Ok(&*output)
    }

    /// Drop every cached table and output.
    pub fn invalidate(&mut self) {
        self.games.clear();
        self.players.clear();
        self.last = None;
        tracing::debug!("pipeline caches invalidated");
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn load_and_analyze(
        &mut self,
        root: &Path,
        config: &AggregationConfig,
    ) -> Result<PipelineOutput> {
        let load_start = Instant::now();
        let mut tables = Vec::with_capacity(Platform::LOAD_ORDER.len());
        for platform in Platform::LOAD_ORDER {
            tables.push(PlatformTables {
                games: self.games(root, platform)?,
                players: self.players(root, platform)?,
            });
        }
        let load_time = load_start.elapsed().as_secs_f64();

        Ok(analyze(tables, config, load_time))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use stats_core::StatsError;
    use tempfile::TempDir;

    fn write_csv(root: &Path, platform: Platform, name: &str, lines: &[&str]) {
        let dir = platform_dir(root, platform);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(name), lines.join("\n")).unwrap();
    }

    fn write_dataset(root: &Path) {
        for platform in Platform::LOAD_ORDER {
            write_csv(
                root,
                platform,
                GAMES_FILE,
                &["gameid,genres,release_date", "1,Action,2019-01-01", "2,RPG,2020-01-01"],
            );
            write_csv(root, platform, PRICES_FILE, &["gameid,usd", "1,10", "2,30"]);
        }
    }

    #[test]
    fn test_second_run_served_from_cache() {
        let dir = TempDir::new().unwrap();
        write_dataset(dir.path());
        let mut ctx = PipelineContext::new();
        let config = AggregationConfig::default();

        let first = ctx.run(dir.path(), &config).unwrap().summaries.clone();
        let second = ctx.run(dir.path(), &config).unwrap().summaries.clone();

        assert_eq!(first, second);
        let stats = ctx.stats();
        assert_eq!(stats.output_misses, 1);
        assert_eq!(stats.output_hits, 1);
        assert_eq!(stats.table_misses, 6);
    }

    #[test]
    fn test_config_change_reuses_tables() {
        let dir = TempDir::new().unwrap();
        write_dataset(dir.path());
        let mut ctx = PipelineContext::new();

        ctx.run(dir.path(), &AggregationConfig::default()).unwrap();
        let out = ctx
            .run(
                dir.path(),
                &AggregationConfig {
                    min_games_per_genre: 1,
                    top_genres: 10,
                },
            )
            .unwrap();

        assert_eq!(out.summaries.price_by_genre.rows.len(), 6);
        let stats = ctx.stats();
        assert_eq!(stats.output_misses, 2);
        assert_eq!(stats.table_hits, 6);
        assert_eq!(stats.table_misses, 6);
    }

    #[test]
    fn test_changed_file_is_reloaded() {
        let dir = TempDir::new().unwrap();
        write_dataset(dir.path());
        let mut ctx = PipelineContext::new();
        let config = AggregationConfig::default();

        let before = ctx.run(dir.path(), &config).unwrap().games.len();
        assert_eq!(before, 6);

        // Different length, so the stamp changes even on coarse mtime clocks.
        write_csv(
            dir.path(),
            Platform::Steam,
            PRICES_FILE,
            &["gameid,usd", "1,10.00"],
        );
        let after = ctx.run(dir.path(), &config).unwrap().games.len();

        assert_eq!(after, 5);
        assert_eq!(ctx.stats().table_misses, 7);
    }

    #[test]
    fn test_players_cached_separately() {
        let dir = TempDir::new().unwrap();
        write_csv(
            dir.path(),
            Platform::Xbox,
            PLAYERS_FILE,
            &["playerid,created", "1,2014-01-01"],
        );
        let mut ctx = PipelineContext::new();

        let a = ctx.players(dir.path(), Platform::Xbox).unwrap();
        let b = ctx.players(dir.path(), Platform::Xbox).unwrap();
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
        assert_eq!(ctx.stats().table_hits, 1);
    }

    #[test]
    fn test_invalidate_forces_reload() {
        let dir = TempDir::new().unwrap();
        write_dataset(dir.path());
        let mut ctx = PipelineContext::new();

        ctx.games(dir.path(), Platform::Steam).unwrap();
        ctx.invalidate();
        ctx.games(dir.path(), Platform::Steam).unwrap();
        assert_eq!(ctx.stats().table_misses, 2);
        assert_eq!(ctx.stats().table_hits, 0);
    }

    #[test]
    fn test_missing_games_file_propagates() {
        let dir = TempDir::new().unwrap();
        let mut ctx = PipelineContext::new();
        let err = ctx.run(dir.path(), &AggregationConfig::default()).unwrap_err();
        assert!(matches!(err, StatsError::GamesFileMissing { .. }));
    }

    #[test]
    fn test_failed_reload_keeps_previous_output() {
        let dir = TempDir::new().unwrap();
        write_dataset(dir.path());
        let config = AggregationConfig::default();
        let mut ctx = PipelineContext::new();
        let raw_games = ctx.run(dir.path(), &config).unwrap().metadata.raw_games;

        std::fs::remove_file(platform_dir(dir.path(), Platform::Xbox).join(GAMES_FILE)).unwrap();
        let err = ctx.run(dir.path(), &config).unwrap_err();
        assert!(matches!(err, StatsError::GamesFileMissing { .. }));

        let (_, kept) = ctx.last.as_ref().unwrap();
        assert_eq!(kept.metadata.raw_games, raw_games);
    }
}
