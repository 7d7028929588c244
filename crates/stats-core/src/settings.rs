use clap::parser::ValueSource;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Default minimum number of games a (platform, genre) pair needs before it
/// is shown in the price-by-genre summary.
pub const MIN_GAMES_PER_GENRE: usize = 10;

/// Default number of genres kept in the top-genre rankings.
pub const TOP_GENRES: usize = 10;

/// How the summaries are presented.
#[derive(ValueEnum, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Interactive terminal dashboard.
    Dashboard,
    /// Pretty JSON on stdout.
    Report,
}

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Gaming catalog analysis across Steam, Xbox and PlayStation
#[derive(Parser, Debug, Clone)]
#[command(name = "gamestats", version)]
pub struct Settings {
    /// Dataset root (one subdirectory per platform); located automatically if omitted
    #[arg(long, env = "GAMESTATS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Output view
    #[arg(long, value_enum, default_value = "dashboard")]
    pub view: View,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Minimum games per platform and genre in the price-by-genre summary
    #[arg(long, default_value_t = MIN_GAMES_PER_GENRE)]
    pub min_genre_games: usize,

    /// Number of genres kept in the top-genre rankings
    #[arg(long, default_value_t = TOP_GENRES)]
    pub top_genres: usize,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Shorthand for --log-level DEBUG
    #[arg(long)]
    pub debug: bool,

    /// Forget the saved theme, view and data directory
    #[arg(long)]
    pub clear: bool,
}

impl Settings {
    /// Parse the process arguments against the default saved-params file.
    pub fn load_with_last_used() -> Self {
        Self::load_from(std::env::args_os(), &SavedParams::default_path())
    }

    /// Parse `args` and fill unset options from the file at `saved`.
    ///
    /// With `--clear` nothing is merged. Nothing is written here; call
    /// [`Settings::remember`] once logging is up.
    pub fn load_from<I, T>(args: I, saved: &Path) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Settings::command().get_matches_from(args);
        let mut settings = match Settings::from_arg_matches(&matches) {
            Ok(settings) => settings,
            Err(e) => e.exit(),
        };

        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        if !settings.clear {
            SavedParams::read(saved).fill_unset(&mut settings, &matches);
        }
        settings
    }

    /// Persist the effective values to `saved`, or remove the file under
    /// `--clear`.
    pub fn remember(&self, saved: &Path) -> std::io::Result<()> {
        if self.clear {
            SavedParams::clear(saved)
        } else {
            SavedParams::from(self).write(saved)
        }
    }

    pub fn is_dashboard(&self) -> bool {
        self.view == View::Dashboard
    }
}

// ── SavedParams ────────────────────────────────────────────────────────────────

/// Options remembered between runs in `~/.gamestats/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct SavedParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<View>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl SavedParams {
    pub fn default_path() -> PathBuf {
        Self::path_under(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    pub fn path_under(home: &Path) -> PathBuf {
        home.join(".gamestats").join("last_used.json")
    }

    /// Missing or unreadable files yield empty params.
    pub fn read(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default()
    }

    /// Write through a temporary file so a crash never leaves half a file.
    pub fn write(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_vec_pretty(self).map_err(std::io::Error::other)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)
    }

    pub fn clear(path: &Path) -> std::io::Result<()> {
        match std::fs::remove_file(path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    /// Copy saved values into options the command line did not set.
    /// `data_dir` also counts as set when it came from the environment.
    fn fill_unset(self, settings: &mut Settings, matches: &ArgMatches) {
        let from_cli = |id: &str| matches.value_source(id) == Some(ValueSource::CommandLine);

        if let Some(view) = self.view.filter(|_| !from_cli("view")) {
            settings.view = view;
        }
        if let Some(theme) = self.theme.filter(|_| !from_cli("theme")) {
            settings.theme = theme;
        }
        if settings.data_dir.is_none() {
            settings.data_dir = self.data_dir;
        }
    }
}

impl From<&Settings> for SavedParams {
    fn from(s: &Settings) -> Self {
        SavedParams {
            theme: Some(s.theme.clone()),
            view: Some(s.view),
            data_dir: s.data_dir.clone(),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
