//! Locating the local copy of the gaming profiles dataset.
//!
//! The dataset is fetched out of band (for example with the `kagglehub`
//! client) and lands in a versioned cache directory. This module only
//! finds it; it never downloads anything.

use std::path::{Path, PathBuf};

use stats_core::error::{Result, StatsError};
use stats_core::models::Platform;
use tracing::{debug, info, warn};

/// `<owner>/<slug>` of the published dataset.
pub const DATASET_KEY: &str = "artyomkruglov/gaming-profiles-2025-steam-playstation-xbox";

/// Environment variable overriding the kagglehub cache root.
pub const CACHE_ENV: &str = "KAGGLEHUB_CACHE";

// ── DatasetLocator ────────────────────────────────────────────────────────────

/// Resolves the dataset root directory.
///
/// Lookup order:
/// 1. the explicit directory, which must exist;
/// 2. `<cache>/datasets/<owner>/<slug>/versions/<n>` with the highest `n`.
#[derive(Debug, Clone)]
pub struct DatasetLocator {
    key: String,
    explicit: Option<PathBuf>,
    cache_root: Option<PathBuf>,
}

impl DatasetLocator {
    /// Locator for [`DATASET_KEY`] using the default cache root.
    pub fn new(explicit: Option<PathBuf>) -> Self {
        Self {
            key: DATASET_KEY.to_string(),
            explicit,
            cache_root: default_cache_root(),
        }
    }

    /// Replace the cache root (used by tests and custom installs).
    pub fn with_cache_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.cache_root = Some(root.into());
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Return the dataset root or [`StatsError::DatasetNotFound`].
    pub fn locate(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.explicit {
            if dir.is_dir() {
                info!("Using dataset at {}", dir.display());
                if !looks_like_dataset(dir) {
                    warn!("{} has no platform subdirectories", dir.display());
                }
                return Ok(dir.clone());
            }
            return Err(StatsError::DatasetNotFound(format!(
                "data directory {} does not exist",
                dir.display()
            )));
        }

        let Some(cache_root) = &self.cache_root else {
            return Err(StatsError::DatasetNotFound(format!(
                "no cache directory available for {}",
                self.key
            )));
        };

        let versions = cache_root.join("datasets").join(&self.key).join("versions");
        match latest_version(&versions) {
            Some(dir) => {
                info!("Using cached dataset {} at {}", self.key, dir.display());
                Ok(dir)
            }
            None => Err(StatsError::DatasetNotFound(format!(
                "{} not found under {}; download it first or pass --data-dir",
                self.key,
                versions.display()
            ))),
        }
    }
}

/// `true` when `root` holds at least one platform subdirectory.
pub fn looks_like_dataset(root: &Path) -> bool {
    Platform::LOAD_ORDER
        .iter()
        .any(|p| root.join(p.dir_name()).is_dir())
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn default_cache_root() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os(CACHE_ENV) {
        return Some(PathBuf::from(dir));
    }
    dirs::home_dir().map(|home| home.join(".cache").join("kagglehub"))
}

/// Highest numbered subdirectory of `versions`.
fn latest_version(versions: &Path) -> Option<PathBuf> {
    if !versions.is_dir() {
        debug!("No versions directory at {}", versions.display());
        return None;
    }

    walkdir::WalkDir::new(versions)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_dir())
        .filter_map(|entry| {
            let n: u64 = entry.file_name().to_str()?.parse().ok()?;
            Some((n, entry.into_path()))
        })
        .max_by_key(|(n, _)| *n)
        .map(|(_, path)| path)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn versions_dir(cache: &Path) -> PathBuf {
        cache.join("datasets").join(DATASET_KEY).join("versions")
    }

    #[test]
    fn test_explicit_directory_wins() {
        let data = TempDir::new().unwrap();
        let cache = TempDir::new().unwrap();
        std::fs::create_dir_all(versions_dir(cache.path()).join("3")).unwrap();

        let root = DatasetLocator::new(Some(data.path().to_path_buf()))
            .with_cache_root(cache.path())
            .locate()
            .unwrap();
        assert_eq!(root, data.path());
    }

    #[test]
    fn test_explicit_missing_directory_is_error() {
        let tmp = TempDir::new().unwrap();
        let err = DatasetLocator::new(Some(tmp.path().join("nope")))
            .locate()
            .unwrap_err();
        assert!(matches!(err, StatsError::DatasetNotFound(_)));
    }

    #[test]
    fn test_highest_numeric_version_selected() {
        let cache = TempDir::new().unwrap();
        let versions = versions_dir(cache.path());
        for v in ["1", "2", "10", "latest"] {
            std::fs::create_dir_all(versions.join(v)).unwrap();
        }
        std::fs::write(versions.join("99"), "not a dir").unwrap();

        let root = DatasetLocator::new(None)
            .with_cache_root(cache.path())
            .locate()
            .unwrap();
        assert_eq!(root, versions.join("10"));
    }

    #[test]
    fn test_empty_cache_is_not_found() {
        let cache = TempDir::new().unwrap();
        let err = DatasetLocator::new(None)
            .with_cache_root(cache.path())
            .locate()
            .unwrap_err();
        assert!(err.to_string().contains(DATASET_KEY));
    }

    #[test]
    fn test_looks_like_dataset() {
        let tmp = TempDir::new().unwrap();
        assert!(!looks_like_dataset(tmp.path()));
        std::fs::create_dir_all(tmp.path().join("xbox")).unwrap();
        assert!(looks_like_dataset(tmp.path()));
    }
}
