use std::path::PathBuf;
use thiserror::Error;

use crate::models::Platform;

/// All errors produced by the gaming statistics pipeline.
#[derive(Error, Debug)]
pub enum StatsError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The mandatory games table for a platform is absent.
    #[error("Games file for {platform} not found: {path}")]
    GamesFileMissing { platform: Platform, path: PathBuf },

    /// A CSV document could not be parsed.
    #[error("Failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The summaries could not be rendered as JSON.
    #[error("Failed to write JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A price cell could not be coerced to a number.
    #[error("Invalid price {value:?} for {platform} game {game_id}")]
    InvalidPrice {
        platform: Platform,
        game_id: String,
        value: String,
    },

    /// No local copy of the dataset could be located.
    #[error("Dataset not found: {0}")]
    DatasetNotFound(String),

}

/// Convenience alias used throughout the stats crates.
pub type Result<T> = std::result::Result<T, StatsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = StatsError::FileRead {
            path: PathBuf::from("/data/steam/prices.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/data/steam/prices.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_games_file_missing() {
        let err = StatsError::GamesFileMissing {
            platform: Platform::Xbox,
            path: PathBuf::from("/data/xbox/games.csv"),
        };
        assert_eq!(
            err.to_string(),
            "Games file for xbox not found: /data/xbox/games.csv"
        );
    }

    #[test]
    fn test_error_display_invalid_price() {
        let err = StatsError::InvalidPrice {
            platform: Platform::Steam,
            game_id: "730".to_string(),
            value: "free".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid price \"free\" for steam game 730");
    }

    #[test]
    fn test_error_display_dataset_not_found() {
        let err = StatsError::DatasetNotFound("owner/slug".to_string());
        assert_eq!(err.to_string(), "Dataset not found: owner/slug");
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: StatsError = json_err.into();
        assert!(err.to_string().contains("Failed to write JSON"));
    }
}
