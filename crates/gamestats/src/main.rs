mod bootstrap;

use anyhow::{Context, Result};
use stats_core::settings::{SavedParams, Settings, View};
use stats_data::aggregator::AggregationConfig;
use stats_runtime::context::PipelineContext;
use stats_runtime::dataset::DatasetLocator;
use stats_ui::app::run_dashboard;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(
        &settings.log_level,
        settings.log_file.as_ref(),
        settings.is_dashboard(),
    )?;

    let saved = SavedParams::default_path();
    if let Err(e) = settings.remember(&saved) {
        tracing::warn!("could not update {}: {}", saved.display(), e);
    }

    tracing::info!("gamestats v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!("View: {:?}, Theme: {}", settings.view, settings.theme);

    let locator = DatasetLocator::new(settings.data_dir.clone());
    let root = locator
        .locate()
        .with_context(|| format!("could not locate dataset {}", locator.key()))?;

    let config = AggregationConfig {
        min_games_per_genre: settings.min_genre_games,
        top_genres: settings.top_genres,
    };

    let mut context = PipelineContext::new();
    let output = context.run(&root, &config)?;
    tracing::info!(
        "Pipeline finished: {} raw games, {} priced, load {:.2}s, transform {:.2}s",
        output.metadata.raw_games,
        output.summaries.metadata.priced_games,
        output.metadata.load_time_seconds,
        output.metadata.transform_time_seconds
    );
    let summaries = output.summaries.clone();

    match settings.view {
        View::Report => {
            println!("{}", summaries.to_json()?);
        }

        View::Dashboard => {
            let theme = settings.theme.clone();
            let dashboard = tokio::task::spawn_blocking(move || run_dashboard(&theme, summaries));

            // Raw mode delivers Ctrl+C as a key event; the signal covers the
            // window before the terminal is switched.
            tokio::select! {
                result = dashboard => {
                    result??;
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Ctrl+C received; shutting down");
                }
            }
        }
    }

    Ok(())
}
