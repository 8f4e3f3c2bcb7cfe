//! Cardiorisk: cardiovascular disease risk predictor
//!
//! Main entry point for the terminal application.

use std::io::IsTerminal;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cardiorisk::adapters::sanitize::SanitizingMakeWriter;
use cardiorisk::adapters::ModelArtifacts;
use cardiorisk::config::AppConfig;
use cardiorisk::tui::App;
use cardiorisk::RiskEvaluator;

fn main() -> Result<()> {
    let config = AppConfig::from_env();

    // Writing logs to the terminal would corrupt the TUI (alternate screen).
    let interactive = std::io::stdout().is_terminal();
    let (writer, _guard) = if config.log_mode.use_file(interactive) {
        if let Some(parent) = config.log_file.parent() {
            // Best-effort: don't fail startup just because the directory is missing.
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)
            .with_context(|| format!("Failed to open log file {:?}", config.log_file))?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    tracing::info!("Starting Cardiorisk...");

    // Refuse to start without all three artifacts.
    let artifacts = ModelArtifacts::load(&config.model_dir, config.require_manifest)
        .with_context(|| {
            format!(
                "Failed to load model artifacts from {:?}. Set CARDIORISK_MODEL_DIR to a directory containing feature_order.json, scaler.json and cardio_model.json.",
                config.model_dir
            )
        })?;

    let mut app = App::new(RiskEvaluator::from_artifacts(artifacts));
    app.run()?;

    tracing::info!("Cardiorisk shutdown complete.");
    Ok(())
}
