mod config;
mod mode;

use anyhow::Context;
use chrono::Local;
use scores_engine::{ensure_output_dir, Orchestrator, RunSummary};
use scores_logging::{scrape_info, scrape_warn};

use config::AppConfig;
use mode::Mode;

fn main() -> anyhow::Result<()> {
    let mode = Mode::from_args(std::env::args().skip(1))?;
    let config = AppConfig::load()?;
    scores_logging::initialize(
        config.log_destination(),
        config.log_level.into(),
        &config.log_path(),
    );

    ensure_output_dir(&config.output_dir)
        .with_context(|| format!("output directory {:?} is not usable", config.output_dir))?;
    let engine_config = config.engine_config()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;
    let summary = runtime.block_on(async move {
        let mut orchestrator =
            Orchestrator::with_defaults(engine_config).context("failed to start the scraper engine")?;
        run(&mut orchestrator, mode).await
    })?;

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => scrape_info!("Run summary:\n{}", json),
        Err(err) => scrape_warn!("Could not serialize run summary: {}", err),
    }
    Ok(())
}

async fn run(orchestrator: &mut Orchestrator, mode: Mode) -> anyhow::Result<RunSummary> {
    let summary = match mode {
        Mode::Nightly => {
            let yesterday = Local::now()
                .date_naive()
                .pred_opt()
                .context("no calendar day before today")?;
            scrape_info!("Nightly run for {}", yesterday);
            orchestrator.run_range(yesterday, yesterday).await
        }
        Mode::Full { start, end } => {
            scrape_info!("Full run {} -> {}", start, end);
            orchestrator.run_range(start, end).await
        }
        Mode::Rescrape => {
            scrape_info!("Re-scraping failed and empty days");
            orchestrator.rescrape_failed().await
        }
    };
    Ok(summary)
}
