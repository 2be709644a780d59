use anyhow::Context;
use banks_etl::config::DEFAULT_CONFIG_FILE;
use banks_etl::utils::{logger, validation::Validate};
use banks_etl::{DefaultPipeline, EtlConfig, EtlEngine, EtlError, ProgressLog};
use std::sync::Arc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = EtlConfig::load_or_default(DEFAULT_CONFIG_FILE)
        .with_context(|| format!("Failed to load config file '{}'", DEFAULT_CONFIG_FILE))?;

    logger::init_cli_logger(config.logging.verbose);
    tracing::info!("Starting banks-etl");
    tracing::debug!("Config: {:?}", config);

    if let Err(e) = config.validate() {
        fail(&e);
    }

    let progress = Arc::new(ProgressLog::new(&config.logging.progress_log));
    let pipeline = match DefaultPipeline::from_config(&config) {
        Ok(pipeline) => pipeline,
        Err(e) => fail(&e),
    };

    let engine = EtlEngine::new(pipeline, progress);
    match engine.run().await {
        Ok(summary) => {
            tracing::info!(
                "✅ ETL process completed: {} records, CSV at {}, table {}, {} queries",
                summary.records,
                summary.csv_location,
                summary.table,
                summary.queries_executed
            );
            Ok(())
        }
        Err(e) => fail(&e),
    }
}

fn fail(e: &EtlError) -> ! {
    tracing::error!("❌ ETL process failed: {} (Category: {:?})", e, e.category());
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    std::process::exit(1);
}
