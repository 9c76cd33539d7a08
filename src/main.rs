use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use trip_planner::utils::{logger, validation::Validate};
use trip_planner::{
    web, AppConfig, CliConfig, CompletionClient, HttpTransport, LocalStorage, PdfRenderer,
    TripPlanner,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; a missing file is not an error
    dotenv::dotenv().ok();

    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting trip-planner");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match AppConfig::resolve(&cli).and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_message());
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Models: day-trip={}, multi-day={}; endpoint={}",
        config.day_trip.model,
        config.multi_day.model,
        config.completion.endpoint
    );
    tracing::info!(
        "📁 Exported itineraries go to: {} (keeping the newest {})",
        config.output_dir,
        config.max_documents
    );

    let transport = HttpTransport::new(Duration::from_secs(config.completion.timeout_seconds))?;
    let client = CompletionClient::from_env(config.completion.clone(), transport);
    let planner = TripPlanner::new(
        client,
        LocalStorage::new(&config.output_dir),
        Box::new(PdfRenderer::new()),
        config.day_trip.clone(),
        config.multi_day.clone(),
    )
    .with_max_documents(config.max_documents);

    let app = web::router(Arc::new(planner));
    web::serve(&config.bind, app).await
}
