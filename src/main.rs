use std::process::exit;

use clap::Parser;
use rank_tracker::{
    args::Args,
    commands::execute,
    database::{db::DbClient, file_store::JsonFileStore},
    model::{config::LadderConfig, error::TrackerError, evaluator::CycleEvaluator}
};
use tracing::{error, info};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let indicatif_layer = IndicatifLayer::new();
    tracing_subscriber::registry()
        .with(EnvFilter::new(&args.log_level))
        .with(tracing_subscriber::fmt::layer().with_writer(indicatif_layer.get_stderr_writer()))
        .with(indicatif_layer)
        .init();

    match run(&args).await {
        Ok(output) => println!("{}", output),
        Err(e) => {
            error!("{}", e);
            exit(1);
        }
    }
}

async fn run(args: &Args) -> Result<String, TrackerError> {
    let evaluator = evaluator(args)?;
    let now = chrono::Local::now().fixed_offset();

    match &args.connection_string {
        Some(connection_string) => {
            info!("Using database member store");
            let client = DbClient::connect(connection_string)
                .await
                .map_err(|e| TrackerError::Persistence(e.into()))?;
            client.ensure_schema().await?;

            execute(&client, &evaluator, &args.command, now).await
        }
        None => {
            info!("Using member file {}", args.store_path.display());
            let store = JsonFileStore::new(args.store_path.clone());

            execute(&store, &evaluator, &args.command, now).await
        }
    }
}

fn evaluator(args: &Args) -> Result<CycleEvaluator, TrackerError> {
    let mut config = match &args.ladder_config {
        Some(path) => LadderConfig::from_path(path)?,
        None => args.preset.config()
    };

    if let Some(global_multiplier) = args.global_multiplier {
        config.settings.global_multiplier = global_multiplier;
    }
    config.settings.threshold_doubled |= args.double_thresholds;
    config.settings.threshold_tripled |= args.triple_thresholds;

    config.build()
}
