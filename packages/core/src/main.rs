use std::sync::Arc;

use clap::Parser;
use dotenvy::dotenv;

use security_alert_job::alerting::particle_adapter::{ParticleEventPublisher, ParticleLedgerStore};
use security_alert_job::alerting::AlertEvaluator;
use security_alert_job::cli::Cli;
use security_alert_job::config::Config;
use security_alert_job::error::AppError;
use security_alert_job::logging::init_logging;
use security_alert_job::scheduler::{log_outcome, run_job, run_scheduled};
use security_alert_job::services::particle::ParticleClient;

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_logging();

    let cli = Cli::parse();

    let config = Config::from_env()
        .and_then(|config| config.apply_cli(&cli))
        .map_err(AppError::Config)
        .unwrap_or_else(|err| {
            tracing::error!("{}", err);
            std::process::exit(1);
        });

    tracing::info!("Job started with config: {:?}", config);

    let client = ParticleClient::new(config.api_url.clone(), config.access_token.clone());
    let store = Arc::new(ParticleLedgerStore::new(client.clone()));
    let publisher = Arc::new(ParticleEventPublisher::new(client));
    let evaluator = AlertEvaluator::default();

    if cli.once {
        match run_job(store.as_ref(), publisher.as_ref(), &evaluator, &config.alert).await {
            Ok(outcome) => log_outcome(&outcome),
            Err(err) => {
                tracing::error!("Security alert job failed: {}", err);
                std::process::exit(1);
            }
        }
        return;
    }

    run_scheduled(
        store,
        publisher,
        evaluator,
        config.alert,
        config.interval_seconds,
    )
    .await;
}
