//! Security alert job scheduling.
//!
//! `run_job` is a single evaluate-and-maybe-publish pass. `run_scheduled`
//! drives it on a fixed interval, the way the cloud scheduler would.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::signal;
use tokio::time::{self, MissedTickBehavior};

use crate::alerting::{
    AlertConfig, AlertEvaluator, EventPublisher, JobError, JobOutcome, LedgerScope, PayloadMode,
    PublishOptions, SecurityStatusRecord, StateStore,
};

/// Run the alert job once.
///
/// 1. Fetch the device record from `config.ledger_name`
/// 2. Evaluate it against the alert triggers
/// 3. Publish `config.event_name` if anything matched
///
/// Collaborator errors are returned as-is; there is no retry.
pub async fn run_job(
    store: &(dyn StateStore + Send + Sync),
    publisher: &(dyn EventPublisher + Send + Sync),
    evaluator: &AlertEvaluator,
    config: &AlertConfig,
) -> Result<JobOutcome, JobError> {
    let scope = LedgerScope::device(config.device_id.as_str());

    let Some(record) = store.fetch(&config.ledger_name, &scope).await? else {
        tracing::debug!(
            "{} has no '{}' data for {}",
            store.store_name(),
            config.ledger_name,
            config.device_id
        );
        return Ok(JobOutcome::NoData);
    };

    let triggers = evaluator.triggers(Some(&record));
    if triggers.is_empty() {
        return Ok(JobOutcome::Quiet);
    }

    let payload = build_payload(&config.payload_mode, &record)?;
    let options = PublishOptions {
        product_id: config.product_id.clone(),
    };

    tracing::warn!(
        "Security alert for {}: {}",
        config.device_id,
        triggers
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );

    publisher
        .publish(&config.event_name, &payload, &options)
        .await?;

    tracing::debug!(
        "Published {} via {}",
        config.event_name,
        publisher.publisher_name()
    );

    Ok(JobOutcome::Published { triggers })
}

fn build_payload(mode: &PayloadMode, record: &SecurityStatusRecord) -> Result<String, JobError> {
    match mode {
        PayloadMode::Serialized => Ok(serde_json::to_string(&record.raw)?),
        PayloadMode::Literal(text) => Ok(text.clone()),
    }
}

/// Run the alert job on a fixed interval.
///
/// A failed run is logged and the loop moves on to the next tick.
/// Runs until `Ctrl+C` (SIGINT) is received.
pub async fn run_scheduled(
    store: Arc<dyn StateStore + Send + Sync>,
    publisher: Arc<dyn EventPublisher + Send + Sync>,
    evaluator: AlertEvaluator,
    config: AlertConfig,
    interval_seconds: u64,
) {
    let mut interval = time::interval(Duration::from_secs(interval_seconds));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(
        "Security alert job scheduled (device: {}, interval: {}s)",
        config.device_id,
        interval_seconds
    );

    loop {
        tokio::select! {
            _ = interval.tick() => {
                tick(store.as_ref(), publisher.as_ref(), &evaluator, &config).await;
            }

            _ = signal::ctrl_c() => {
                tracing::info!("Shutdown signal received. Stopping job.");
                break;
            }
        }
    }

    tracing::info!("Security alert job stopped cleanly");
}

/// One scheduled invocation. Returns whether the run succeeded.
async fn tick(
    store: &(dyn StateStore + Send + Sync),
    publisher: &(dyn EventPublisher + Send + Sync),
    evaluator: &AlertEvaluator,
    config: &AlertConfig,
) -> bool {
    let started = Utc::now();
    let result = run_job(store, publisher, evaluator, config).await;
    tracing::debug!(
        "Run finished in {}ms",
        (Utc::now() - started).num_milliseconds()
    );

    match result {
        Ok(outcome) => {
            log_outcome(&outcome);
            true
        }
        Err(err) => {
            tracing::error!("Security alert job failed, waiting for next tick: {}", err);
            false
        }
    }
}

pub fn log_outcome(outcome: &JobOutcome) {
    match outcome {
        JobOutcome::NoData => tracing::info!("No security status recorded yet"),
        JobOutcome::Quiet => tracing::info!("Security status normal"),
        JobOutcome::Published { triggers } => {
            tracing::info!("Alert published ({} trigger(s))", triggers.len())
        }
    }
}
