//! Particle Cloud Adapters
//!
//! Adapts the ParticleClient to implement the StateStore and EventPublisher traits

use async_trait::async_trait;

use crate::alerting::{
    error::{PublishError, StoreError},
    publisher::{EventPublisher, PublishOptions},
    store::{LedgerScope, StateStore},
    types::SecurityStatusRecord,
};
use crate::error::AppError;
use crate::services::particle::ParticleClient;

/// Reads device status from a Particle device-scoped ledger
pub struct ParticleLedgerStore {
    client: ParticleClient,
}

impl ParticleLedgerStore {
    pub fn new(client: ParticleClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StateStore for ParticleLedgerStore {
    async fn fetch(
        &self,
        ledger_name: &str,
        scope: &LedgerScope,
    ) -> Result<Option<SecurityStatusRecord>, StoreError> {
        let data = self
            .client
            .fetch_ledger_data(ledger_name, &scope.device_id)
            .await
            .map_err(|err| match err {
                AppError::Auth(message) => StoreError::AuthError { message },
                AppError::Parse(message) => StoreError::format(message),
                AppError::Unavailable(_) => StoreError::ServiceUnavailable,
                other => StoreError::network(other.to_string()),
            })?;

        Ok(data.map(SecurityStatusRecord::from_value))
    }

    fn store_name(&self) -> &str {
        "Particle Ledger"
    }
}

/// Publishes events through the Particle product events API
pub struct ParticleEventPublisher {
    client: ParticleClient,
}

impl ParticleEventPublisher {
    pub fn new(client: ParticleClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EventPublisher for ParticleEventPublisher {
    async fn publish(
        &self,
        event_name: &str,
        payload: &str,
        options: &PublishOptions,
    ) -> Result<(), PublishError> {
        self.client
            .publish_product_event(&options.product_id, event_name, payload)
            .await
            .map_err(|err| match err {
                AppError::Auth(message) => PublishError::AuthError { message },
                AppError::Rejected(message) => PublishError::rejected(message),
                other => PublishError::network(other.to_string()),
            })
    }

    fn publisher_name(&self) -> &str {
        "Particle Publish"
    }
}
