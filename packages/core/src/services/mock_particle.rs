//! In-memory stand-ins for the Particle ledger and publish APIs.
//!
//! Used by unit tests and the integration suite in `tests/`.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::alerting::{
    error::{PublishError, StoreError},
    publisher::{EventPublisher, PublishOptions},
    store::{LedgerScope, StateStore},
    types::SecurityStatusRecord,
};

/// Ledger double returning a canned record or error.
#[derive(Default)]
pub struct MockLedger {
    record: Option<SecurityStatusRecord>,
    error: Option<fn() -> StoreError>,
    requests: Mutex<Vec<(String, LedgerScope)>>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut self, record: SecurityStatusRecord) -> Self {
        self.record = Some(record);
        self
    }

    pub fn with_error(mut self, error: fn() -> StoreError) -> Self {
        self.error = Some(error);
        self
    }

    /// Ledger name and scope of every fetch so far.
    pub fn requests(&self) -> Vec<(String, LedgerScope)> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl StateStore for MockLedger {
    async fn fetch(
        &self,
        ledger_name: &str,
        scope: &LedgerScope,
    ) -> Result<Option<SecurityStatusRecord>, StoreError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push((ledger_name.to_string(), scope.clone()));
        }
        match self.error {
            Some(make_error) => Err(make_error()),
            None => Ok(self.record.clone()),
        }
    }

    fn store_name(&self) -> &str {
        "Mock Ledger"
    }
}

/// A single recorded publish call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedEvent {
    pub event_name: String,
    pub payload: String,
    pub options: PublishOptions,
}

/// Publisher double that records calls and can be told to fail.
#[derive(Default)]
pub struct MockPublisher {
    events: Mutex<Vec<PublishedEvent>>,
    error: Option<fn() -> PublishError>,
}

impl MockPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_error(mut self, error: fn() -> PublishError) -> Self {
        self.error = Some(error);
        self
    }

    pub fn events(&self) -> Vec<PublishedEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl EventPublisher for MockPublisher {
    async fn publish(
        &self,
        event_name: &str,
        payload: &str,
        options: &PublishOptions,
    ) -> Result<(), PublishError> {
        if let Some(make_error) = self.error {
            return Err(make_error());
        }
        if let Ok(mut events) = self.events.lock() {
            events.push(PublishedEvent {
                event_name: event_name.to_string(),
                payload: payload.to_string(),
                options: options.clone(),
            });
        }
        Ok(())
    }

    fn publisher_name(&self) -> &str {
        "Mock Publisher"
    }
}
