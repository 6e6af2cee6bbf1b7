//! Device State Store Interface
//!
//! Abstraction over the ledger that holds each device's latest status

use async_trait::async_trait;

use crate::alerting::{error::StoreError, types::SecurityStatusRecord};

/// Selects one instance of a device-scoped ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerScope {
    pub device_id: String,
}

impl LedgerScope {
    pub fn device(device_id: impl Into<String>) -> Self {
        Self { device_id: device_id.into() }
    }
}

/// Read access to the latest security status of a device.
#[async_trait]
pub trait StateStore {
    /// Fetch the current record. `Ok(None)` means the ledger has no data
    /// for this scope.
    async fn fetch(
        &self,
        ledger_name: &str,
        scope: &LedgerScope,
    ) -> Result<Option<SecurityStatusRecord>, StoreError>;

    /// Name of this store for logging
    fn store_name(&self) -> &str;
}
