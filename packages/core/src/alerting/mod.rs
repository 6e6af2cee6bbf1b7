//! Security Status Alerting
//!
//! Decides whether a device's latest security status warrants an alert,
//! and defines the ledger and publish interfaces the job talks through.

pub mod config;
pub mod error;
pub mod evaluator;
pub mod particle_adapter;
pub mod publisher;
pub mod store;
pub mod types;


pub use config::{AlertConfig, PayloadMode};
pub use error::{JobError, PublishError, StoreError};
pub use evaluator::{should_report, AlertEvaluator};
pub use publisher::{EventPublisher, PublishOptions};
pub use store::{LedgerScope, StateStore};
pub use types::*;
