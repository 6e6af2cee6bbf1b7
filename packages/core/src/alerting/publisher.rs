//! Event Publisher Interface

use async_trait::async_trait;

use crate::alerting::error::PublishError;

/// Delivery options attached to a published event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOptions {
    /// Product (channel) the event is published under.
    pub product_id: String,
}

/// Fire-and-forget event emission.
#[async_trait]
pub trait EventPublisher {
    async fn publish(
        &self,
        event_name: &str,
        payload: &str,
        options: &PublishOptions,
    ) -> Result<(), PublishError>;

    /// Name of this publisher for logging
    fn publisher_name(&self) -> &str;
}
