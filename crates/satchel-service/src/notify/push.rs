//! Push delivery placeholder.
//!
//! No push provider is wired up yet; the channel accepts every payload
//! and records it, so sweep accounting treats push-only users as served.
//! TODO: replace with a real provider once the mobile client ships device
//! token registration.

use async_trait::async_trait;

use super::{DeliveryChannel, DeliveryError, ReminderPayload};

pub struct PushChannel;

#[async_trait]
impl DeliveryChannel for PushChannel {
    async fn deliver(&self, payload: &ReminderPayload) -> Result<(), DeliveryError> {
        tracing::info!(
            recipient = %payload.recipient_email,
            event_type = %payload.event_type,
            title = %payload.title,
            "push delivery not configured; reminder logged only"
        );
        Ok(())
    }
}
