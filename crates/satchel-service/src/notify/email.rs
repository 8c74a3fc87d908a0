//! Email delivery through the HTTP mail relay.

use async_trait::async_trait;
use satchel_core::config::MailConfig;
use serde::Serialize;

use super::{DeliveryChannel, DeliveryError, ReminderPayload};

/// Message body the relay accepts.
#[derive(Debug, Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: String,
    text: String,
}

/// Sends reminder emails by posting JSON messages to the configured relay.
pub struct EmailChannel {
    client: reqwest::Client,
    relay_url: String,
    from_address: String,
}

impl EmailChannel {
    /// ## Summary
    /// Builds the channel with a request timeout from the mail
    /// configuration.
    ///
    /// ## Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &MailConfig) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            relay_url: config.relay_url.clone(),
            from_address: config.from_address.clone(),
        })
    }

    fn render_subject(payload: &ReminderPayload) -> String {
        format!("Upcoming {}: {}", payload.event_type, payload.title)
    }

    fn render_body(payload: &ReminderPayload) -> String {
        format!(
            "Hi {},\n\n{} is scheduled for {} ({} left).\n\n{}\n",
            payload.recipient_name,
            payload.title,
            payload.scheduled_time,
            payload.time_left,
            payload.message,
        )
    }
}

#[async_trait]
impl DeliveryChannel for EmailChannel {
    async fn deliver(&self, payload: &ReminderPayload) -> Result<(), DeliveryError> {
        let message = RelayMessage {
            from: &self.from_address,
            to: &payload.recipient_email,
            subject: Self::render_subject(payload),
            text: Self::render_body(payload),
        };

        let response = self
            .client
            .post(&self.relay_url)
            .json(&message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                status = status.as_u16(),
                recipient = %payload.recipient_email,
                "mail relay rejected reminder"
            );
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
            });
        }

        tracing::debug!(
            recipient = %payload.recipient_email,
            event_type = %payload.event_type,
            "reminder email accepted by relay"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use satchel_core::types::EventType;

    use super::*;
    use crate::notify::event_type_message;

    fn payload() -> ReminderPayload {
        ReminderPayload {
            recipient_name: "Ada".to_owned(),
            recipient_email: "ada@example.edu".to_owned(),
            event_type: EventType::Assessment,
            title: "Exam — Physics".to_owned(),
            scheduled_time: "Monday, Sep 15, 2025 at 14:00".to_owned(),
            time_left: "2 hours".to_owned(),
            message: event_type_message(EventType::Assessment),
        }
    }

    #[test]
    fn subject_names_the_event() {
        assert_eq!(
            EmailChannel::render_subject(&payload()),
            "Upcoming assessment: Exam — Physics"
        );
    }

    #[test]
    fn body_greets_and_includes_schedule() {
        let body = EmailChannel::render_body(&payload());
        assert!(body.starts_with("Hi Ada,"));
        assert!(body.contains("Monday, Sep 15, 2025 at 14:00"));
        assert!(body.contains("2 hours left"));
        assert!(body.contains(event_type_message(EventType::Assessment)));
    }
}
