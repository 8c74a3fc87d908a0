//! The notification sweep: claim each due reminder, deliver it, release
//! the claim on failure.
//!
//! The claim is flipped before any delivery attempt, so two sweeps racing
//! over the same due set deliver each reminder exactly once. The claim is
//! released for retry only when no selected channel got the reminder out;
//! once any channel has delivered, the claim is kept, so a retry can never
//! repeat a channel that already succeeded. A reminder whose owner has
//! since opted out is consumed without delivery.

use chrono::{DateTime, Utc};
use satchel_core::types::NotificationMethod;

use crate::error::ServiceResult;
use crate::notify::{DeliveryChannel, DeliveryError, ReminderPayload, build_payload};
use crate::reminder::store::ReminderStore;

/// Outcome counts of one sweep pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Events whose scheduled reminder time had passed.
    pub due: usize,
    /// Reminders delivered on at least one channel the owner selected.
    pub delivered: usize,
    /// Claims released after every selected channel failed, left for retry.
    pub failed: usize,
    /// Claims lost to a concurrent sweep; nothing was sent.
    pub lost_claims: usize,
    /// Claims consumed without delivery because the owner opted out after
    /// the reminder was scheduled.
    pub skipped: usize,
}

/// ## Summary
/// Runs one sweep pass over every due reminder.
///
/// ## Errors
/// Returns an error only when the store itself fails; per-reminder
/// delivery failures are counted in the stats and retried next pass.
#[tracing::instrument(skip_all, fields(now = %now))]
pub async fn run_sweep(
    store: &dyn ReminderStore,
    email: &dyn DeliveryChannel,
    push: &dyn DeliveryChannel,
    now: DateTime<Utc>,
) -> ServiceResult<SweepStats> {
    let due = store.due_reminders(now).await?;
    let mut stats = SweepStats {
        due: due.len(),
        ..SweepStats::default()
    };

    for reminder in due {
        let event_type = reminder.event.event_type();
        let id = reminder.event.id();

        if !store.claim(event_type, id).await? {
            stats.lost_claims += 1;
            continue;
        }

        if !reminder.profile.receives_reminders(event_type) {
            tracing::debug!(
                %event_type, %id,
                "owner opted out after scheduling; consuming reminder unsent"
            );
            stats.skipped += 1;
            continue;
        }

        let payload = match build_payload(&reminder.event, &reminder.owner, &reminder.profile, now)
        {
            Ok(payload) => payload,
            Err(error) => {
                tracing::warn!(%event_type, %id, %error, "payload assembly failed; releasing claim");
                store.release(event_type, id).await?;
                stats.failed += 1;
                continue;
            }
        };

        let method: NotificationMethod = reminder.profile.notification_method.into();
        let outcome = dispatch(&payload, method, email, push).await;
        match outcome {
            Dispatch {
                succeeded: 0,
                failure: Some((channel, error)),
            } => {
                tracing::warn!(%event_type, %id, channel, %error, "reminder delivery failed; releasing claim");
                store.release(event_type, id).await?;
                stats.failed += 1;
            }
            Dispatch {
                failure: Some((channel, error)),
                ..
            } => {
                // One channel already got the reminder out; releasing the
                // claim here would resend it, so the failed channel is
                // dropped instead of retried.
                tracing::warn!(%event_type, %id, channel, %error, "channel failed after another delivered; keeping claim");
                stats.delivered += 1;
            }
            Dispatch { .. } => stats.delivered += 1,
        }
    }

    tracing::info!(
        due = stats.due,
        delivered = stats.delivered,
        failed = stats.failed,
        lost_claims = stats.lost_claims,
        skipped = stats.skipped,
        "sweep pass complete"
    );
    Ok(stats)
}

struct Dispatch {
    succeeded: usize,
    failure: Option<(&'static str, DeliveryError)>,
}

async fn dispatch(
    payload: &ReminderPayload,
    method: NotificationMethod,
    email: &dyn DeliveryChannel,
    push: &dyn DeliveryChannel,
) -> Dispatch {
    let mut outcome = Dispatch {
        succeeded: 0,
        failure: None,
    };
    if method.includes_email() {
        match email.deliver(payload).await {
            Ok(()) => outcome.succeeded += 1,
            Err(error) => outcome.failure = Some(("email", error)),
        }
    }
    if method.includes_push() {
        match push.deliver(payload).await {
            Ok(()) => outcome.succeeded += 1,
            Err(error) => outcome.failure = Some(("push", error)),
        }
    }
    outcome
}
