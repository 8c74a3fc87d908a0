//! Decides when an event gets a reminder and for what instant.
//!
//! Scheduling is a one-shot latch: an event is considered for a reminder
//! exactly once, at creation. Updates never schedule a reminder that was
//! declined at create time, and never resurrect one that was already
//! delivered; the only thing an update can do is move a pending reminder
//! when the event's trigger time moved.

use chrono::{DateTime, Utc};
use satchel_core::types::{EventType, ReminderState};
use satchel_db::model::profile::UserProfile;

/// ## Summary
/// Decides whether a newly created event gets a reminder, and for what
/// instant: the trigger time minus the owner's per-type lead time.
///
/// Returns `None` when the owner opted out of reminders for this event
/// type. The resulting instant may already lie in the past; the sweep
/// picks such reminders up on its next pass rather than dropping them.
#[must_use]
pub fn schedule_on_create(
    trigger_time: DateTime<Utc>,
    profile: &UserProfile,
    event_type: EventType,
) -> Option<DateTime<Utc>> {
    if !profile.receives_reminders(event_type) {
        return None;
    }
    Some(trigger_time - profile.reminder_lead_time(event_type))
}

/// ## Summary
/// Resolves the reminder state an updated event should persist.
///
/// - `Sent` is terminal: no update resurrects a delivered reminder.
/// - `Unscheduled` stays unscheduled: the create-time decision latched.
/// - `Scheduled` moves with the trigger: when the trigger time changed,
///   the pending reminder is recomputed from the new trigger and the
///   owner's current lead time; otherwise it is left untouched.
#[must_use]
pub fn resolve_on_update(
    current: ReminderState,
    old_trigger: DateTime<Utc>,
    new_trigger: DateTime<Utc>,
    profile: &UserProfile,
    event_type: EventType,
) -> ReminderState {
    match current {
        ReminderState::Sent(at) => ReminderState::Sent(at),
        ReminderState::Unscheduled => ReminderState::Unscheduled,
        ReminderState::Scheduled(at) => {
            if old_trigger == new_trigger {
                ReminderState::Scheduled(at)
            } else {
                ReminderState::Scheduled(new_trigger - profile.reminder_lead_time(event_type))
            }
        }
    }
}
