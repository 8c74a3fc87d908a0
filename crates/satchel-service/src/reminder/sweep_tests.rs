use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use satchel_core::types::EventType;
use satchel_db::db::enums::NotificationMethod;
use uuid::Uuid;

use super::store::{DueReminder, ReminderStore};
use super::sweep::run_sweep;
use crate::error::ServiceResult;
use crate::event::test_fixtures::{app_user, fixed_now, profile, scheduled_lesson_event, subject};
use crate::notify::{DeliveryChannel, DeliveryError, ReminderPayload};

struct MemoryEntry {
    due: DueReminder,
    sent: bool,
}

/// In-memory store with the same atomic claim semantics as the Postgres
/// conditional update.
#[derive(Default)]
struct MemoryStore {
    entries: Mutex<HashMap<(EventType, Uuid), MemoryEntry>>,
}

impl MemoryStore {
    fn add(&self, due: DueReminder) {
        let key = (due.event.event_type(), due.event.id());
        self.entries
            .lock()
            .unwrap()
            .insert(key, MemoryEntry { due, sent: false });
    }

    fn sent(&self, event_type: EventType, id: Uuid) -> bool {
        self.entries.lock().unwrap()[&(event_type, id)].sent
    }
}

#[async_trait]
impl ReminderStore for MemoryStore {
    async fn due_reminders(&self, now: DateTime<Utc>) -> ServiceResult<Vec<DueReminder>> {
        let entries = self.entries.lock().unwrap();
        Ok(entries
            .values()
            .filter(|e| !e.sent)
            .filter(|e| {
                e.due
                    .event
                    .reminder_state()
                    .unwrap()
                    .scheduled_at()
                    .is_some_and(|at| at <= now)
            })
            .map(|e| e.due.clone())
            .collect())
    }

    async fn claim(&self, event_type: EventType, id: Uuid) -> ServiceResult<bool> {
        let mut entries = self.entries.lock().unwrap();
        let entry = entries.get_mut(&(event_type, id)).unwrap();
        if entry.sent {
            Ok(false)
        } else {
            entry.sent = true;
            Ok(true)
        }
    }

    async fn release(&self, event_type: EventType, id: Uuid) -> ServiceResult<()> {
        self.entries
            .lock()
            .unwrap()
            .get_mut(&(event_type, id))
            .unwrap()
            .sent = false;
        Ok(())
    }
}

/// Channel that records payloads and can fail its first N deliveries.
#[derive(Default)]
struct MockChannel {
    delivered: Mutex<Vec<ReminderPayload>>,
    fail_next: AtomicUsize,
}

impl MockChannel {
    fn failing(times: usize) -> Self {
        let channel = Self::default();
        channel.fail_next.store(times, Ordering::SeqCst);
        channel
    }

    fn count(&self) -> usize {
        self.delivered.lock().unwrap().len()
    }
}

#[async_trait]
impl DeliveryChannel for MockChannel {
    async fn deliver(&self, payload: &ReminderPayload) -> Result<(), DeliveryError> {
        let remaining = self.fail_next.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_next.store(remaining - 1, Ordering::SeqCst);
            return Err(DeliveryError::Rejected { status: 503 });
        }
        self.delivered.lock().unwrap().push(payload.clone());
        Ok(())
    }
}

fn due_lesson_reminder(method: NotificationMethod) -> DueReminder {
    let user = app_user("Ada");
    let mut profile = profile(user.id);
    profile.notification_method = method;
    let physics = subject(user.id, "Physics");
    let event = scheduled_lesson_event(
        &physics,
        fixed_now() + Duration::minutes(30),
        fixed_now() - Duration::minutes(5),
    );
    DueReminder {
        event,
        owner: user,
        profile,
    }
}

#[test_log::test(tokio::test)]
async fn due_reminder_is_delivered_once_and_latched() {
    let store = MemoryStore::default();
    let reminder = due_lesson_reminder(NotificationMethod::Email);
    let key = (reminder.event.event_type(), reminder.event.id());
    store.add(reminder);
    let email = MockChannel::default();
    let push = MockChannel::default();

    let stats = run_sweep(&store, &email, &push, fixed_now()).await.unwrap();
    assert_eq!(stats.due, 1);
    assert_eq!(stats.delivered, 1);
    assert_eq!(email.count(), 1);
    assert_eq!(push.count(), 0);
    assert!(store.sent(key.0, key.1));

    // The next pass sees nothing due; nothing is resent.
    let stats = run_sweep(&store, &email, &push, fixed_now()).await.unwrap();
    assert_eq!(stats.due, 0);
    assert_eq!(email.count(), 1);
}

#[test_log::test(tokio::test)]
async fn reminders_scheduled_in_the_future_are_not_due() {
    let store = MemoryStore::default();
    let user = app_user("Ada");
    let physics = subject(user.id, "Physics");
    let event = scheduled_lesson_event(
        &physics,
        fixed_now() + Duration::hours(4),
        fixed_now() + Duration::hours(2),
    );
    store.add(DueReminder {
        event,
        owner: user.clone(),
        profile: profile(user.id),
    });
    let email = MockChannel::default();
    let push = MockChannel::default();

    let stats = run_sweep(&store, &email, &push, fixed_now()).await.unwrap();
    assert_eq!(stats.due, 0);
    assert_eq!(email.count(), 0);
}

#[test_log::test(tokio::test)]
async fn failed_delivery_releases_the_claim_for_retry() {
    let store = MemoryStore::default();
    let reminder = due_lesson_reminder(NotificationMethod::Email);
    let key = (reminder.event.event_type(), reminder.event.id());
    store.add(reminder);
    let email = MockChannel::failing(1);
    let push = MockChannel::default();

    let stats = run_sweep(&store, &email, &push, fixed_now()).await.unwrap();
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.delivered, 0);
    assert!(!store.sent(key.0, key.1));

    // The relay recovered; the retry pass delivers.
    let stats = run_sweep(&store, &email, &push, fixed_now()).await.unwrap();
    assert_eq!(stats.delivered, 1);
    assert_eq!(email.count(), 1);
    assert!(store.sent(key.0, key.1));
}

#[test_log::test(tokio::test)]
async fn channels_follow_the_notification_method() {
    let store = MemoryStore::default();
    store.add(due_lesson_reminder(NotificationMethod::Both));
    let email = MockChannel::default();
    let push = MockChannel::default();

    let stats = run_sweep(&store, &email, &push, fixed_now()).await.unwrap();
    assert_eq!(stats.delivered, 1);
    assert_eq!(email.count(), 1);
    assert_eq!(push.count(), 1);
}

#[test_log::test(tokio::test)]
async fn partial_channel_failure_never_resends_the_delivered_channel() {
    let store = MemoryStore::default();
    let reminder = due_lesson_reminder(NotificationMethod::Both);
    let key = (reminder.event.event_type(), reminder.event.id());
    store.add(reminder);
    let email = MockChannel::default();
    let push = MockChannel::failing(1);

    // Email gets through, push doesn't; the claim is kept so the email
    // can't be repeated.
    let stats = run_sweep(&store, &email, &push, fixed_now()).await.unwrap();
    assert_eq!(stats.delivered, 1);
    assert_eq!(stats.failed, 0);
    assert!(store.sent(key.0, key.1));

    let stats = run_sweep(&store, &email, &push, fixed_now()).await.unwrap();
    assert_eq!(stats.due, 0);
    assert_eq!(email.count(), 1);
    assert_eq!(push.count(), 0);
}

#[test_log::test(tokio::test)]
async fn post_scheduling_opt_out_consumes_without_delivery() {
    let store = MemoryStore::default();
    let mut reminder = due_lesson_reminder(NotificationMethod::Email);
    reminder.profile.receive_lesson_reminders = false;
    let key = (reminder.event.event_type(), reminder.event.id());
    store.add(reminder);
    let email = MockChannel::default();
    let push = MockChannel::default();

    let stats = run_sweep(&store, &email, &push, fixed_now()).await.unwrap();
    assert_eq!(stats.skipped, 1);
    assert_eq!(email.count(), 0);
    // Consumed: later passes never pick it up again.
    assert!(store.sent(key.0, key.1));
}

#[test_log::test(tokio::test)]
async fn concurrent_sweeps_deliver_exactly_once() {
    let store = MemoryStore::default();
    store.add(due_lesson_reminder(NotificationMethod::Email));
    let email = MockChannel::default();
    let push = MockChannel::default();

    let (a, b) = tokio::join!(
        run_sweep(&store, &email, &push, fixed_now()),
        run_sweep(&store, &email, &push, fixed_now()),
    );
    let a = a.unwrap();
    let b = b.unwrap();

    assert_eq!(a.delivered + b.delivered, 1);
    assert_eq!(email.count(), 1);
    // The loser either lost the claim or never saw the row as due.
    assert!(a.lost_claims + b.lost_claims <= 1);
}
