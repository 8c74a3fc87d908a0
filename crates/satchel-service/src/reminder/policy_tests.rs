use chrono::Duration;
use satchel_core::types::{EventType, ReminderState};

use super::policy::{resolve_on_update, schedule_on_create};
use crate::event::Event;
use crate::event::test_fixtures::{
    app_user, fixed_now, lesson_due_homework_event, lesson_event, profile, subject,
};

#[test]
fn create_schedules_trigger_minus_lead() {
    let user = app_user("Ada");
    let profile = profile(user.id);
    let trigger = fixed_now() + Duration::hours(4);

    assert_eq!(
        schedule_on_create(trigger, &profile, EventType::Lesson),
        Some(trigger - Duration::minutes(30))
    );
    assert_eq!(
        schedule_on_create(trigger, &profile, EventType::Assessment),
        Some(trigger - Duration::minutes(60))
    );
    assert_eq!(
        schedule_on_create(trigger, &profile, EventType::Homework),
        Some(trigger - Duration::minutes(120))
    );
}

#[test]
fn opted_out_types_are_never_scheduled() {
    let user = app_user("Ada");
    let mut profile = profile(user.id);
    profile.receive_lesson_reminders = false;
    let trigger = fixed_now() + Duration::hours(4);

    assert_eq!(
        schedule_on_create(trigger, &profile, EventType::Lesson),
        None
    );
    // Other types keep their own opt-in.
    assert!(schedule_on_create(trigger, &profile, EventType::Assessment).is_some());
}

#[test]
fn past_reminder_instants_are_still_scheduled() {
    // A trigger closer than the lead time yields an already-due reminder;
    // the next sweep delivers it instead of it being dropped.
    let user = app_user("Ada");
    let profile = profile(user.id);
    let trigger = fixed_now() + Duration::minutes(10);

    let scheduled = schedule_on_create(trigger, &profile, EventType::Lesson).unwrap();
    assert!(scheduled < fixed_now());
}

#[test]
fn homework_due_at_a_lesson_schedules_from_the_lesson_start() {
    let user = app_user("Ada");
    let mut profile = profile(user.id);
    profile.homework_reminder_minutes = 2 * 24 * 60;
    let physics = subject(user.id, "Physics");
    let due_lesson = lesson_event(&physics, fixed_now() + Duration::days(7));
    let event = Event::Homework(lesson_due_homework_event(due_lesson));

    let trigger = event.effective_trigger_time().unwrap();
    assert_eq!(
        schedule_on_create(trigger, &profile, EventType::Homework),
        Some(fixed_now() + Duration::days(5))
    );
}

#[test]
fn sent_is_terminal_across_updates() {
    let user = app_user("Ada");
    let profile = profile(user.id);
    let sent_at = fixed_now() - Duration::hours(1);
    let old_trigger = fixed_now();
    let new_trigger = fixed_now() + Duration::days(2);

    assert_eq!(
        resolve_on_update(
            ReminderState::Sent(sent_at),
            old_trigger,
            new_trigger,
            &profile,
            EventType::Lesson,
        ),
        ReminderState::Sent(sent_at)
    );
}

#[test]
fn unscheduled_stays_latched_across_updates() {
    let user = app_user("Ada");
    let profile = profile(user.id);

    assert_eq!(
        resolve_on_update(
            ReminderState::Unscheduled,
            fixed_now(),
            fixed_now() + Duration::days(2),
            &profile,
            EventType::Lesson,
        ),
        ReminderState::Unscheduled
    );
}

#[test]
fn pending_reminder_moves_only_when_the_trigger_moved() {
    let user = app_user("Ada");
    let profile = profile(user.id);
    let old_trigger = fixed_now() + Duration::hours(4);
    let scheduled = ReminderState::Scheduled(old_trigger - Duration::minutes(30));

    // Same trigger: untouched.
    assert_eq!(
        resolve_on_update(
            scheduled,
            old_trigger,
            old_trigger,
            &profile,
            EventType::Lesson
        ),
        scheduled
    );

    // Moved trigger: recomputed from the new trigger and current lead time.
    let new_trigger = fixed_now() + Duration::days(1);
    assert_eq!(
        resolve_on_update(
            scheduled,
            old_trigger,
            new_trigger,
            &profile,
            EventType::Lesson
        ),
        ReminderState::Scheduled(new_trigger - Duration::minutes(30))
    );
}
