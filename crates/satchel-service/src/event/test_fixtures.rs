//! Shared row and event builders for the service-layer tests.
//!
//! All builders anchor on a fixed "now" so assertions about windows and
//! scheduling stay deterministic.

use chrono::{DateTime, Duration, TimeZone, Utc};
use satchel_db::db::enums::{
    AssessmentType, LessonType, NotificationMethod, TimeDisplayFormat,
};
use satchel_db::model::assessment::Assessment;
use satchel_db::model::homework::Homework;
use satchel_db::model::lesson::Lesson;
use satchel_db::model::profile::UserProfile;
use satchel_db::model::subject::Subject;
use satchel_db::model::user::AppUser;
use uuid::Uuid;

use super::{AssessmentEvent, Event, HomeworkEvent, LessonEvent};
use super::validate::{AssessmentDraft, HomeworkDraft, LessonDraft};

pub(crate) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 15, 12, 0, 0).unwrap()
}

pub(crate) fn app_user(first_name: &str) -> AppUser {
    AppUser {
        id: Uuid::new_v4(),
        username: first_name.to_lowercase(),
        first_name: first_name.to_owned(),
        email: format!("{}@example.edu", first_name.to_lowercase()),
        created_at: fixed_now(),
    }
}

pub(crate) fn profile(user_id: Uuid) -> UserProfile {
    UserProfile {
        id: Uuid::new_v4(),
        user_id,
        notification_method: NotificationMethod::Email,
        time_display_format: TimeDisplayFormat::H24,
        lesson_duration_minutes: 90,
        assessment_duration_minutes: 90,
        receive_lesson_reminders: true,
        lesson_reminder_minutes: 30,
        receive_assessment_reminders: true,
        assessment_reminder_minutes: 60,
        receive_homework_reminders: true,
        homework_reminder_minutes: 120,
    }
}

pub(crate) fn subject(user_id: Uuid, name: &str) -> Subject {
    Subject {
        id: Uuid::new_v4(),
        user_id,
        name: name.to_owned(),
        image_url: None,
        created_at: fixed_now(),
        last_modified: fixed_now(),
    }
}

pub(crate) fn lesson_row(subject_id: Uuid, start_time: DateTime<Utc>) -> Lesson {
    Lesson {
        id: Uuid::new_v4(),
        subject_id,
        lesson_type: LessonType::Lecture,
        start_time,
        duration_minutes: 90,
        scheduled_reminder_time: None,
        reminder_sent: false,
        created_at: fixed_now(),
        last_modified: fixed_now(),
    }
}

pub(crate) fn lesson_event(subject: &Subject, start_time: DateTime<Utc>) -> LessonEvent {
    LessonEvent {
        lesson: lesson_row(subject.id, start_time),
        subject: subject.clone(),
    }
}

pub(crate) fn assessment_row(subject_id: Option<Uuid>, lesson_id: Option<Uuid>) -> Assessment {
    Assessment {
        id: Uuid::new_v4(),
        subject_id,
        lesson_id,
        assessment_type: AssessmentType::Exam,
        start_time: None,
        duration_minutes: None,
        description: None,
        scheduled_reminder_time: None,
        reminder_sent: false,
        created_at: fixed_now(),
        last_modified: fixed_now(),
    }
}

/// Standalone assessment with its own subject and start time.
pub(crate) fn standalone_assessment_event(
    subject: &Subject,
    start_time: DateTime<Utc>,
) -> AssessmentEvent {
    let mut assessment = assessment_row(Some(subject.id), None);
    assessment.start_time = Some(start_time);
    assessment.duration_minutes = Some(60);
    AssessmentEvent {
        assessment,
        subject: Some(subject.clone()),
        lesson: None,
    }
}

/// Assessment resolving everything through its linked lesson.
pub(crate) fn linked_assessment_event(lesson: LessonEvent) -> AssessmentEvent {
    let assessment = assessment_row(None, Some(lesson.lesson.id));
    AssessmentEvent {
        assessment,
        subject: None,
        lesson: Some(lesson),
    }
}

pub(crate) fn homework_row(subject_id: Option<Uuid>, due_at: Option<DateTime<Utc>>) -> Homework {
    Homework {
        id: Uuid::new_v4(),
        subject_id,
        lesson_given_id: None,
        lesson_due_id: None,
        start_time: None,
        due_at,
        task: "Read chapters 3 and 4".to_owned(),
        completion_percent: 0,
        has_subtasks: false,
        scheduled_reminder_time: None,
        reminder_sent: false,
        created_at: fixed_now(),
        last_modified: fixed_now(),
    }
}

/// Homework with a direct subject and a direct due date.
pub(crate) fn standalone_homework_event(
    subject: &Subject,
    due_at: DateTime<Utc>,
) -> HomeworkEvent {
    HomeworkEvent {
        homework: homework_row(Some(subject.id), Some(due_at)),
        subject: Some(subject.clone()),
        lesson_given: None,
        lesson_due: None,
    }
}

/// Homework due at a lesson, resolving subject and trigger through it.
pub(crate) fn lesson_due_homework_event(lesson_due: LessonEvent) -> HomeworkEvent {
    let mut homework = homework_row(None, None);
    homework.lesson_due_id = Some(lesson_due.lesson.id);
    HomeworkEvent {
        homework,
        subject: None,
        lesson_given: None,
        lesson_due: Some(lesson_due),
    }
}

pub(crate) fn lesson_draft(subject: &Subject, start_time: DateTime<Utc>) -> LessonDraft {
    LessonDraft {
        subject: subject.clone(),
        lesson_type: LessonType::Lecture,
        start_time,
        duration: Duration::minutes(90),
    }
}

pub(crate) fn assessment_draft(subject: &Subject, start_time: DateTime<Utc>) -> AssessmentDraft {
    AssessmentDraft {
        subject: Some(subject.clone()),
        lesson: None,
        assessment_type: AssessmentType::Test,
        start_time: Some(start_time),
        duration: Some(Duration::minutes(60)),
        description: None,
    }
}

pub(crate) fn homework_draft(subject: &Subject, due_at: DateTime<Utc>) -> HomeworkDraft {
    HomeworkDraft {
        subject: Some(subject.clone()),
        lesson_given: None,
        lesson_due: None,
        start_time: None,
        due_at: Some(due_at),
        task: "Solve the problem set".to_owned(),
        completion_percent: 0,
    }
}

/// Scheduled-event wrapper used by sweep tests.
pub(crate) fn scheduled_lesson_event(
    subject: &Subject,
    start_time: DateTime<Utc>,
    scheduled_reminder_time: DateTime<Utc>,
) -> Event {
    let mut event = lesson_event(subject, start_time);
    event.lesson.scheduled_reminder_time = Some(scheduled_reminder_time);
    Event::Lesson(event)
}
