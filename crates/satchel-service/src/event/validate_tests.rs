use chrono::Duration;

use super::test_fixtures::{
    app_user, assessment_draft, fixed_now, homework_draft, lesson_draft, lesson_event, subject,
};
use super::validate::{validate_assessment, validate_homework, validate_lesson};
use satchel_core::constants::{MAX_TASK_LENGTH, MAX_TIMEFRAME_DAYS, RECENT_PAST_DAYS};

#[test]
fn well_formed_lesson_passes() {
    let user = app_user("Ada");
    let physics = subject(user.id, "Physics");
    let draft = lesson_draft(&physics, fixed_now() + Duration::hours(3));
    assert!(validate_lesson(&draft, fixed_now()).is_ok());
}

#[test]
fn lesson_duration_bounds_are_enforced() {
    let user = app_user("Ada");
    let physics = subject(user.id, "Physics");

    let mut draft = lesson_draft(&physics, fixed_now() + Duration::hours(3));
    draft.duration = Duration::minutes(10);
    let errors = validate_lesson(&draft, fixed_now()).unwrap_err();
    assert_eq!(errors.codes_for("duration"), vec!["min_duration_not_met"]);

    draft.duration = Duration::hours(9);
    let errors = validate_lesson(&draft, fixed_now()).unwrap_err();
    assert_eq!(errors.codes_for("duration"), vec!["max_duration_exceeded"]);
}

#[test]
fn lesson_start_window_is_enforced() {
    let user = app_user("Ada");
    let physics = subject(user.id, "Physics");

    let draft = lesson_draft(&physics, fixed_now() - Duration::days(RECENT_PAST_DAYS + 1));
    let errors = validate_lesson(&draft, fixed_now()).unwrap_err();
    assert_eq!(errors.codes_for("start_time"), vec!["too_far_in_past"]);

    let draft = lesson_draft(&physics, fixed_now() + Duration::days(MAX_TIMEFRAME_DAYS + 1));
    let errors = validate_lesson(&draft, fixed_now()).unwrap_err();
    assert_eq!(errors.codes_for("start_time"), vec!["too_far_in_future"]);

    // Inside the recent-past window is still a legal lesson start.
    let draft = lesson_draft(&physics, fixed_now() - Duration::days(RECENT_PAST_DAYS - 1));
    assert!(validate_lesson(&draft, fixed_now()).is_ok());
}

#[test]
fn assessment_requires_a_subject_source_and_a_start_source() {
    let user = app_user("Ada");
    let physics = subject(user.id, "Physics");

    let mut draft = assessment_draft(&physics, fixed_now() + Duration::days(1));
    draft.subject = None;
    draft.start_time = None;
    let errors = validate_assessment(&draft, fixed_now()).unwrap_err();
    assert_eq!(errors.codes_for("__all__"), vec!["required"]);
    assert_eq!(errors.codes_for("start_time"), vec!["required"]);
}

#[test]
fn assessment_subject_must_match_linked_lesson() {
    let user = app_user("Ada");
    let physics = subject(user.id, "Physics");
    let chemistry = subject(user.id, "Chemistry");
    let lesson = lesson_event(&chemistry, fixed_now() + Duration::days(1));

    let mut draft = assessment_draft(&physics, fixed_now() + Duration::days(1));
    draft.start_time = None;
    draft.lesson = Some(lesson);
    let errors = validate_assessment(&draft, fixed_now()).unwrap_err();
    assert_eq!(errors.codes_for("__all__"), vec!["subject_mismatch"]);
}

#[test]
fn assessment_custom_start_must_match_linked_lesson() {
    let user = app_user("Ada");
    let physics = subject(user.id, "Physics");
    let lesson = lesson_event(&physics, fixed_now() + Duration::days(2));

    let mut draft = assessment_draft(&physics, fixed_now() + Duration::days(1));
    draft.lesson = Some(lesson);
    let errors = validate_assessment(&draft, fixed_now()).unwrap_err();
    assert_eq!(errors.codes_for("start_time"), vec!["start_time_mismatch"]);
}

#[test]
fn assessment_must_start_in_the_future() {
    let user = app_user("Ada");
    let physics = subject(user.id, "Physics");

    let draft = assessment_draft(&physics, fixed_now() - Duration::hours(1));
    let errors = validate_assessment(&draft, fixed_now()).unwrap_err();
    assert_eq!(errors.codes_for("start_time"), vec!["starts_in_past"]);
}

#[test]
fn well_formed_homework_passes() {
    let user = app_user("Ada");
    let physics = subject(user.id, "Physics");
    let draft = homework_draft(&physics, fixed_now() + Duration::days(3));
    assert!(validate_homework(&draft, fixed_now()).is_ok());
}

#[test]
fn homework_requires_a_subject_source_and_a_due_source() {
    let user = app_user("Ada");
    let physics = subject(user.id, "Physics");

    let mut draft = homework_draft(&physics, fixed_now() + Duration::days(3));
    draft.subject = None;
    draft.due_at = None;
    let errors = validate_homework(&draft, fixed_now()).unwrap_err();
    assert_eq!(errors.codes_for("__all__"), vec!["required"]);
    assert_eq!(errors.codes_for("due_at"), vec!["required"]);
}

#[test]
fn homework_task_bounds_are_enforced() {
    let user = app_user("Ada");
    let physics = subject(user.id, "Physics");

    let mut draft = homework_draft(&physics, fixed_now() + Duration::days(3));
    draft.task = String::new();
    let errors = validate_homework(&draft, fixed_now()).unwrap_err();
    assert_eq!(errors.codes_for("task"), vec!["required"]);

    draft.task = "x".repeat(MAX_TASK_LENGTH + 1);
    let errors = validate_homework(&draft, fixed_now()).unwrap_err();
    assert_eq!(errors.codes_for("task"), vec!["max_length_exceeded"]);
}

#[test]
fn homework_completion_must_be_a_percentage() {
    let user = app_user("Ada");
    let physics = subject(user.id, "Physics");

    let mut draft = homework_draft(&physics, fixed_now() + Duration::days(3));
    draft.completion_percent = 101;
    let errors = validate_homework(&draft, fixed_now()).unwrap_err();
    assert_eq!(errors.codes_for("completion_percent"), vec!["out_of_range"]);
}

#[test]
fn homework_lessons_must_share_the_homework_subject() {
    let user = app_user("Ada");
    let physics = subject(user.id, "Physics");
    let chemistry = subject(user.id, "Chemistry");

    let mut draft = homework_draft(&physics, fixed_now() + Duration::days(3));
    draft.lesson_given = Some(lesson_event(&chemistry, fixed_now() + Duration::days(1)));
    let errors = validate_homework(&draft, fixed_now()).unwrap_err();
    assert_eq!(errors.codes_for("lesson_given"), vec!["subject_mismatch"]);
}

#[test]
fn homework_given_and_due_lessons_must_share_a_subject() {
    let user = app_user("Ada");
    let physics = subject(user.id, "Physics");
    let chemistry = subject(user.id, "Chemistry");

    let mut draft = homework_draft(&physics, fixed_now() + Duration::days(5));
    draft.subject = None;
    draft.due_at = None;
    draft.lesson_given = Some(lesson_event(&physics, fixed_now() + Duration::days(1)));
    draft.lesson_due = Some(lesson_event(&chemistry, fixed_now() + Duration::days(4)));
    let errors = validate_homework(&draft, fixed_now()).unwrap_err();
    assert_eq!(errors.codes_for("__all__"), vec!["subject_mismatch"]);
}

#[test]
fn homework_start_side_tolerates_the_wide_past_window() {
    let user = app_user("Ada");
    let physics = subject(user.id, "Physics");

    // Given lessons far outside the recent-past window are fine as long as
    // they stay within a year.
    let mut draft = homework_draft(&physics, fixed_now() + Duration::days(3));
    draft.lesson_given = Some(lesson_event(&physics, fixed_now() - Duration::days(120)));
    assert!(validate_homework(&draft, fixed_now()).is_ok());

    draft.lesson_given = Some(lesson_event(
        &physics,
        fixed_now() - Duration::days(MAX_TIMEFRAME_DAYS + 1),
    ));
    let errors = validate_homework(&draft, fixed_now()).unwrap_err();
    assert_eq!(errors.codes_for("lesson_given"), vec!["too_far_in_past"]);
}

#[test]
fn homework_due_side_uses_the_recent_past_window() {
    let user = app_user("Ada");
    let physics = subject(user.id, "Physics");

    let draft = homework_draft(&physics, fixed_now() - Duration::days(RECENT_PAST_DAYS + 1));
    let errors = validate_homework(&draft, fixed_now()).unwrap_err();
    assert_eq!(errors.codes_for("due_at"), vec!["too_far_in_past"]);

    let draft = homework_draft(&physics, fixed_now() - Duration::days(RECENT_PAST_DAYS - 1));
    assert!(validate_homework(&draft, fixed_now()).is_ok());
}

#[test]
fn homework_ordering_rules_are_enforced() {
    let user = app_user("Ada");
    let physics = subject(user.id, "Physics");

    let mut draft = homework_draft(&physics, fixed_now() + Duration::days(2));
    draft.start_time = Some(fixed_now() + Duration::days(3));
    let errors = validate_homework(&draft, fixed_now()).unwrap_err();
    assert_eq!(errors.codes_for("start_time"), vec!["start_after_due"]);

    let mut draft = homework_draft(&physics, fixed_now() + Duration::days(2));
    draft.lesson_given = Some(lesson_event(&physics, fixed_now() + Duration::days(3)));
    let errors = validate_homework(&draft, fixed_now()).unwrap_err();
    assert_eq!(errors.codes_for("lesson_given"), vec!["start_after_due"]);
}

#[test]
fn all_violations_are_collected_in_one_pass() {
    let user = app_user("Ada");
    let physics = subject(user.id, "Physics");

    let mut draft = homework_draft(&physics, fixed_now() + Duration::days(2));
    draft.task = String::new();
    draft.completion_percent = -5;
    draft.start_time = Some(fixed_now() + Duration::days(3));
    let errors = validate_homework(&draft, fixed_now()).unwrap_err();
    assert_eq!(errors.errors().len(), 3);
}
