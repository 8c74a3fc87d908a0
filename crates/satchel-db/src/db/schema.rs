// Hand-maintained Diesel schema; keep in sync with migrations/.

diesel::table! {
    app_user (id) {
        id -> Uuid,
        username -> Text,
        first_name -> Text,
        email -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    userprofile (id) {
        id -> Uuid,
        user_id -> Uuid,
        notification_method -> Text,
        time_display_format -> Text,
        lesson_duration_minutes -> Int4,
        assessment_duration_minutes -> Int4,
        receive_lesson_reminders -> Bool,
        lesson_reminder_minutes -> Int4,
        receive_assessment_reminders -> Bool,
        assessment_reminder_minutes -> Int4,
        receive_homework_reminders -> Bool,
        homework_reminder_minutes -> Int4,
    }
}

diesel::table! {
    subject (id) {
        id -> Uuid,
        user_id -> Uuid,
        name -> Text,
        image_url -> Nullable<Text>,
        created_at -> Timestamptz,
        last_modified -> Timestamptz,
    }
}

diesel::table! {
    lesson (id) {
        id -> Uuid,
        subject_id -> Uuid,
        lesson_type -> Text,
        start_time -> Timestamptz,
        duration_minutes -> Int4,
        scheduled_reminder_time -> Nullable<Timestamptz>,
        reminder_sent -> Bool,
        created_at -> Timestamptz,
        last_modified -> Timestamptz,
    }
}

diesel::table! {
    assessment (id) {
        id -> Uuid,
        subject_id -> Nullable<Uuid>,
        lesson_id -> Nullable<Uuid>,
        assessment_type -> Text,
        start_time -> Nullable<Timestamptz>,
        duration_minutes -> Nullable<Int4>,
        description -> Nullable<Text>,
        scheduled_reminder_time -> Nullable<Timestamptz>,
        reminder_sent -> Bool,
        created_at -> Timestamptz,
        last_modified -> Timestamptz,
    }
}

diesel::table! {
    homework (id) {
        id -> Uuid,
        subject_id -> Nullable<Uuid>,
        lesson_given_id -> Nullable<Uuid>,
        lesson_due_id -> Nullable<Uuid>,
        start_time -> Nullable<Timestamptz>,
        due_at -> Nullable<Timestamptz>,
        task -> Text,
        completion_percent -> Int4,
        has_subtasks -> Bool,
        scheduled_reminder_time -> Nullable<Timestamptz>,
        reminder_sent -> Bool,
        created_at -> Timestamptz,
        last_modified -> Timestamptz,
    }
}

diesel::joinable!(userprofile -> app_user (user_id));
diesel::joinable!(subject -> app_user (user_id));
diesel::joinable!(lesson -> subject (subject_id));
diesel::joinable!(assessment -> subject (subject_id));
diesel::joinable!(assessment -> lesson (lesson_id));
diesel::joinable!(homework -> subject (subject_id));
// homework carries two lesson foreign keys (given/due); joins against
// lesson must spell out the ON clause explicitly.

diesel::allow_tables_to_appear_in_same_query!(
    app_user,
    userprofile,
    subject,
    lesson,
    assessment,
    homework,
);
