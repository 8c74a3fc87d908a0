//! Database enum types with Diesel serialization.
//!
//! This module provides type-safe enum wrappers for database CHECK constraints.
//! Each enum implements `ToSql` and `FromSql` for automatic conversion between Rust and `PostgreSQL`.

use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use std::fmt;
use std::io::Write;

/// Lesson form classification.
///
/// Maps to `lesson.lesson_type` CHECK constraint.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsExpression,
    FromSqlRow,
    serde::Serialize,
    serde::Deserialize,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "snake_case")]
pub enum LessonType {
    Lecture,
    Practice,
    Seminar,
    SelfStudy,
}

impl ToSql<Text, Pg> for LessonType {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for LessonType {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"lecture" => Ok(Self::Lecture),
            b"practice" => Ok(Self::Practice),
            b"seminar" => Ok(Self::Seminar),
            b"self_study" => Ok(Self::SelfStudy),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl LessonType {
    /// Returns the database string representation of this lesson type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lecture => "lecture",
            Self::Practice => "practice",
            Self::Seminar => "seminar",
            Self::SelfStudy => "self_study",
        }
    }

    /// Human label used in reminder titles.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Lecture => "Lecture",
            Self::Practice => "Practice",
            Self::Seminar => "Seminar",
            Self::SelfStudy => "Self-Study",
        }
    }
}

impl fmt::Display for LessonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assessment form classification.
///
/// Maps to `assessment.assessment_type` CHECK constraint.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsExpression,
    FromSqlRow,
    serde::Serialize,
    serde::Deserialize,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentType {
    Test,
    Quiz,
    Exam,
    Midterm,
    OralExam,
    LabWork,
    Essay,
    Project,
}

impl ToSql<Text, Pg> for AssessmentType {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for AssessmentType {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"test" => Ok(Self::Test),
            b"quiz" => Ok(Self::Quiz),
            b"exam" => Ok(Self::Exam),
            b"midterm" => Ok(Self::Midterm),
            b"oral_exam" => Ok(Self::OralExam),
            b"lab_work" => Ok(Self::LabWork),
            b"essay" => Ok(Self::Essay),
            b"project" => Ok(Self::Project),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl AssessmentType {
    /// Returns the database string representation of this assessment type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Quiz => "quiz",
            Self::Exam => "exam",
            Self::Midterm => "midterm",
            Self::OralExam => "oral_exam",
            Self::LabWork => "lab_work",
            Self::Essay => "essay",
            Self::Project => "project",
        }
    }

    /// Human label used in reminder titles.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Test => "Test",
            Self::Quiz => "Quiz",
            Self::Exam => "Exam",
            Self::Midterm => "Midterm",
            Self::OralExam => "Oral Exam",
            Self::LabWork => "Lab Work",
            Self::Essay => "Essay",
            Self::Project => "Project",
        }
    }
}

impl fmt::Display for AssessmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reminder delivery method preference.
///
/// Maps to `userprofile.notification_method` CHECK constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
pub enum NotificationMethod {
    Email,
    Push,
    Both,
}

impl ToSql<Text, Pg> for NotificationMethod {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for NotificationMethod {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"email" => Ok(Self::Email),
            b"push" => Ok(Self::Push),
            b"both" => Ok(Self::Both),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl NotificationMethod {
    /// Returns the database string representation of this notification method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Push => "push",
            Self::Both => "both",
        }
    }
}

impl From<NotificationMethod> for satchel_core::types::NotificationMethod {
    fn from(db_method: NotificationMethod) -> Self {
        match db_method {
            NotificationMethod::Email => Self::Email,
            NotificationMethod::Push => Self::Push,
            NotificationMethod::Both => Self::Both,
        }
    }
}

impl From<satchel_core::types::NotificationMethod> for NotificationMethod {
    fn from(core_method: satchel_core::types::NotificationMethod) -> Self {
        match core_method {
            satchel_core::types::NotificationMethod::Email => Self::Email,
            satchel_core::types::NotificationMethod::Push => Self::Push,
            satchel_core::types::NotificationMethod::Both => Self::Both,
        }
    }
}

impl fmt::Display for NotificationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clock format preference.
///
/// Maps to `userprofile.time_display_format` CHECK constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
pub enum TimeDisplayFormat {
    H24,
    H12,
}

impl ToSql<Text, Pg> for TimeDisplayFormat {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for TimeDisplayFormat {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"24" => Ok(Self::H24),
            b"12" => Ok(Self::H12),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl TimeDisplayFormat {
    /// Returns the database string representation of this time display format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::H24 => "24",
            Self::H12 => "12",
        }
    }
}

impl From<TimeDisplayFormat> for satchel_core::types::TimeDisplayFormat {
    fn from(db_format: TimeDisplayFormat) -> Self {
        match db_format {
            TimeDisplayFormat::H24 => Self::H24,
            TimeDisplayFormat::H12 => Self::H12,
        }
    }
}

impl fmt::Display for TimeDisplayFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
