use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;
use ts_rs::TS;
use utoipa::ToSchema;

// --- Lookup Projections (selector data) ---
//
// Minimal id + display-field projections used solely to populate dependent
// selection controls in the create/update forms. Built fresh per request
// and discarded with the response; never cached.

/// PersonOption
///
/// Selector row for people (teachers, students, parents): id plus the two
/// display fields the form renders.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default, PartialEq)]
#[ts(export)]
pub struct PersonOption {
    pub id: String,
    pub name: String,
    pub surname: String,
}

/// NamedOption
///
/// Selector row for entities identified by a single name (subjects,
/// classes, lessons).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default, PartialEq)]
#[ts(export)]
pub struct NamedOption {
    pub id: i32,
    pub name: String,
}

/// TitledOption
///
/// Selector row for entities identified by a title (exams, assignments).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default, PartialEq)]
#[ts(export)]
pub struct TitledOption {
    pub id: i32,
    pub title: String,
}

/// GradeOption
///
/// Selector row for grades; `level` is the display field.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default, PartialEq)]
#[ts(export)]
pub struct GradeOption {
    pub id: i32,
    pub level: i32,
}

/// ClassRosterOption
///
/// Class selector row for the student form, carrying capacity and current
/// headcount so the form can flag full classes before submission.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default, PartialEq)]
#[ts(export)]
pub struct ClassRosterOption {
    pub id: i32,
    pub name: String,
    pub capacity: i32,
    pub student_count: i64,
}

/// LessonOption
///
/// Lesson selector row for the assignment form, enriched with the subject
/// and class names (joined in the lookup query).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default, PartialEq)]
#[ts(export)]
pub struct LessonOption {
    pub id: i32,
    pub name: String,
    pub subject_name: String,
    pub class_name: String,
}

/// LookupRecord
///
/// One row of related-data output. The concrete shape depends on the lookup
/// (people carry a surname, grades a level, …); serde's untagged
/// representation keeps the wire format identical to the plain projection.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[serde(untagged)]
#[ts(export)]
pub enum LookupRecord {
    Person(PersonOption),
    Named(NamedOption),
    Titled(TitledOption),
    Grade(GradeOption),
    ClassRoster(ClassRosterOption),
    Lesson(LessonOption),
}

/// RelatedData
///
/// The assembler's output: lookup name → ordered selector rows. A BTreeMap
/// keeps key order stable in serialized responses.
pub type RelatedData = BTreeMap<String, Vec<LookupRecord>>;

// --- Mutation Payloads (Input Schemas) ---

/// SubjectPayload
///
/// Create/update payload for a subject; `teachers` is the full set of
/// assigned teacher ids (update replaces the set).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SubjectPayload {
    pub name: String,
    pub teachers: Vec<String>,
}

/// ClassPayload
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ClassPayload {
    pub name: String,
    pub capacity: i32,
    pub grade_id: i32,
    pub supervisor_id: Option<String>,
}

/// TeacherPayload
///
/// Create/update payload for a teacher. The password is forwarded to the
/// identity provider only (empty or absent on update means unchanged) and
/// is never persisted locally.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct TeacherPayload {
    pub username: String,
    pub password: Option<String>,
    pub name: String,
    pub surname: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: String,
    pub img: Option<String>,
    pub blood_type: String,
    /// "MALE" | "FEMALE"
    pub sex: String,
    #[ts(type = "string")]
    pub birthday: DateTime<Utc>,
    /// Subject ids taught by this teacher (update replaces the set).
    pub subjects: Vec<i32>,
}

/// StudentPayload
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct StudentPayload {
    pub username: String,
    pub password: Option<String>,
    pub name: String,
    pub surname: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: String,
    pub img: Option<String>,
    pub blood_type: String,
    /// "MALE" | "FEMALE"
    pub sex: String,
    #[ts(type = "string")]
    pub birthday: DateTime<Utc>,
    pub grade_id: i32,
    pub class_id: i32,
    pub parent_id: String,
}

/// ParentPayload
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ParentPayload {
    pub username: String,
    pub password: Option<String>,
    pub name: String,
    pub surname: String,
    pub email: Option<String>,
    pub phone: String,
    pub address: String,
}

/// LessonPayload
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LessonPayload {
    pub name: String,
    /// "MONDAY" … "FRIDAY"
    pub day: String,
    #[ts(type = "string")]
    pub start_time: DateTime<Utc>,
    #[ts(type = "string")]
    pub end_time: DateTime<Utc>,
    pub subject_id: i32,
    pub class_id: i32,
    pub teacher_id: String,
}

/// ExamPayload
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ExamPayload {
    pub title: String,
    #[ts(type = "string")]
    pub start_time: DateTime<Utc>,
    #[ts(type = "string")]
    pub end_time: DateTime<Utc>,
    pub lesson_id: i32,
}

/// AssignmentPayload
///
/// The start date is stamped server-side at mutation time, so only the due
/// date travels in the payload.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AssignmentPayload {
    pub title: String,
    #[ts(type = "string")]
    pub due_date: DateTime<Utc>,
    pub lesson_id: i32,
}

/// ResultPayload
///
/// A score belongs to either an exam or an assignment, hence the two
/// optional foreign keys.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ResultPayload {
    pub score: i32,
    pub exam_id: Option<i32>,
    pub assignment_id: Option<i32>,
    pub student_id: String,
}

/// EventPayload
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct EventPayload {
    pub title: String,
    pub description: String,
    #[ts(type = "string")]
    pub start_time: DateTime<Utc>,
    #[ts(type = "string")]
    pub end_time: DateTime<Utc>,
    /// Absent for school-wide events.
    pub class_id: Option<i32>,
}

/// AnnouncementPayload
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AnnouncementPayload {
    pub title: String,
    pub description: String,
    #[ts(type = "string")]
    pub date: DateTime<Utc>,
    /// Absent for school-wide announcements.
    pub class_id: Option<i32>,
}

// --- Response Schemas ---

/// MutationStatus
///
/// The uniform result body for every create/update/delete endpoint. A
/// failed mutation (constraint violation, missing row, rejected guard)
/// reports `success=false, error=true` instead of surfacing an exception.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[ts(export)]
pub struct MutationStatus {
    pub success: bool,
    pub error: bool,
}

impl MutationStatus {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: false,
        }
    }

    pub fn failed() -> Self {
        Self {
            success: false,
            error: true,
        }
    }
}

/// SessionProfile
///
/// Output schema for the role landing endpoints: the caller's resolved
/// session identity.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SessionProfile {
    pub id: String,
    pub role: crate::access::Role,
}

/// DashboardStats
///
/// Aggregate headcounts for the admin landing page.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[ts(export)]
pub struct DashboardStats {
    pub students: i64,
    pub teachers: i64,
    pub parents: i64,
    pub events: i64,
}
