use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{
    access::Role,
    models::{LookupRecord, RelatedData},
    repository::Repository,
};

/// EntityKind
///
/// The fixed set of record types a form can target. Used purely as a
/// dispatch key: it selects which selector lookups the assembler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Teacher,
    Student,
    Parent,
    Subject,
    Class,
    Lesson,
    Exam,
    Assignment,
    Result,
    Attendance,
    Event,
    Announcement,
}

/// assemble
///
/// Runs the fixed lookup set for the given entity kind and joins the
/// results into a `lookup-name → ordered rows` mapping for the form's
/// dependent selectors. Only create/update flows call this; delete flows
/// skip it by contract of the caller.
///
/// Lookups that are independent of each other (lesson, result) are issued
/// concurrently and awaited jointly; there is no ordering guarantee between
/// them. Any failed lookup fails the whole assembly — the caller surfaces a
/// generic failure rather than a partial form.
///
/// Kinds with no dependent selectors (e.g. attendance) yield an empty
/// mapping, not an error.
///
/// Teacher-scoped kinds: a teacher caller only sees their own lessons
/// (exam, assignment) and the classes they teach in (announcement);
/// every other role sees the unfiltered lists.
pub async fn assemble(
    repo: &dyn Repository,
    kind: EntityKind,
    role: Role,
    caller_id: &str,
) -> sqlx::Result<RelatedData> {
    // Lesson scope for exam/assignment forms.
    let owner = (role == Role::Teacher).then_some(caller_id);

    let mut related = BTreeMap::new();
    match kind {
        EntityKind::Subject => {
            let teachers = repo.teacher_options().await?;
            insert_people(&mut related, "teachers", teachers);
        }
        EntityKind::Class => {
            let (teachers, grades) = tokio::try_join!(repo.teacher_options(), repo.grade_options())?;
            insert_people(&mut related, "teachers", teachers);
            related.insert(
                "grades".to_string(),
                grades.into_iter().map(LookupRecord::Grade).collect(),
            );
        }
        EntityKind::Teacher => {
            let subjects = repo.subject_options().await?;
            insert_named(&mut related, "subjects", subjects);
        }
        EntityKind::Student => {
            let (classes, grades) =
                tokio::try_join!(repo.class_roster_options(), repo.grade_options())?;
            related.insert(
                "classes".to_string(),
                classes.into_iter().map(LookupRecord::ClassRoster).collect(),
            );
            related.insert(
                "grades".to_string(),
                grades.into_iter().map(LookupRecord::Grade).collect(),
            );
        }
        EntityKind::Exam => {
            let lessons = repo.lesson_options(owner).await?;
            insert_named(&mut related, "lessons", lessons);
        }
        EntityKind::Lesson => {
            let (subjects, classes, teachers) = tokio::try_join!(
                repo.subject_options(),
                repo.class_options(),
                repo.teacher_options()
            )?;
            insert_named(&mut related, "subjects", subjects);
            insert_named(&mut related, "classes", classes);
            insert_people(&mut related, "teachers", teachers);
        }
        EntityKind::Assignment => {
            let lessons = repo.lesson_detail_options(owner).await?;
            related.insert(
                "lessons".to_string(),
                lessons.into_iter().map(LookupRecord::Lesson).collect(),
            );
        }
        EntityKind::Parent => {
            let parents = repo.parent_options().await?;
            insert_people(&mut related, "parents", parents);
        }
        EntityKind::Event => {
            let classes = repo.class_options().await?;
            insert_named(&mut related, "classes", classes);
        }
        EntityKind::Result => {
            let (students, exams, assignments) = tokio::try_join!(
                repo.student_options(),
                repo.exam_options(),
                repo.assignment_options()
            )?;
            insert_people(&mut related, "students", students);
            related.insert(
                "exams".to_string(),
                exams.into_iter().map(LookupRecord::Titled).collect(),
            );
            related.insert(
                "assignments".to_string(),
                assignments.into_iter().map(LookupRecord::Titled).collect(),
            );
        }
        EntityKind::Announcement => {
            let classes = match owner {
                Some(teacher_id) => repo.classes_taught_by(teacher_id).await?,
                None => repo.class_options().await?,
            };
            insert_named(&mut related, "classes", classes);
        }
        // No dependent selectors for this kind.
        EntityKind::Attendance => {}
    }
    Ok(related)
}

fn insert_people(
    related: &mut RelatedData,
    name: &str,
    rows: Vec<crate::models::PersonOption>,
) {
    related.insert(
        name.to_string(),
        rows.into_iter().map(LookupRecord::Person).collect(),
    );
}

fn insert_named(related: &mut RelatedData, name: &str, rows: Vec<crate::models::NamedOption>) {
    related.insert(
        name.to_string(),
        rows.into_iter().map(LookupRecord::Named).collect(),
    );
}
