#![allow(dead_code)]

use async_trait::async_trait;
use school_portal::{
    AppConfig, AppState, MockIdentityService,
    access::RoutePolicy,
    models::{
        AnnouncementPayload, AssignmentPayload, ClassPayload, ClassRosterOption, DashboardStats,
        EventPayload, ExamPayload, GradeOption, LessonOption, LessonPayload, NamedOption,
        ParentPayload, PersonOption, ResultPayload, StudentPayload, SubjectPayload,
        TeacherPayload, TitledOption,
    },
    repository::Repository,
};
use std::collections::HashMap;
use std::sync::Arc;

/// StubRepository
///
/// In-memory `Repository` implementation fed with canned selector rows.
/// Mutations succeed (or uniformly fail via `fail_mutations`) without
/// recording anything; lookups can be made to fail wholesale via
/// `fail_lookups` to exercise the fatal-assembly path.
#[derive(Default)]
pub struct StubRepository {
    pub teachers: Vec<PersonOption>,
    pub students: Vec<PersonOption>,
    pub parents: Vec<PersonOption>,
    pub grades: Vec<GradeOption>,
    pub subjects: Vec<NamedOption>,
    pub classes: Vec<NamedOption>,
    pub class_rosters: Vec<ClassRosterOption>,
    /// (owning teacher id, lesson)
    pub lessons: Vec<(String, NamedOption)>,
    /// (owning teacher id, enriched lesson)
    pub lesson_details: Vec<(String, LessonOption)>,
    /// teacher id → classes they have lessons in
    pub taught_classes: HashMap<String, Vec<NamedOption>>,
    pub exams: Vec<TitledOption>,
    pub assignments: Vec<TitledOption>,
    /// (assignment id, owning teacher id)
    pub assignment_owners: Vec<(i32, String)>,
    /// class id → (capacity, enrolled)
    pub headcounts: HashMap<i32, (i32, i64)>,
    pub stats: DashboardStats,
    pub fail_lookups: bool,
    pub fail_mutations: bool,
}

impl StubRepository {
    fn rows<T: Clone>(&self, rows: &[T]) -> sqlx::Result<Vec<T>> {
        if self.fail_lookups {
            Err(sqlx::Error::PoolClosed)
        } else {
            Ok(rows.to_vec())
        }
    }

    fn mutated(&self) -> bool {
        !self.fail_mutations
    }
}

#[async_trait]
impl Repository for StubRepository {
    async fn teacher_options(&self) -> sqlx::Result<Vec<PersonOption>> {
        self.rows(&self.teachers)
    }
    async fn student_options(&self) -> sqlx::Result<Vec<PersonOption>> {
        self.rows(&self.students)
    }
    async fn parent_options(&self) -> sqlx::Result<Vec<PersonOption>> {
        self.rows(&self.parents)
    }
    async fn grade_options(&self) -> sqlx::Result<Vec<GradeOption>> {
        self.rows(&self.grades)
    }
    async fn subject_options(&self) -> sqlx::Result<Vec<NamedOption>> {
        self.rows(&self.subjects)
    }
    async fn class_options(&self) -> sqlx::Result<Vec<NamedOption>> {
        self.rows(&self.classes)
    }
    async fn class_roster_options(&self) -> sqlx::Result<Vec<ClassRosterOption>> {
        self.rows(&self.class_rosters)
    }
    async fn classes_taught_by(&self, teacher_id: &str) -> sqlx::Result<Vec<NamedOption>> {
        if self.fail_lookups {
            return Err(sqlx::Error::PoolClosed);
        }
        Ok(self
            .taught_classes
            .get(teacher_id)
            .cloned()
            .unwrap_or_default())
    }
    async fn lesson_options(&self, owner: Option<&str>) -> sqlx::Result<Vec<NamedOption>> {
        if self.fail_lookups {
            return Err(sqlx::Error::PoolClosed);
        }
        Ok(self
            .lessons
            .iter()
            .filter(|(teacher, _)| owner.is_none_or(|o| teacher == o))
            .map(|(_, lesson)| lesson.clone())
            .collect())
    }
    async fn lesson_detail_options(&self, owner: Option<&str>) -> sqlx::Result<Vec<LessonOption>> {
        if self.fail_lookups {
            return Err(sqlx::Error::PoolClosed);
        }
        Ok(self
            .lesson_details
            .iter()
            .filter(|(teacher, _)| owner.is_none_or(|o| teacher == o))
            .map(|(_, lesson)| lesson.clone())
            .collect())
    }
    async fn exam_options(&self) -> sqlx::Result<Vec<TitledOption>> {
        self.rows(&self.exams)
    }
    async fn assignment_options(&self) -> sqlx::Result<Vec<TitledOption>> {
        self.rows(&self.assignments)
    }

    async fn lesson_owned_by(&self, lesson_id: i32, teacher_id: &str) -> bool {
        self.lessons
            .iter()
            .any(|(teacher, lesson)| lesson.id == lesson_id && teacher == teacher_id)
    }
    async fn assignment_owned_by(&self, assignment_id: i32, teacher_id: &str) -> bool {
        self.assignment_owners
            .iter()
            .any(|(id, teacher)| *id == assignment_id && teacher == teacher_id)
    }
    async fn class_headcount(&self, class_id: i32) -> Option<(i32, i64)> {
        self.headcounts.get(&class_id).copied()
    }

    async fn dashboard_stats(&self) -> DashboardStats {
        self.stats.clone()
    }

    async fn create_subject(&self, _req: &SubjectPayload) -> bool {
        self.mutated()
    }
    async fn update_subject(&self, _id: i32, _req: &SubjectPayload) -> bool {
        self.mutated()
    }
    async fn delete_subject(&self, _id: i32) -> bool {
        self.mutated()
    }

    async fn create_class(&self, _req: &ClassPayload) -> bool {
        self.mutated()
    }
    async fn update_class(&self, _id: i32, _req: &ClassPayload) -> bool {
        self.mutated()
    }
    async fn delete_class(&self, _id: i32) -> bool {
        self.mutated()
    }

    async fn create_teacher(&self, _id: &str, _req: &TeacherPayload) -> bool {
        self.mutated()
    }
    async fn update_teacher(&self, _id: &str, _req: &TeacherPayload) -> bool {
        self.mutated()
    }
    async fn delete_teacher(&self, _id: &str) -> bool {
        self.mutated()
    }

    async fn create_student(&self, _id: &str, _req: &StudentPayload) -> bool {
        self.mutated()
    }
    async fn update_student(&self, _id: &str, _req: &StudentPayload) -> bool {
        self.mutated()
    }
    async fn delete_student(&self, _id: &str) -> bool {
        self.mutated()
    }

    async fn create_parent(&self, _id: &str, _req: &ParentPayload) -> bool {
        self.mutated()
    }
    async fn update_parent(&self, _id: &str, _req: &ParentPayload) -> bool {
        self.mutated()
    }
    async fn delete_parent(&self, _id: &str) -> bool {
        self.mutated()
    }

    async fn create_lesson(&self, _req: &LessonPayload) -> bool {
        self.mutated()
    }
    async fn update_lesson(&self, _id: i32, _req: &LessonPayload) -> bool {
        self.mutated()
    }
    async fn delete_lesson(&self, _id: i32) -> bool {
        self.mutated()
    }

    async fn create_exam(&self, _req: &ExamPayload) -> bool {
        self.mutated()
    }
    async fn update_exam(&self, _id: i32, _req: &ExamPayload) -> bool {
        self.mutated()
    }
    async fn delete_exam(&self, _id: i32) -> bool {
        self.mutated()
    }

    async fn create_assignment(&self, _req: &AssignmentPayload) -> bool {
        self.mutated()
    }
    async fn update_assignment(&self, _id: i32, _req: &AssignmentPayload) -> bool {
        self.mutated()
    }
    async fn delete_assignment(&self, _id: i32) -> bool {
        self.mutated()
    }

    async fn create_result(&self, _req: &ResultPayload) -> bool {
        self.mutated()
    }
    async fn update_result(&self, _id: i32, _req: &ResultPayload) -> bool {
        self.mutated()
    }
    async fn delete_result(&self, _id: i32) -> bool {
        self.mutated()
    }

    async fn create_event(&self, _req: &EventPayload) -> bool {
        self.mutated()
    }
    async fn update_event(&self, _id: i32, _req: &EventPayload) -> bool {
        self.mutated()
    }
    async fn delete_event(&self, _id: i32) -> bool {
        self.mutated()
    }

    async fn create_announcement(&self, _req: &AnnouncementPayload) -> bool {
        self.mutated()
    }
    async fn update_announcement(&self, _id: i32, _req: &AnnouncementPayload) -> bool {
        self.mutated()
    }
    async fn delete_announcement(&self, _id: i32) -> bool {
        self.mutated()
    }
}

/// Assembles an `AppState` around the stub with the default route table,
/// the identity mock and the local (header-bypass) configuration.
pub fn state_with(repo: StubRepository) -> AppState {
    AppState {
        repo: Arc::new(repo),
        identity: Arc::new(MockIdentityService::new()),
        config: AppConfig::default(),
        policy: Arc::new(RoutePolicy::school_defaults()),
    }
}

/// Full application router over the stub, for oneshot tests.
pub fn app(repo: StubRepository) -> axum::Router {
    school_portal::create_router(state_with(repo))
}

// --- Canned selector rows ---

pub fn person(id: &str, name: &str, surname: &str) -> PersonOption {
    PersonOption {
        id: id.to_string(),
        name: name.to_string(),
        surname: surname.to_string(),
    }
}

pub fn named(id: i32, name: &str) -> NamedOption {
    NamedOption {
        id,
        name: name.to_string(),
    }
}

pub fn titled(id: i32, title: &str) -> TitledOption {
    TitledOption {
        id,
        title: title.to_string(),
    }
}
