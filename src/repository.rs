use crate::models::{
    AnnouncementPayload, AssignmentPayload, ClassPayload, ClassRosterOption, DashboardStats,
    EventPayload, ExamPayload, GradeOption, LessonOption, LessonPayload, NamedOption,
    ParentPayload, PersonOption, ResultPayload, StudentPayload, SubjectPayload, TeacherPayload,
    TitledOption,
};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

/// Repository Trait
///
/// The abstract contract for all persistence operations, letting handlers
/// and the related-data assembler run against either Postgres or an
/// in-memory stub in tests.
///
/// Two error conventions coexist on purpose:
/// - selector lookups return `sqlx::Result` so a failed query aborts the
///   whole form-preparation step (no partial related-data);
/// - mutations return an affected-rows boolean, logged internally, which
///   the handler folds into the uniform success/error body.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Selector Lookups ---
    // All ordered ascending by their display field.
    async fn teacher_options(&self) -> sqlx::Result<Vec<PersonOption>>;
    async fn student_options(&self) -> sqlx::Result<Vec<PersonOption>>;
    async fn parent_options(&self) -> sqlx::Result<Vec<PersonOption>>;
    async fn grade_options(&self) -> sqlx::Result<Vec<GradeOption>>;
    async fn subject_options(&self) -> sqlx::Result<Vec<NamedOption>>;
    async fn class_options(&self) -> sqlx::Result<Vec<NamedOption>>;
    /// Class selector with capacity and current headcount (student form).
    async fn class_roster_options(&self) -> sqlx::Result<Vec<ClassRosterOption>>;
    /// Classes the given teacher has at least one lesson in.
    async fn classes_taught_by(&self, teacher_id: &str) -> sqlx::Result<Vec<NamedOption>>;
    /// Lessons, optionally restricted to those owned by one teacher.
    async fn lesson_options(&self, owner: Option<&str>) -> sqlx::Result<Vec<NamedOption>>;
    /// Lessons enriched with subject and class names (assignment form).
    async fn lesson_detail_options(&self, owner: Option<&str>) -> sqlx::Result<Vec<LessonOption>>;
    async fn exam_options(&self) -> sqlx::Result<Vec<TitledOption>>;
    async fn assignment_options(&self) -> sqlx::Result<Vec<TitledOption>>;

    // --- Authorization / Constraint Probes ---
    async fn lesson_owned_by(&self, lesson_id: i32, teacher_id: &str) -> bool;
    async fn assignment_owned_by(&self, assignment_id: i32, teacher_id: &str) -> bool;
    /// Returns (capacity, enrolled) for the class, or None when it does not exist.
    async fn class_headcount(&self, class_id: i32) -> Option<(i32, i64)>;

    // --- Dashboard ---
    async fn dashboard_stats(&self) -> DashboardStats;

    // --- Mutations ---
    // Near 1:1 wrappers over single statements; `true` means a row was
    // written or removed.
    async fn create_subject(&self, req: &SubjectPayload) -> bool;
    async fn update_subject(&self, id: i32, req: &SubjectPayload) -> bool;
    async fn delete_subject(&self, id: i32) -> bool;

    async fn create_class(&self, req: &ClassPayload) -> bool;
    async fn update_class(&self, id: i32, req: &ClassPayload) -> bool;
    async fn delete_class(&self, id: i32) -> bool;

    // Teacher/student/parent rows use the identity provider's user id as
    // their primary key, so creates receive the id from the caller.
    async fn create_teacher(&self, id: &str, req: &TeacherPayload) -> bool;
    async fn update_teacher(&self, id: &str, req: &TeacherPayload) -> bool;
    async fn delete_teacher(&self, id: &str) -> bool;

    async fn create_student(&self, id: &str, req: &StudentPayload) -> bool;
    async fn update_student(&self, id: &str, req: &StudentPayload) -> bool;
    async fn delete_student(&self, id: &str) -> bool;

    async fn create_parent(&self, id: &str, req: &ParentPayload) -> bool;
    async fn update_parent(&self, id: &str, req: &ParentPayload) -> bool;
    async fn delete_parent(&self, id: &str) -> bool;

    async fn create_lesson(&self, req: &LessonPayload) -> bool;
    async fn update_lesson(&self, id: i32, req: &LessonPayload) -> bool;
    async fn delete_lesson(&self, id: i32) -> bool;

    async fn create_exam(&self, req: &ExamPayload) -> bool;
    async fn update_exam(&self, id: i32, req: &ExamPayload) -> bool;
    async fn delete_exam(&self, id: i32) -> bool;

    async fn create_assignment(&self, req: &AssignmentPayload) -> bool;
    async fn update_assignment(&self, id: i32, req: &AssignmentPayload) -> bool;
    async fn delete_assignment(&self, id: i32) -> bool;

    async fn create_result(&self, req: &ResultPayload) -> bool;
    async fn update_result(&self, id: i32, req: &ResultPayload) -> bool;
    async fn delete_result(&self, id: i32) -> bool;

    async fn create_event(&self, req: &EventPayload) -> bool;
    async fn update_event(&self, id: i32, req: &EventPayload) -> bool;
    async fn delete_event(&self, id: i32) -> bool;

    async fn create_announcement(&self, req: &AnnouncementPayload) -> bool;
    async fn update_announcement(&self, id: i32, req: &AnnouncementPayload) -> bool;
    async fn delete_announcement(&self, id: i32) -> bool;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the
/// application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete `Repository` implementation backed by PostgreSQL.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Maps a statement result to an affected-rows boolean, logging the
    /// failure under the given statement tag.
    fn affected(result: sqlx::Result<sqlx::postgres::PgQueryResult>, tag: &str) -> bool {
        match result {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("{tag} error: {:?}", e);
                false
            }
        }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    // --- Selector Lookups ---

    async fn teacher_options(&self) -> sqlx::Result<Vec<PersonOption>> {
        sqlx::query_as::<_, PersonOption>(
            "SELECT id, name, surname FROM teachers ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn student_options(&self) -> sqlx::Result<Vec<PersonOption>> {
        sqlx::query_as::<_, PersonOption>(
            "SELECT id, name, surname FROM students ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn parent_options(&self) -> sqlx::Result<Vec<PersonOption>> {
        sqlx::query_as::<_, PersonOption>(
            "SELECT id, name, surname FROM parents ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn grade_options(&self) -> sqlx::Result<Vec<GradeOption>> {
        sqlx::query_as::<_, GradeOption>("SELECT id, level FROM grades ORDER BY level ASC")
            .fetch_all(&self.pool)
            .await
    }

    async fn subject_options(&self) -> sqlx::Result<Vec<NamedOption>> {
        sqlx::query_as::<_, NamedOption>("SELECT id, name FROM subjects ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
    }

    async fn class_options(&self) -> sqlx::Result<Vec<NamedOption>> {
        sqlx::query_as::<_, NamedOption>("SELECT id, name FROM classes ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
    }

    async fn class_roster_options(&self) -> sqlx::Result<Vec<ClassRosterOption>> {
        sqlx::query_as::<_, ClassRosterOption>(
            r#"
            SELECT c.id, c.name, c.capacity, COUNT(s.id) AS student_count
            FROM classes c
            LEFT JOIN students s ON s.class_id = c.id
            GROUP BY c.id, c.name, c.capacity
            ORDER BY c.name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn classes_taught_by(&self, teacher_id: &str) -> sqlx::Result<Vec<NamedOption>> {
        sqlx::query_as::<_, NamedOption>(
            r#"
            SELECT DISTINCT c.id, c.name
            FROM classes c
            JOIN lessons l ON l.class_id = c.id
            WHERE l.teacher_id = $1
            ORDER BY c.name ASC
            "#,
        )
        .bind(teacher_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn lesson_options(&self, owner: Option<&str>) -> sqlx::Result<Vec<NamedOption>> {
        sqlx::query_as::<_, NamedOption>(
            r#"
            SELECT id, name FROM lessons
            WHERE ($1::text IS NULL OR teacher_id = $1)
            ORDER BY name ASC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
    }

    async fn lesson_detail_options(&self, owner: Option<&str>) -> sqlx::Result<Vec<LessonOption>> {
        sqlx::query_as::<_, LessonOption>(
            r#"
            SELECT l.id, l.name, s.name AS subject_name, c.name AS class_name
            FROM lessons l
            JOIN subjects s ON s.id = l.subject_id
            JOIN classes c ON c.id = l.class_id
            WHERE ($1::text IS NULL OR l.teacher_id = $1)
            ORDER BY l.name ASC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
    }

    async fn exam_options(&self) -> sqlx::Result<Vec<TitledOption>> {
        sqlx::query_as::<_, TitledOption>("SELECT id, title FROM exams ORDER BY title ASC")
            .fetch_all(&self.pool)
            .await
    }

    async fn assignment_options(&self) -> sqlx::Result<Vec<TitledOption>> {
        sqlx::query_as::<_, TitledOption>("SELECT id, title FROM assignments ORDER BY title ASC")
            .fetch_all(&self.pool)
            .await
    }

    // --- Authorization / Constraint Probes ---

    async fn lesson_owned_by(&self, lesson_id: i32, teacher_id: &str) -> bool {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM lessons WHERE id = $1 AND teacher_id = $2)",
        )
        .bind(lesson_id)
        .bind(teacher_id)
        .fetch_one(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("lesson_owned_by error: {:?}", e);
            false
        })
    }

    async fn assignment_owned_by(&self, assignment_id: i32, teacher_id: &str) -> bool {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM assignments a
                JOIN lessons l ON l.id = a.lesson_id
                WHERE a.id = $1 AND l.teacher_id = $2
            )
            "#,
        )
        .bind(assignment_id)
        .bind(teacher_id)
        .fetch_one(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("assignment_owned_by error: {:?}", e);
            false
        })
    }

    async fn class_headcount(&self, class_id: i32) -> Option<(i32, i64)> {
        sqlx::query_as::<_, (i32, i64)>(
            r#"
            SELECT c.capacity, COUNT(s.id)
            FROM classes c
            LEFT JOIN students s ON s.class_id = c.id
            WHERE c.id = $1
            GROUP BY c.capacity
            "#,
        )
        .bind(class_id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("class_headcount error: {:?}", e);
            None
        })
    }

    // --- Dashboard ---

    async fn dashboard_stats(&self) -> DashboardStats {
        let count = |table: &str| {
            let sql = format!("SELECT COUNT(*) FROM {table}");
            let pool = self.pool.clone();
            async move {
                sqlx::query_scalar::<_, i64>(&sql)
                    .fetch_one(&pool)
                    .await
                    .unwrap_or_else(|e| {
                        tracing::error!("dashboard count error: {:?}", e);
                        0
                    })
            }
        };
        DashboardStats {
            students: count("students").await,
            teachers: count("teachers").await,
            parents: count("parents").await,
            events: count("events").await,
        }
    }

    // --- Subject ---

    async fn create_subject(&self, req: &SubjectPayload) -> bool {
        let id = match sqlx::query_scalar::<_, i32>(
            "INSERT INTO subjects (name) VALUES ($1) RETURNING id",
        )
        .bind(&req.name)
        .fetch_one(&self.pool)
        .await
        {
            Ok(id) => id,
            Err(e) => {
                tracing::error!("create_subject error: {:?}", e);
                return false;
            }
        };
        self.link_subject_teachers(id, &req.teachers).await
    }

    async fn update_subject(&self, id: i32, req: &SubjectPayload) -> bool {
        let updated = Self::affected(
            sqlx::query("UPDATE subjects SET name = $1 WHERE id = $2")
                .bind(&req.name)
                .bind(id)
                .execute(&self.pool)
                .await,
            "update_subject",
        );
        if !updated {
            return false;
        }
        // Replace the teacher assignment set.
        if let Err(e) = sqlx::query("DELETE FROM subject_teachers WHERE subject_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            tracing::error!("update_subject unlink error: {:?}", e);
            return false;
        }
        self.link_subject_teachers(id, &req.teachers).await
    }

    async fn delete_subject(&self, id: i32) -> bool {
        Self::affected(
            sqlx::query("DELETE FROM subjects WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await,
            "delete_subject",
        )
    }

    // --- Class ---

    async fn create_class(&self, req: &ClassPayload) -> bool {
        Self::affected(
            sqlx::query(
                "INSERT INTO classes (name, capacity, grade_id, supervisor_id) VALUES ($1, $2, $3, $4)",
            )
            .bind(&req.name)
            .bind(req.capacity)
            .bind(req.grade_id)
            .bind(&req.supervisor_id)
            .execute(&self.pool)
            .await,
            "create_class",
        )
    }

    async fn update_class(&self, id: i32, req: &ClassPayload) -> bool {
        Self::affected(
            sqlx::query(
                "UPDATE classes SET name = $1, capacity = $2, grade_id = $3, supervisor_id = $4 WHERE id = $5",
            )
            .bind(&req.name)
            .bind(req.capacity)
            .bind(req.grade_id)
            .bind(&req.supervisor_id)
            .bind(id)
            .execute(&self.pool)
            .await,
            "update_class",
        )
    }

    async fn delete_class(&self, id: i32) -> bool {
        Self::affected(
            sqlx::query("DELETE FROM classes WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await,
            "delete_class",
        )
    }

    // --- Teacher ---

    async fn create_teacher(&self, id: &str, req: &TeacherPayload) -> bool {
        let inserted = Self::affected(
            sqlx::query(
                r#"
                INSERT INTO teachers
                    (id, username, name, surname, email, phone, address, img, blood_type, sex, birthday)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                "#,
            )
            .bind(id)
            .bind(&req.username)
            .bind(&req.name)
            .bind(&req.surname)
            .bind(&req.email)
            .bind(&req.phone)
            .bind(&req.address)
            .bind(&req.img)
            .bind(&req.blood_type)
            .bind(&req.sex)
            .bind(req.birthday)
            .execute(&self.pool)
            .await,
            "create_teacher",
        );
        if !inserted {
            return false;
        }
        self.link_teacher_subjects(id, &req.subjects).await
    }

    async fn update_teacher(&self, id: &str, req: &TeacherPayload) -> bool {
        let updated = Self::affected(
            sqlx::query(
                r#"
                UPDATE teachers SET
                    username = $1, name = $2, surname = $3, email = $4, phone = $5,
                    address = $6, img = $7, blood_type = $8, sex = $9, birthday = $10
                WHERE id = $11
                "#,
            )
            .bind(&req.username)
            .bind(&req.name)
            .bind(&req.surname)
            .bind(&req.email)
            .bind(&req.phone)
            .bind(&req.address)
            .bind(&req.img)
            .bind(&req.blood_type)
            .bind(&req.sex)
            .bind(req.birthday)
            .bind(id)
            .execute(&self.pool)
            .await,
            "update_teacher",
        );
        if !updated {
            return false;
        }
        if let Err(e) = sqlx::query("DELETE FROM subject_teachers WHERE teacher_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            tracing::error!("update_teacher unlink error: {:?}", e);
            return false;
        }
        self.link_teacher_subjects(id, &req.subjects).await
    }

    async fn delete_teacher(&self, id: &str) -> bool {
        Self::affected(
            sqlx::query("DELETE FROM teachers WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await,
            "delete_teacher",
        )
    }

    // --- Student ---

    async fn create_student(&self, id: &str, req: &StudentPayload) -> bool {
        Self::affected(
            sqlx::query(
                r#"
                INSERT INTO students
                    (id, username, name, surname, email, phone, address, img, blood_type,
                     sex, birthday, grade_id, class_id, parent_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
                "#,
            )
            .bind(id)
            .bind(&req.username)
            .bind(&req.name)
            .bind(&req.surname)
            .bind(&req.email)
            .bind(&req.phone)
            .bind(&req.address)
            .bind(&req.img)
            .bind(&req.blood_type)
            .bind(&req.sex)
            .bind(req.birthday)
            .bind(req.grade_id)
            .bind(req.class_id)
            .bind(&req.parent_id)
            .execute(&self.pool)
            .await,
            "create_student",
        )
    }

    async fn update_student(&self, id: &str, req: &StudentPayload) -> bool {
        Self::affected(
            sqlx::query(
                r#"
                UPDATE students SET
                    username = $1, name = $2, surname = $3, email = $4, phone = $5,
                    address = $6, img = $7, blood_type = $8, sex = $9, birthday = $10,
                    grade_id = $11, class_id = $12, parent_id = $13
                WHERE id = $14
                "#,
            )
            .bind(&req.username)
            .bind(&req.name)
            .bind(&req.surname)
            .bind(&req.email)
            .bind(&req.phone)
            .bind(&req.address)
            .bind(&req.img)
            .bind(&req.blood_type)
            .bind(&req.sex)
            .bind(req.birthday)
            .bind(req.grade_id)
            .bind(req.class_id)
            .bind(&req.parent_id)
            .bind(id)
            .execute(&self.pool)
            .await,
            "update_student",
        )
    }

    async fn delete_student(&self, id: &str) -> bool {
        Self::affected(
            sqlx::query("DELETE FROM students WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await,
            "delete_student",
        )
    }

    // --- Parent ---

    async fn create_parent(&self, id: &str, req: &ParentPayload) -> bool {
        Self::affected(
            sqlx::query(
                r#"
                INSERT INTO parents (id, username, name, surname, email, phone, address)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(id)
            .bind(&req.username)
            .bind(&req.name)
            .bind(&req.surname)
            .bind(&req.email)
            .bind(&req.phone)
            .bind(&req.address)
            .execute(&self.pool)
            .await,
            "create_parent",
        )
    }

    async fn update_parent(&self, id: &str, req: &ParentPayload) -> bool {
        Self::affected(
            sqlx::query(
                r#"
                UPDATE parents SET
                    username = $1, name = $2, surname = $3, email = $4, phone = $5, address = $6
                WHERE id = $7
                "#,
            )
            .bind(&req.username)
            .bind(&req.name)
            .bind(&req.surname)
            .bind(&req.email)
            .bind(&req.phone)
            .bind(&req.address)
            .bind(id)
            .execute(&self.pool)
            .await,
            "update_parent",
        )
    }

    async fn delete_parent(&self, id: &str) -> bool {
        Self::affected(
            sqlx::query("DELETE FROM parents WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await,
            "delete_parent",
        )
    }

    // --- Lesson ---

    async fn create_lesson(&self, req: &LessonPayload) -> bool {
        Self::affected(
            sqlx::query(
                r#"
                INSERT INTO lessons (name, day, start_time, end_time, subject_id, class_id, teacher_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(&req.name)
            .bind(&req.day)
            .bind(req.start_time)
            .bind(req.end_time)
            .bind(req.subject_id)
            .bind(req.class_id)
            .bind(&req.teacher_id)
            .execute(&self.pool)
            .await,
            "create_lesson",
        )
    }

    async fn update_lesson(&self, id: i32, req: &LessonPayload) -> bool {
        Self::affected(
            sqlx::query(
                r#"
                UPDATE lessons SET
                    name = $1, day = $2, start_time = $3, end_time = $4,
                    subject_id = $5, class_id = $6, teacher_id = $7
                WHERE id = $8
                "#,
            )
            .bind(&req.name)
            .bind(&req.day)
            .bind(req.start_time)
            .bind(req.end_time)
            .bind(req.subject_id)
            .bind(req.class_id)
            .bind(&req.teacher_id)
            .bind(id)
            .execute(&self.pool)
            .await,
            "update_lesson",
        )
    }

    async fn delete_lesson(&self, id: i32) -> bool {
        Self::affected(
            sqlx::query("DELETE FROM lessons WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await,
            "delete_lesson",
        )
    }

    // --- Exam ---

    async fn create_exam(&self, req: &ExamPayload) -> bool {
        Self::affected(
            sqlx::query(
                "INSERT INTO exams (title, start_time, end_time, lesson_id) VALUES ($1, $2, $3, $4)",
            )
            .bind(&req.title)
            .bind(req.start_time)
            .bind(req.end_time)
            .bind(req.lesson_id)
            .execute(&self.pool)
            .await,
            "create_exam",
        )
    }

    async fn update_exam(&self, id: i32, req: &ExamPayload) -> bool {
        Self::affected(
            sqlx::query(
                "UPDATE exams SET title = $1, start_time = $2, end_time = $3, lesson_id = $4 WHERE id = $5",
            )
            .bind(&req.title)
            .bind(req.start_time)
            .bind(req.end_time)
            .bind(req.lesson_id)
            .bind(id)
            .execute(&self.pool)
            .await,
            "update_exam",
        )
    }

    async fn delete_exam(&self, id: i32) -> bool {
        Self::affected(
            sqlx::query("DELETE FROM exams WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await,
            "delete_exam",
        )
    }

    // --- Assignment ---

    async fn create_assignment(&self, req: &AssignmentPayload) -> bool {
        // The start date is stamped at creation time.
        Self::affected(
            sqlx::query(
                "INSERT INTO assignments (title, start_date, due_date, lesson_id) VALUES ($1, NOW(), $2, $3)",
            )
            .bind(&req.title)
            .bind(req.due_date)
            .bind(req.lesson_id)
            .execute(&self.pool)
            .await,
            "create_assignment",
        )
    }

    async fn update_assignment(&self, id: i32, req: &AssignmentPayload) -> bool {
        Self::affected(
            sqlx::query(
                "UPDATE assignments SET title = $1, start_date = NOW(), due_date = $2, lesson_id = $3 WHERE id = $4",
            )
            .bind(&req.title)
            .bind(req.due_date)
            .bind(req.lesson_id)
            .bind(id)
            .execute(&self.pool)
            .await,
            "update_assignment",
        )
    }

    async fn delete_assignment(&self, id: i32) -> bool {
        Self::affected(
            sqlx::query("DELETE FROM assignments WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await,
            "delete_assignment",
        )
    }

    // --- Result ---

    async fn create_result(&self, req: &ResultPayload) -> bool {
        Self::affected(
            sqlx::query(
                "INSERT INTO results (score, exam_id, assignment_id, student_id) VALUES ($1, $2, $3, $4)",
            )
            .bind(req.score)
            .bind(req.exam_id)
            .bind(req.assignment_id)
            .bind(&req.student_id)
            .execute(&self.pool)
            .await,
            "create_result",
        )
    }

    async fn update_result(&self, id: i32, req: &ResultPayload) -> bool {
        Self::affected(
            sqlx::query(
                "UPDATE results SET score = $1, exam_id = $2, assignment_id = $3, student_id = $4 WHERE id = $5",
            )
            .bind(req.score)
            .bind(req.exam_id)
            .bind(req.assignment_id)
            .bind(&req.student_id)
            .bind(id)
            .execute(&self.pool)
            .await,
            "update_result",
        )
    }

    async fn delete_result(&self, id: i32) -> bool {
        Self::affected(
            sqlx::query("DELETE FROM results WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await,
            "delete_result",
        )
    }

    // --- Event ---

    async fn create_event(&self, req: &EventPayload) -> bool {
        Self::affected(
            sqlx::query(
                "INSERT INTO events (title, description, start_time, end_time, class_id) VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(&req.title)
            .bind(&req.description)
            .bind(req.start_time)
            .bind(req.end_time)
            .bind(req.class_id)
            .execute(&self.pool)
            .await,
            "create_event",
        )
    }

    async fn update_event(&self, id: i32, req: &EventPayload) -> bool {
        Self::affected(
            sqlx::query(
                "UPDATE events SET title = $1, description = $2, start_time = $3, end_time = $4, class_id = $5 WHERE id = $6",
            )
            .bind(&req.title)
            .bind(&req.description)
            .bind(req.start_time)
            .bind(req.end_time)
            .bind(req.class_id)
            .bind(id)
            .execute(&self.pool)
            .await,
            "update_event",
        )
    }

    async fn delete_event(&self, id: i32) -> bool {
        Self::affected(
            sqlx::query("DELETE FROM events WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await,
            "delete_event",
        )
    }

    // --- Announcement ---

    async fn create_announcement(&self, req: &AnnouncementPayload) -> bool {
        Self::affected(
            sqlx::query(
                "INSERT INTO announcements (title, description, date, class_id) VALUES ($1, $2, $3, $4)",
            )
            .bind(&req.title)
            .bind(&req.description)
            .bind(req.date)
            .bind(req.class_id)
            .execute(&self.pool)
            .await,
            "create_announcement",
        )
    }

    async fn update_announcement(&self, id: i32, req: &AnnouncementPayload) -> bool {
        Self::affected(
            sqlx::query(
                "UPDATE announcements SET title = $1, description = $2, date = $3, class_id = $4 WHERE id = $5",
            )
            .bind(&req.title)
            .bind(&req.description)
            .bind(req.date)
            .bind(req.class_id)
            .bind(id)
            .execute(&self.pool)
            .await,
            "update_announcement",
        )
    }

    async fn delete_announcement(&self, id: i32) -> bool {
        Self::affected(
            sqlx::query("DELETE FROM announcements WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await,
            "delete_announcement",
        )
    }
}

impl PostgresRepository {
    /// Inserts the subject→teacher assignment rows for one subject.
    async fn link_subject_teachers(&self, subject_id: i32, teacher_ids: &[String]) -> bool {
        for teacher_id in teacher_ids {
            if let Err(e) = sqlx::query(
                "INSERT INTO subject_teachers (subject_id, teacher_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(subject_id)
            .bind(teacher_id)
            .execute(&self.pool)
            .await
            {
                tracing::error!("link_subject_teachers error: {:?}", e);
                return false;
            }
        }
        true
    }

    /// Inserts the teacher→subject assignment rows for one teacher.
    async fn link_teacher_subjects(&self, teacher_id: &str, subject_ids: &[i32]) -> bool {
        for subject_id in subject_ids {
            if let Err(e) = sqlx::query(
                "INSERT INTO subject_teachers (subject_id, teacher_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(subject_id)
            .bind(teacher_id)
            .execute(&self.pool)
            .await
            {
                tracing::error!("link_teacher_subjects error: {:?}", e);
                return false;
            }
        }
        true
    }
}
