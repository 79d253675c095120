mod common;

use common::{StubRepository, named, person, titled};
use school_portal::{
    access::Role,
    models::LookupRecord,
    related::{EntityKind, assemble},
};
use std::collections::HashMap;

fn seeded() -> StubRepository {
    StubRepository {
        teachers: vec![person("t1", "Ada", "Byrne"), person("t2", "Liam", "Walsh")],
        students: vec![person("s1", "Maya", "Kelly")],
        parents: vec![person("p1", "Nora", "Kelly")],
        grades: vec![
            school_portal::models::GradeOption { id: 1, level: 1 },
            school_portal::models::GradeOption { id: 2, level: 2 },
        ],
        subjects: vec![named(1, "Biology"), named(2, "History")],
        classes: vec![named(1, "1A"), named(2, "2B")],
        lessons: vec![
            ("t1".to_string(), named(10, "Biology Mon 9am")),
            ("t2".to_string(), named(11, "History Tue 10am")),
        ],
        taught_classes: HashMap::from([("t1".to_string(), vec![named(1, "1A")])]),
        exams: vec![titled(5, "Midterm")],
        assignments: vec![titled(7, "Essay")],
        ..Default::default()
    }
}

#[tokio::test]
async fn lesson_form_gets_subjects_classes_and_teachers() {
    let repo = seeded();
    let related = assemble(&repo, EntityKind::Lesson, Role::Admin, "admin1")
        .await
        .unwrap();

    let keys: Vec<&str> = related.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["classes", "subjects", "teachers"]);
    assert_eq!(related["subjects"].len(), 2);
    assert_eq!(related["teachers"].len(), 2);
}

#[tokio::test]
async fn exam_form_lessons_are_scoped_to_the_calling_teacher() {
    let repo = seeded();

    let scoped = assemble(&repo, EntityKind::Exam, Role::Teacher, "t1")
        .await
        .unwrap();
    assert_eq!(scoped["lessons"].len(), 1);
    match &scoped["lessons"][0] {
        LookupRecord::Named(lesson) => assert_eq!(lesson.id, 10),
        other => panic!("unexpected record shape: {other:?}"),
    }

    let unfiltered = assemble(&repo, EntityKind::Exam, Role::Admin, "admin1")
        .await
        .unwrap();
    assert_eq!(unfiltered["lessons"].len(), 2);
}

#[tokio::test]
async fn announcement_form_classes_are_those_the_teacher_teaches() {
    let repo = seeded();

    let scoped = assemble(&repo, EntityKind::Announcement, Role::Teacher, "t1")
        .await
        .unwrap();
    assert_eq!(scoped["classes"].len(), 1);

    // A teacher with no lessons sees no classes rather than everything.
    let empty = assemble(&repo, EntityKind::Announcement, Role::Teacher, "t2")
        .await
        .unwrap();
    assert!(empty["classes"].is_empty());

    let unfiltered = assemble(&repo, EntityKind::Announcement, Role::Admin, "admin1")
        .await
        .unwrap();
    assert_eq!(unfiltered["classes"].len(), 2);
}

#[tokio::test]
async fn result_form_joins_students_exams_and_assignments() {
    let repo = seeded();
    let related = assemble(&repo, EntityKind::Result, Role::Admin, "admin1")
        .await
        .unwrap();

    let keys: Vec<&str> = related.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["assignments", "exams", "students"]);
    match &related["exams"][0] {
        LookupRecord::Titled(exam) => assert_eq!(exam.title, "Midterm"),
        other => panic!("unexpected record shape: {other:?}"),
    }
}

#[tokio::test]
async fn student_form_classes_carry_capacity_and_headcount() {
    let repo = StubRepository {
        class_rosters: vec![school_portal::models::ClassRosterOption {
            id: 1,
            name: "1A".to_string(),
            capacity: 25,
            student_count: 24,
        }],
        grades: vec![school_portal::models::GradeOption { id: 1, level: 1 }],
        ..Default::default()
    };
    let related = assemble(&repo, EntityKind::Student, Role::Admin, "admin1")
        .await
        .unwrap();

    match &related["classes"][0] {
        LookupRecord::ClassRoster(class) => {
            assert_eq!(class.capacity, 25);
            assert_eq!(class.student_count, 24);
        }
        other => panic!("unexpected record shape: {other:?}"),
    }
}

#[tokio::test]
async fn attendance_form_has_no_dependent_selectors() {
    let repo = seeded();
    let related = assemble(&repo, EntityKind::Attendance, Role::Teacher, "t1")
        .await
        .unwrap();
    assert!(related.is_empty());
}

#[tokio::test]
async fn any_failed_lookup_fails_the_whole_assembly() {
    let repo = StubRepository {
        fail_lookups: true,
        ..seeded()
    };

    assert!(assemble(&repo, EntityKind::Lesson, Role::Admin, "admin1").await.is_err());
    assert!(assemble(&repo, EntityKind::Subject, Role::Admin, "admin1").await.is_err());
    assert!(assemble(&repo, EntityKind::Result, Role::Admin, "admin1").await.is_err());
}

#[tokio::test]
async fn empty_tables_yield_empty_lists_not_errors() {
    let repo = StubRepository::default();
    let related = assemble(&repo, EntityKind::Subject, Role::Admin, "admin1")
        .await
        .unwrap();

    assert_eq!(related.len(), 1);
    assert!(related["teachers"].is_empty());
}
