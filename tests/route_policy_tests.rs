use school_portal::access::{AccessDecision, Role, RoutePolicy};

#[test]
fn unmatched_path_is_allowed_for_everyone() {
    let policy = RoutePolicy::school_defaults();

    assert_eq!(policy.authorize("/", Some(Role::Student)), AccessDecision::Allow);
    assert_eq!(policy.authorize("/profile", Some(Role::Parent)), AccessDecision::Allow);
    assert_eq!(policy.authorize("/sign-in", None), AccessDecision::Allow);
}

#[test]
fn role_sections_admit_only_their_own_role() {
    let policy = RoutePolicy::school_defaults();

    assert_eq!(policy.authorize("/admin", Some(Role::Admin)), AccessDecision::Allow);
    assert_eq!(policy.authorize("/teacher", Some(Role::Teacher)), AccessDecision::Allow);
    assert_eq!(
        policy.authorize("/teacher/exams", Some(Role::Student)),
        AccessDecision::Redirect("/student".into())
    );
    assert_eq!(
        policy.authorize("/student", Some(Role::Admin)),
        AccessDecision::Redirect("/admin".into())
    );
    assert_eq!(
        policy.authorize("/parent", Some(Role::Teacher)),
        AccessDecision::Redirect("/teacher".into())
    );
}

#[test]
fn section_patterns_cover_nested_paths() {
    let policy = RoutePolicy::school_defaults();

    assert_eq!(
        policy.authorize("/admin/settings/deep/page", Some(Role::Admin)),
        AccessDecision::Allow
    );
    assert_eq!(
        policy.authorize("/admin/settings/deep/page", Some(Role::Parent)),
        AccessDecision::Redirect("/parent".into())
    );
}

#[test]
fn unauthenticated_caller_redirects_to_root() {
    let policy = RoutePolicy::school_defaults();

    assert_eq!(
        policy.authorize("/admin", None),
        AccessDecision::Redirect("/".into())
    );
    assert_eq!(
        policy.authorize("/list/exams", None),
        AccessDecision::Redirect("/".into())
    );
}

#[test]
fn list_pages_open_up_by_role() {
    let policy = RoutePolicy::school_defaults();

    // Admin-only.
    assert_eq!(policy.authorize("/list/subjects", Some(Role::Admin)), AccessDecision::Allow);
    assert_eq!(
        policy.authorize("/list/subjects", Some(Role::Teacher)),
        AccessDecision::Redirect("/teacher".into())
    );

    // Staff.
    assert_eq!(policy.authorize("/list/students", Some(Role::Teacher)), AccessDecision::Allow);
    assert_eq!(
        policy.authorize("/list/students", Some(Role::Parent)),
        AccessDecision::Redirect("/parent".into())
    );

    // Everyone signed in.
    for role in [Role::Admin, Role::Teacher, Role::Student, Role::Parent] {
        assert_eq!(policy.authorize("/list/announcements", Some(role)), AccessDecision::Allow);
        assert_eq!(policy.authorize("/list/results", Some(role)), AccessDecision::Allow);
    }
}

#[test]
fn decision_is_deterministic() {
    let policy = RoutePolicy::school_defaults();

    let first = policy.authorize("/list/classes", Some(Role::Student));
    for _ in 0..10 {
        assert_eq!(policy.authorize("/list/classes", Some(Role::Student)), first);
    }
}

#[test]
fn every_matching_rule_must_admit_the_caller() {
    // Two overlapping rules: the broad one admits teachers, the narrow one
    // does not. The narrow rule still matches, so the teacher is denied.
    let policy = RoutePolicy::new([
        ("/reports(.*)", vec![Role::Admin, Role::Teacher]),
        ("/reports/finance", vec![Role::Admin]),
    ])
    .unwrap();

    assert_eq!(policy.authorize("/reports/weekly", Some(Role::Teacher)), AccessDecision::Allow);
    assert_eq!(
        policy.authorize("/reports/finance", Some(Role::Teacher)),
        AccessDecision::Redirect("/teacher".into())
    );
    assert_eq!(policy.authorize("/reports/finance", Some(Role::Admin)), AccessDecision::Allow);
}

#[test]
fn overlapping_rules_deny_in_configured_order() {
    // Both orderings deny, so the redirect target is identical either way;
    // what configured order fixes is which rule fires first.
    let forward = RoutePolicy::new([
        ("/shared(.*)", vec![Role::Admin]),
        ("/shared/open", vec![Role::Student]),
    ])
    .unwrap();
    let reversed = RoutePolicy::new([
        ("/shared/open", vec![Role::Student]),
        ("/shared(.*)", vec![Role::Admin]),
    ])
    .unwrap();

    // A student hits /shared/open: the broad admin-only rule matches too,
    // so the deny stands regardless of order.
    assert_eq!(
        forward.authorize("/shared/open", Some(Role::Student)),
        AccessDecision::Redirect("/student".into())
    );
    assert_eq!(
        reversed.authorize("/shared/open", Some(Role::Student)),
        AccessDecision::Redirect("/student".into())
    );
}

#[test]
fn patterns_are_anchored_to_the_full_path() {
    let policy = RoutePolicy::school_defaults();

    // "/list/exams" must not match as a substring of a longer path.
    assert_eq!(
        policy.authorize("/list/examsarchive", Some(Role::Parent)),
        AccessDecision::Allow
    );
    assert_eq!(
        policy.authorize("/prefix/list/subjects", Some(Role::Parent)),
        AccessDecision::Allow
    );
}

#[test]
fn invalid_pattern_is_rejected_at_construction() {
    assert!(RoutePolicy::new([("/broken(", vec![Role::Admin])]).is_err());
}
