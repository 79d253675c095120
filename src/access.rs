use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::{AppState, auth::AuthUser};

/// Role
///
/// The closed set of caller permission levels recognized by the portal.
/// A role is attached to the session by the external identity provider and
/// is read-only inside this application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    Admin,
    Teacher,
    Student,
    Parent,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
            Role::Parent => "parent",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "teacher" => Ok(Role::Teacher),
            "student" => Ok(Role::Student),
            "parent" => Ok(Role::Parent),
            _ => Err(()),
        }
    }
}

/// AccessDecision
///
/// Outcome of evaluating a request path against the route-access table.
/// `Redirect` carries the landing page for the caller's role (`/` for an
/// unauthenticated caller).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Redirect(String),
}

/// A single configured (pattern, allowed roles) pair. The pattern is
/// compiled once at construction and anchored to the full request path.
struct RouteRule {
    pattern: Regex,
    allowed: Vec<Role>,
}

/// RoutePolicy
///
/// The immutable route-access table. Built once at process startup from the
/// configured (path-pattern, allowed-roles) pairs and shared by reference
/// through `AppState`; it is never mutated at request time.
///
/// Evaluation walks the rules in configured order. Every rule whose pattern
/// matches the request path must include the caller's role; the first
/// matching rule that excludes it short-circuits into a redirect. A path
/// that matches no rule is allowed. Because overlapping patterns with
/// different role sets are resolved by configured order, that order is part
/// of the contract (and covered by tests).
pub struct RoutePolicy {
    rules: Vec<RouteRule>,
}

impl RoutePolicy {
    /// Compiles the configured (pattern, roles) pairs into a policy.
    /// Pattern syntax is the `regex` crate's, anchored to the whole path,
    /// e.g. `/admin(.*)` or the literal `/list/exams`.
    pub fn new<'a, I>(rules: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = (&'a str, Vec<Role>)>,
    {
        let rules = rules
            .into_iter()
            .map(|(pattern, allowed)| {
                let pattern = Regex::new(&format!("^{}$", pattern))?;
                Ok(RouteRule { pattern, allowed })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { rules })
    }

    /// The portal's standard route-access table: each role's own section is
    /// private to it, while the `/list/*` pages open up progressively from
    /// admin-only to all four roles.
    ///
    /// # Panics
    /// The table is static, so a compile failure here is a programming error
    /// and aborts startup (fail-fast).
    pub fn school_defaults() -> Self {
        use Role::*;
        Self::new([
            ("/admin(.*)", vec![Admin]),
            ("/student(.*)", vec![Student]),
            ("/teacher(.*)", vec![Teacher]),
            ("/parent(.*)", vec![Parent]),
            ("/list/teachers", vec![Admin, Teacher]),
            ("/list/students", vec![Admin, Teacher]),
            ("/list/parents", vec![Admin, Teacher]),
            ("/list/subjects", vec![Admin]),
            ("/list/classes", vec![Admin, Teacher]),
            ("/list/exams", vec![Admin, Teacher, Student, Parent]),
            ("/list/assignments", vec![Admin, Teacher, Student, Parent]),
            ("/list/results", vec![Admin, Teacher, Student, Parent]),
            ("/list/attendance", vec![Admin, Teacher, Student, Parent]),
            ("/list/events", vec![Admin, Teacher, Student, Parent]),
            ("/list/announcements", vec![Admin, Teacher, Student, Parent]),
        ])
        .expect("FATAL: default route-access table must compile")
    }

    /// authorize
    ///
    /// Pure decision function: no I/O, no session mutation, deterministic
    /// for a given (path, role, table).
    pub fn authorize(&self, path: &str, role: Option<Role>) -> AccessDecision {
        for rule in &self.rules {
            if rule.pattern.is_match(path) {
                let permitted = role.is_some_and(|r| rule.allowed.contains(&r));
                if !permitted {
                    // Deny on the first matching-but-violating rule; an
                    // unauthenticated caller is never a member.
                    let target = match role {
                        Some(r) => format!("/{}", r),
                        None => "/".to_string(),
                    };
                    return AccessDecision::Redirect(target);
                }
            }
        }
        AccessDecision::Allow
    }
}

/// route_guard
///
/// Router-wide middleware that applies the `RoutePolicy` to every request.
/// The caller's role is resolved through the `AuthUser` extractor when a
/// session is present; extraction failure is treated as an unauthenticated
/// caller rather than an error, so the policy decides what happens next.
pub async fn route_guard(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    let (mut parts, body) = request.into_parts();
    let role = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .ok()
        .map(|user| user.role);
    let request = Request::from_parts(parts, body);

    match state.policy.authorize(&path, role) {
        AccessDecision::Allow => next.run(request).await,
        AccessDecision::Redirect(target) => {
            tracing::debug!(path = %path, ?role, redirect = %target, "route access denied");
            Redirect::temporary(&target).into_response()
        }
    }
}
