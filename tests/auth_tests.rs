use axum::{Router, body::Body, http::Request, http::StatusCode, routing::get};
use jsonwebtoken::{EncodingKey, Header, encode};
use school_portal::{
    AppConfig,
    auth::{AuthUser, Claims},
    config::Env,
};
use std::time::{SystemTime, UNIX_EPOCH};
use tower::util::ServiceExt;

async fn whoami(user: AuthUser) -> String {
    format!("{}:{}", user.id, user.role)
}

fn app(config: AppConfig) -> Router {
    Router::new().route("/whoami", get(whoami)).with_state(config)
}

fn token(config: &AppConfig, sub: &str, role: school_portal::access::Role, ttl: i64) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;
    let claims = Claims {
        sub: sub.to_string(),
        role,
        exp: (now + ttl) as usize,
        iat: now as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .unwrap()
}

#[tokio::test]
async fn valid_bearer_token_resolves_id_and_role() {
    let config = AppConfig::default();
    let token = token(&config, "teacher_42", school_portal::access::Role::Teacher, 3600);

    let response = app(config)
        .oneshot(
            Request::builder()
                .uri("/whoami")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"teacher_42:teacher");
}

#[tokio::test]
async fn missing_authorization_header_is_rejected() {
    let response = app(AppConfig::default())
        .oneshot(Request::builder().uri("/whoami").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let config = AppConfig::default();
    // Past the default leeway.
    let token = token(&config, "teacher_42", school_portal::access::Role::Teacher, -3600);

    let response = app(config)
        .oneshot(
            Request::builder()
                .uri("/whoami")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_signed_with_another_secret_is_rejected() {
    let config = AppConfig::default();
    let forged = AppConfig {
        jwt_secret: "some-other-secret".to_string(),
        ..AppConfig::default()
    };
    let token = token(&forged, "admin_1", school_portal::access::Role::Admin, 3600);

    let response = app(config)
        .oneshot(
            Request::builder()
                .uri("/whoami")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn local_header_bypass_resolves_without_a_token() {
    let response = app(AppConfig::default())
        .oneshot(
            Request::builder()
                .uri("/whoami")
                .header("x-user-id", "student_7")
                .header("x-user-role", "student")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"student_7:student");
}

#[tokio::test]
async fn bypass_with_unknown_role_falls_through_to_token_auth() {
    let response = app(AppConfig::default())
        .oneshot(
            Request::builder()
                .uri("/whoami")
                .header("x-user-id", "student_7")
                .header("x-user-role", "superuser")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn header_bypass_is_inert_in_production() {
    let config = AppConfig {
        env: Env::Production,
        ..AppConfig::default()
    };

    let response = app(config)
        .oneshot(
            Request::builder()
                .uri("/whoami")
                .header("x-user-id", "student_7")
                .header("x-user-role", "student")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
