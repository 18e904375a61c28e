#![allow(dead_code)]

use axum::http::HeaderMap;
use axum::{Extension, Json};
use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;

use ug_portal_server::auth::{self, LoginRequest};
use ug_portal_server::err::Error;
use ug_portal_server::Payload;

/// Collapses a handler result into the JSON it would put on the wire.
/// Success and `breaks`-style failures arrive through `Maybe`; store
/// failures arrive through the `Err` branch.
pub fn payload_json<T: Serialize>(payload: Payload<T>) -> Value {
    match payload {
        Ok(maybe) => serde_json::to_value(&maybe).expect("payload must serialize"),
        Err(err) => serde_json::to_value(&err).expect("error must serialize"),
    }
}

pub fn student_login(name: &str, student_id: &str, email: &str) -> LoginRequest {
    LoginRequest {
        name: Some(name.to_string()),
        student_id: Some(student_id.to_string()),
        email: Some(email.to_string()),
        user_type: Some("student".to_string()),
    }
}

/// Drives the login handler directly, without HTTP plumbing.
pub async fn login(pool: &PgPool, request: LoginRequest) -> Payload<auth::LoggedIn> {
    auth::login_student(HeaderMap::new(), Extension(pool.clone()), Json(request)).await
}

pub async fn login_ok(pool: &PgPool, name: &str, student_id: &str, email: &str) -> Value {
    let json = payload_json(login(pool, student_login(name, student_id, email)).await);
    assert_eq!(json["success"], true, "login should succeed: {}", json);
    json
}

pub async fn end_session(pool: &PgPool, student_id: &str) -> Value {
    let request = ug_portal_server::sessions::EndSessionRequest {
        student_id: student_id.to_string(),
    };
    payload_json(ug_portal_server::sessions::end_session(Extension(pool.clone()), Json(request)).await)
}

pub async fn count(pool: &PgPool, sql: &str) -> i64 {
    sqlx::query_scalar(sql)
        .fetch_one(pool)
        .await
        .expect("count query must succeed")
}

pub async fn student_count(pool: &PgPool) -> i64 {
    count(pool, "SELECT COUNT(*) FROM students").await
}

pub async fn session_count(pool: &PgPool) -> i64 {
    count(pool, "SELECT COUNT(*) FROM login_sessions").await
}

pub fn assert_invalid_payload<T: Serialize + std::fmt::Debug>(payload: Payload<T>) {
    match payload {
        Ok(maybe) => {
            let json = serde_json::to_value(&maybe).unwrap();
            assert_eq!(json["error"], "InvalidPayload", "got: {}", json);
        }
        Err(err) => panic!("expected a breaks-style validation error, got {:?}", err),
    }
}

pub fn assert_email_conflict<T: Serialize + std::fmt::Debug>(payload: Payload<T>) {
    match payload {
        Err(Error::EmailConflict { message }) => {
            assert!(message.contains("different student ID"), "got: {}", message);
        }
        Err(err) => panic!("expected an email conflict, got {:?}", err),
        Ok(maybe) => panic!(
            "expected an email conflict, got {}",
            serde_json::to_value(&maybe).unwrap()
        ),
    }
}
