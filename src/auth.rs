use axum::http::header::USER_AGENT;
use axum::http::HeaderMap;
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::err::Error;
use crate::{breaks, proceeds, Payload, RefStr};

const UPSERT_STUDENT: &str = "\
    INSERT INTO students (name, student_id, email, updated_at) \
    VALUES ($1, $2, $3, CURRENT_TIMESTAMP) \
    ON CONFLICT (student_id) DO UPDATE SET \
        name = EXCLUDED.name, \
        email = EXCLUDED.email, \
        updated_at = CURRENT_TIMESTAMP";

const INSERT_SESSION: &str = "\
    INSERT INTO login_sessions (student_id, name, email, ip_address, user_agent) \
    VALUES ($1, $2, $3, $4, $5) \
    RETURNING id, login_time";

/// `POST /login`. Upserts the student identity keyed on `studentId`, then
/// appends one `login_sessions` row, both inside a single transaction so a
/// failed session insert does not leave a freshly created identity behind.
pub async fn login_student(
    headers: HeaderMap,
    Extension(pg): Extension<PgPool>,
    Json(login): Json<LoginRequest>,
) -> Payload<LoggedIn> {
    if login.user_type.as_deref() != Some("student") {
        return breaks(Error::InvalidUserType {
            message: "Invalid user type".to_string(),
        });
    }
    let submission = match validate_student_login(&login) {
        Ok(submission) => submission,
        Err(err) => return breaks(err),
    };

    let ip_address = client_ip(&headers);
    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|ua| ua.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let mut tx = pg.begin().await.map_err(Error::from)?;
    sqlx::query(UPSERT_STUDENT)
        .bind(&submission.name)
        .bind(&submission.student_id)
        .bind(&submission.email)
        .execute(&mut tx)
        .await
        .map_err(Error::from)?;

    let (session_id, login_time): (i64, DateTime<Utc>) = sqlx::query_as(INSERT_SESSION)
        .bind(&submission.student_id)
        .bind(&submission.name)
        .bind(&submission.email)
        .bind(&ip_address)
        .bind(&user_agent)
        .fetch_one(&mut tx)
        .await
        .map_err(Error::from)?;
    tx.commit().await.map_err(Error::from)?;

    log::info!(
        "student {} logged in from {} (session {})",
        submission.student_id,
        ip_address,
        session_id
    );

    proceeds(LoggedIn {
        user_data: SessionDescriptor {
            name: submission.name,
            student_id: submission.student_id,
            email: submission.email,
            user_type: "student",
            login_time,
            session_id,
            is_admin: false,
        },
        message: "Login successful",
    })
}

/// Checks the required fields and the email shape, and returns the
/// normalized submission: `name` and `studentId` trimmed, `email` trimmed
/// and lowercased.
fn validate_student_login(login: &LoginRequest) -> Result<Submission, Error> {
    let name = login.name.as_deref().unwrap_or("").trim();
    let student_id = login.student_id.as_deref().unwrap_or("").trim();
    let email = login.email.as_deref().unwrap_or("").trim();

    if name.is_empty() || student_id.is_empty() || email.is_empty() {
        return Err(Error::invalid_payload(
            "Name, Student ID, and Email are required for student login",
        ));
    }
    if !valid_email(email) {
        return Err(Error::invalid_payload("Please enter a valid email address"));
    }

    Ok(Submission {
        name: name.to_string(),
        student_id: student_id.to_string(),
        email: email.to_lowercase(),
    })
}

/// `local@domain.tld`: no whitespace, exactly one `@`, a non-empty local
/// part, and a dot somewhere inside the domain part.
fn valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        _ => false,
    }
}

/// First entry of `x-forwarded-for`, then `x-real-ip`, then `"unknown"`.
fn client_ip(headers: &HeaderMap) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }
    headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

struct Submission {
    name: String,
    student_id: String,
    email: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub name: Option<String>,
    pub student_id: Option<String>,
    pub email: Option<String>,
    pub user_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedIn {
    pub user_data: SessionDescriptor,
    pub message: RefStr,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDescriptor {
    pub name: String,
    pub student_id: String,
    pub email: String,
    pub user_type: RefStr,
    pub login_time: DateTime<Utc>,
    pub session_id: i64,
    pub is_admin: bool,
}
