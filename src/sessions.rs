use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::err::Error;
use crate::models::{SESSION_ACTIVE, SESSION_LOGGED_OUT};
use crate::{proceeds, Payload, RefStr};

/// Hard cap on the admin dashboard listing; there is no pagination beyond it.
const ACTIVE_SESSION_LIMIT: i64 = 100;

const LIST_ACTIVE: &str = "\
    SELECT \
        ls.id, ls.name, ls.student_id, ls.email, ls.login_time, \
        ls.session_status, ls.ip_address, \
        s.created_at AS registered_at \
    FROM login_sessions ls \
    LEFT JOIN students s ON ls.student_id = s.student_id \
    WHERE ls.session_status = $1 \
    ORDER BY ls.login_time DESC \
    LIMIT $2";

const END_SESSIONS: &str = "\
    UPDATE login_sessions \
    SET session_status = $1, logout_time = CURRENT_TIMESTAMP \
    WHERE student_id = $2 AND session_status = $3";

/// `GET /sessions/active`: every active session, newest login first, joined
/// with the identity's registration time.
pub async fn list_active(Extension(pg): Extension<PgPool>) -> Payload<ActiveStudents> {
    let students = sqlx::query_as::<_, ActiveStudent>(LIST_ACTIVE)
        .bind(SESSION_ACTIVE)
        .bind(ACTIVE_SESSION_LIMIT)
        .fetch_all(&pg)
        .await
        .map_err(Error::from)?;

    let total = students.len();
    proceeds(ActiveStudents { students, total })
}

/// `DELETE /sessions/active`: flips every active session for the identifier
/// to `logged_out` and stamps the logout time. Best-effort and idempotent;
/// zero matching rows still reports success.
pub async fn end_session(
    Extension(pg): Extension<PgPool>,
    Json(request): Json<EndSessionRequest>,
) -> Payload<SessionEnded> {
    let affected = sqlx::query(END_SESSIONS)
        .bind(SESSION_LOGGED_OUT)
        .bind(request.student_id.trim())
        .bind(SESSION_ACTIVE)
        .execute(&pg)
        .await
        .map_err(Error::from)?;

    log::info!(
        "ended {} active session(s) for student {}",
        affected.rows_affected(),
        request.student_id.trim()
    );

    proceeds(SessionEnded {
        message: "Student session ended successfully",
    })
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ActiveStudent {
    pub id: i64,
    pub name: String,
    pub student_id: String,
    pub email: String,
    pub login_time: DateTime<Utc>,
    #[serde(rename = "status")]
    pub session_status: String,
    pub ip_address: String,
    pub registered_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActiveStudents {
    pub students: Vec<ActiveStudent>,
    pub total: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndSessionRequest {
    pub student_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionEnded {
    pub message: RefStr,
}
