use axum::Extension;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::err::Error;
use crate::models::SESSION_ACTIVE;
use crate::{proceeds, Payload, RefStr};

const COUNT_ACTIVE_SESSIONS: &str =
    "SELECT COUNT(*) FROM login_sessions WHERE session_status = $1";
const COUNT_STUDENTS: &str = "SELECT COUNT(*) FROM students";
const COUNT_TODAY_LOGINS: &str =
    "SELECT COUNT(*) FROM login_sessions WHERE DATE(login_time) = CURRENT_DATE";

/// `GET /stats`: the three dashboard counters, read concurrently. The reads
/// are independent, so the snapshot may straddle rows changing between
/// them; that inconsistency window is accepted.
pub async fn dashboard_stats(Extension(pg): Extension<PgPool>) -> Payload<StatsSnapshot> {
    let (active_session_count, total_student_count, today_login_count) = tokio::try_join!(
        sqlx::query_scalar::<_, i64>(COUNT_ACTIVE_SESSIONS)
            .bind(SESSION_ACTIVE)
            .fetch_one(&pg),
        sqlx::query_scalar::<_, i64>(COUNT_STUDENTS).fetch_one(&pg),
        sqlx::query_scalar::<_, i64>(COUNT_TODAY_LOGINS).fetch_one(&pg),
    )
    .map_err(Error::from)?;

    proceeds(StatsSnapshot {
        stats: DashboardStats {
            active_session_count,
            total_student_count,
            today_login_count,
            system_status: "online",
            last_updated: Utc::now(),
        },
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub stats: DashboardStats,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub active_session_count: i64,
    pub total_student_count: i64,
    pub today_login_count: i64,
    pub system_status: RefStr,
    pub last_updated: DateTime<Utc>,
}
