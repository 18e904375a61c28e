use axum::Extension;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::err::Error;
use crate::{proceeds, Payload, RefStr};

const SERVER_INFO: &str = "SELECT NOW(), version()";

const TABLE_COUNTS: &str = "\
    SELECT 'students' AS table_name, COUNT(*) AS row_count FROM students \
    UNION ALL \
    SELECT 'login_sessions' AS table_name, COUNT(*) AS row_count FROM login_sessions \
    UNION ALL \
    SELECT 'admins' AS table_name, COUNT(*) AS row_count FROM admins";

/// `GET /diagnostics/db`: connectivity probe plus per-table row counts.
/// This is the only place the `admins` table is read; the login flow never
/// touches it.
pub async fn db_info(Extension(pg): Extension<PgPool>) -> Payload<DbInfo> {
    let (current_time, postgres_version): (DateTime<Utc>, String) =
        sqlx::query_as(SERVER_INFO)
            .fetch_one(&pg)
            .await
            .map_err(Error::from)?;

    let table_counts = sqlx::query_as::<_, TableCount>(TABLE_COUNTS)
        .fetch_all(&pg)
        .await
        .map_err(Error::from)?;

    proceeds(DbInfo {
        message: "Database connection successful!",
        current_time,
        postgres_version,
        table_counts,
    })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DbInfo {
    pub message: RefStr,
    pub current_time: DateTime<Utc>,
    pub postgres_version: String,
    pub table_counts: Vec<TableCount>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TableCount {
    pub table_name: String,
    pub row_count: i64,
}
