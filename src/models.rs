use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SESSION_ACTIVE: &str = "active";
pub const SESSION_LOGGED_OUT: &str = "logged_out";

/// A registered student identity. Upserted by `student_id` on every login,
/// never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub student_id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One login event. Append-only, except for the single
/// `active -> logged_out` status transition.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LoginSession {
    pub id: i64,
    pub student_id: String,
    pub name: String,
    pub email: String,
    pub login_time: DateTime<Utc>,
    pub logout_time: Option<DateTime<Utc>>,
    pub session_status: String,
    pub ip_address: String,
    pub user_agent: String,
}
