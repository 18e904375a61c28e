pub mod auth;
pub mod db;
pub mod diag;
pub mod err;
pub mod models;
pub mod sessions;
pub mod stats;

use axum::handler::Handler;
use axum::routing::get;
use axum::routing::post;
use axum::{Extension, Router};
use serde::Serialize;
use sqlx::PgPool;

use crate::err::{Error, Fine, Maybe, Nothing};

pub type RefStr = &'static str;
pub type Payload<T> = axum::response::Result<Maybe<T>, Error>;

pub fn proceeds<V>(value: V) -> Payload<V>
where
    V: Serialize,
{
    Ok(Fine(value))
}

pub fn breaks<V>(err: Error) -> Payload<V>
where
    V: Serialize,
{
    Ok(Nothing(err))
}

/// Builds the portal router around a shared Postgres pool. Kept separate
/// from `main` so the integration tests can drive the exact production
/// routing table.
pub fn app(pool: PgPool) -> Router {
    Router::new()
        .route("/login", post(auth::login_student))
        .route(
            "/sessions/active",
            get(sessions::list_active).delete(sessions::end_session),
        )
        .route("/stats", get(stats::dashboard_stats))
        .route("/diagnostics/db", get(diag::db_info))
        .fallback(err::handler404.into_service())
        .layer(Extension(pool))
}
