#![allow(non_snake_case)]

use crate::RefStr;

use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;

use serde::Serialize;

pub async fn handler404(path: Uri) -> Response {
    Error::NotFound {
        message: format!("Invalid path: {}", path),
    }
    .into_response()
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Maybe<T> {
    Nothing(Error),
    Fine(Success<T>),
}

pub fn Fine<V>(v: V) -> Maybe<V>
where
    V: Serialize,
{
    Maybe::Fine(Success::of(v))
}

pub fn Nothing<V>(err: Error) -> Maybe<V> {
    Maybe::Nothing(err)
}

#[derive(Debug, Clone, Serialize)]
pub struct Success<V> {
    success: bool,
    #[serde(flatten)]
    value: V,
}

/// Wire shape for the failure branch: `{"success": false, "error": ..., "message": ...}`.
#[derive(Debug, Clone, Serialize)]
pub struct Failure {
    success: bool,
    #[serde(flatten)]
    error: Error,
}

impl Failure {
    pub fn of(error: Error) -> Self {
        Self {
            success: false,
            error,
        }
    }
}

impl<T> IntoResponse for Maybe<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        match self {
            Maybe::Nothing(err) => err.into_response(),
            Maybe::Fine(success) => Json::into_response(Json(success)),
        }
    }
}

impl<V: Serialize> Success<V> {
    pub fn of(value: V) -> Self {
        Self {
            success: true,
            value,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "error")]
pub enum Error {
    NotFound { message: String },
    InvalidPayload { message: String },
    InvalidUserType { message: String },
    EmailConflict { message: String },
    InternalError { kind: RefStr, message: String },
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    pub fn invalid_payload<S: Into<String>>(msg: S) -> Error {
        Error::InvalidPayload {
            message: msg.into(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (self.status(), Json(Failure::of(self))).into_response()
    }
}

/// Store failures collapse to a generic wire message; the detail only goes
/// to the server log. The one business-rule exception is a unique violation
/// on an email constraint, which surfaces as a distinct conflict.
impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if let Some(pg) = db.try_downcast_ref::<sqlx::postgres::PgDatabaseError>() {
                if pg.code() == "23505" && pg.constraint().map_or(false, |c| c.contains("email")) {
                    return Error::EmailConflict {
                        message: "This email is already registered with a different student ID"
                            .to_string(),
                    };
                }
            }
        }
        log::error!("database error: {:?}", err);
        Self::InternalError {
            kind: "DatabaseError",
            message: "A database error occurred".to_string(),
        }
    }
}
