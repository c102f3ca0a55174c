/*
 * Responsibility
 * - App-wide AppError definition
 * - IntoResponse impl (HTTP status / JSON error body)
 * - Single place translating auth + repo failures into wire responses
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::AuthError;

/// Wire shape shared by every failure:
/// `{"success": false, "error": <status>, "message": <description>}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: u16,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("{resource} not found")]
    NotFound { resource: &'static str },
    #[error("unprocessable")]
    Unprocessable,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            // AuthError descriptions are fixed strings; nothing internal
            // leaks past them.
            AppError::Auth(err) => (err.status(), err.to_string()),
            AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "resource not found".to_owned()),
            AppError::Unprocessable => {
                (StatusCode::UNPROCESSABLE_ENTITY, "unprocessable".to_owned())
            }
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_owned(),
            ),
        };

        let body = ErrorBody {
            success: false,
            error: status.as_u16(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Db(_) => AppError::Internal,
        }
    }
}
