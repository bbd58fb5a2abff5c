use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::links::LinkError;

/// Boundary error payload: `{"error": {"code", "message", "details"}}`.
/// Codes are stable contract; messages are advisory.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiError {
    pub error: ApiErrorBody,
    #[serde(skip)]
    pub status: StatusCode,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &str, message: String) -> Self {
        Self {
            error: ApiErrorBody {
                code: code.to_string(),
                message,
                details: None,
            },
            status,
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED",
            "missing or invalid credentials".into(),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

impl From<LinkError> for ApiError {
    fn from(err: LinkError) -> Self {
        let status = match &err {
            LinkError::ProfileNotFound | LinkError::LinkNotFound => StatusCode::NOT_FOUND,
            LinkError::InvalidLink(_)
            | LinkError::InvalidLinks(_)
            | LinkError::TooManyLinks { .. }
            | LinkError::NoUpdates => StatusCode::UNPROCESSABLE_ENTITY,
            LinkError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let LinkError::Database(source) = &err {
            tracing::error!(error = ?source, "link_storage_failed");
        }
        Self {
            error: ApiErrorBody {
                code: err.code().to_string(),
                message: err.to_string(),
                details: err.details(),
            },
            status,
        }
    }
}

impl From<StatusCode> for ApiError {
    fn from(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => Self::unauthorized(),
            other => Self::new(other, "ERROR", other.to_string()),
        }
    }
}
