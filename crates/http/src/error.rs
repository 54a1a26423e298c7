//! Request errors and the JSON envelope they render to.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum AppError {
    /// A request field failed validation.
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("not found: {0}")]
    NotFound(String),

    /// Locked admin surface or a passcode mismatch; `code` tells which.
    #[error("unauthorized: {message}")]
    Unauthorized { code: &'static str, message: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn unauthorized(code: &'static str, message: impl Into<String>) -> Self {
        Self::Unauthorized {
            code,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code for the envelope.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation_error",
            AppError::NotFound(_) => "not_found",
            AppError::Unauthorized { code, .. } => code,
            AppError::Internal(_) => "internal_error",
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
    details: Vec<FieldError>,
    trace_id: Uuid,
    timestamp: String,
}

#[derive(Debug, Serialize)]
struct FieldError {
    field: &'static str,
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let trace_id = Uuid::new_v4();
        let timestamp = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();

        if status.is_server_error() {
            tracing::error!(%trace_id, code, status = status.as_u16(), error = %format!("{self:#}"), "request failed");
        } else {
            tracing::warn!(%trace_id, code, status = status.as_u16(), "request rejected");
        }

        let (message, details) = match self {
            AppError::Validation { field, message } => {
                let details = vec![FieldError {
                    field,
                    error: message.clone(),
                }];
                (message, details)
            }
            AppError::NotFound(message) | AppError::Unauthorized { message, .. } => {
                (message, Vec::new())
            }
            // Release builds hide internal error details
            AppError::Internal(_) if cfg!(not(debug_assertions)) => {
                ("an internal error occurred".to_string(), Vec::new())
            }
            AppError::Internal(err) => (format!("{err:#}"), Vec::new()),
        };

        let envelope = ErrorEnvelope {
            error: ErrorBody {
                code,
                message,
                details,
                trace_id,
                timestamp,
            },
        };

        (status, Json(envelope)).into_response()
    }
}
