//! Response envelope and error mapping.
//!
//! Every response body has the shape `{"code": 1000, "data": ...}` on
//! success or `{"code": 4xxx, "error": "..."}` on failure.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::blockchain::types::{BlockchainError, ErrorKind, SUCCESS_CODE};

#[derive(Serialize)]
struct SuccessBody<T> {
    code: u16,
    data: T,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: u16,
    error: &'a str,
}

/// Successful result wrapped in the envelope.
#[derive(Debug, Clone)]
pub struct ApiResponse<T>(pub T);

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = SuccessBody {
            code: SUCCESS_CODE,
            data: self.0,
        };
        (StatusCode::OK, Json(body)).into_response()
    }
}

/// HTTP status for an error class.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorKind::InvalidParam => StatusCode::BAD_REQUEST,
        ErrorKind::Timeout => StatusCode::REQUEST_TIMEOUT,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Failure wrapped in the envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn invalid_param(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::InvalidParam,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        status_for(self.kind)
    }
}

impl From<BlockchainError> for ApiError {
    fn from(err: BlockchainError) -> Self {
        let kind = err.kind();
        // Internal details stay in the log.
        let message = match kind {
            ErrorKind::Internal | ErrorKind::Timeout => {
                tracing::error!(error = %err, code = kind.code(), "Request failed");
                kind.message().to_string()
            }
            _ => {
                tracing::warn!(error = %err, code = kind.code(), "Request rejected");
                err.to_string()
            }
        };
        Self { kind, message }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::invalid_param(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::invalid_param(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.kind.code(),
            error: &self.message,
        };
        (self.status(), Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;
