// file: src/server/error.rs
// description: http error type with json body conversion
// reference: {"error": {"code", "message"}} body shape

use crate::error::EngineError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Error type handlers return; converts into an HTTP response with a
/// structured JSON body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "bad_request".to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            code: "not_found".to_string(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "internal_error".to_string(),
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Validation(msg) => Self::bad_request(msg),
            EngineError::NotFound(msg) => Self::not_found(msg),
            EngineError::Ingest(msg) => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                code: "ingest_error".to_string(),
                message: msg,
            },
            EngineError::Http(e) => Self {
                status: StatusCode::BAD_GATEWAY,
                code: "upstream_error".to_string(),
                message: e.to_string(),
            },
            other => Self::internal(other.to_string()),
        }
    }
}
