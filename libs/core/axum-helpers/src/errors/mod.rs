pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Standard error response structure.
///
/// Returned for every error response:
/// - `code`: integer error code for logging/monitoring (e.g. 1004)
/// - `error`: machine-readable identifier (e.g. "NOT_FOUND")
/// - `message`: human-readable message
/// - `details`: optional structured details, omitted when empty
///
/// # JSON Example
///
/// ```json
/// {
///   "code": 1008,
///   "error": "DUPLICATE",
///   "message": "event already exists"
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured error details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application error type that converts into a JSON HTTP response.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Query extraction error: {0}")]
    QueryExtractorRejection(#[from] QueryRejection),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// Store failure. The detail is logged by the domain that raised it and
    /// never sent to the client.
    #[error("Database error: {0}")]
    Database(String),
}

impl AppError {
    /// HTTP status this error renders with
    pub fn status(&self) -> StatusCode {
        match self {
            Self::JsonExtractorRejection(_)
            | Self::QueryExtractorRejection(_)
            | Self::Validation(_)
            | Self::Duplicate(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Error code reported in the response body
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::JsonExtractorRejection(_) => ErrorCode::InvalidJson,
            Self::QueryExtractorRejection(_) => ErrorCode::BadRequest,
            Self::Validation(_) => ErrorCode::ValidationError,
            Self::Duplicate(_) => ErrorCode::Duplicate,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::MethodNotAllowed => ErrorCode::MethodNotAllowed,
            Self::Database(_) => ErrorCode::DatabaseError,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.error_code();

        let message = match self {
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(error_code = code.code(), "JSON extraction error: {:?}", e);
                e.body_text()
            }
            AppError::QueryExtractorRejection(e) => {
                tracing::warn!(error_code = code.code(), "Query extraction error: {:?}", e);
                e.body_text()
            }
            AppError::Validation(msg) => {
                tracing::info!(error_code = code.code(), "Validation error: {}", msg);
                msg
            }
            AppError::Duplicate(msg) => {
                tracing::info!(error_code = code.code(), "Duplicate: {}", msg);
                msg
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = code.code(), "Not found: {}", msg);
                msg
            }
            AppError::MethodNotAllowed | AppError::Database(_) => {
                code.default_message().to_string()
            }
        };

        error_response(status, message, code)
    }
}

/// Build an error response from its parts.
///
/// # Example
///
/// ```rust,ignore
/// use axum_helpers::errors::{error_response, ErrorCode};
/// use axum::http::StatusCode;
///
/// let response = error_response(
///     StatusCode::NOT_FOUND,
///     "The requested resource was not found".to_string(),
///     ErrorCode::NotFound,
/// );
/// ```
pub fn error_response(status: StatusCode, message: String, error_code: ErrorCode) -> Response {
    let body = Json(ErrorResponse {
        code: error_code.code(),
        error: error_code.as_str().to_string(),
        message,
        details: None,
    });

    (status, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    async fn body_of(response: Response) -> ErrorResponse {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_renders_bad_request() {
        let response = AppError::Duplicate("duplicate request".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_of(response).await;
        assert_eq!(body.error, "DUPLICATE");
        assert_eq!(body.code, 1008);
        assert_eq!(body.message, "duplicate request");
        assert!(body.details.is_none());
    }

    #[tokio::test]
    async fn test_not_found_renders_404() {
        let response = AppError::NotFound("Event not found: abc".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_of(response).await.error, "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_database_error_hides_detail() {
        let response =
            AppError::Database("connection reset by peer at 10.0.0.7".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_of(response).await;
        assert_eq!(body.error, "DATABASE_ERROR");
        assert_eq!(body.message, "Database error occurred");
        assert!(!body.message.contains("10.0.0.7"));
    }

    #[test]
    fn test_database_error_is_not_logged_again_at_error_level() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let _ = AppError::Database("connection reset".into()).into_response();
        });

        assert!(!logs.contents().contains("ERROR"));
    }

    #[test]
    fn test_method_not_allowed_status() {
        assert_eq!(
            AppError::MethodNotAllowed.status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            AppError::MethodNotAllowed.error_code(),
            ErrorCode::MethodNotAllowed
        );
    }
}
