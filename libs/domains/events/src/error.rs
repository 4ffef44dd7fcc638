use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use strum::Display;
use thiserror::Error;
use validator::ValidationErrors;

/// Why a creation was rejected as a duplicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DuplicateReason {
    /// Another event already carries the supplied `requestId`
    #[strum(to_string = "duplicate request")]
    RequestId,
    /// Another event already has the same title and date
    #[strum(to_string = "event already exists")]
    TitleAndDate,
}

impl DuplicateReason {
    /// Label used on the duplicates counter
    pub fn label(&self) -> &'static str {
        match self {
            Self::RequestId => "request_id",
            Self::TitleAndDate => "title_date",
        }
    }
}

#[derive(Debug, Error)]
pub enum EventError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Duplicate(DuplicateReason),

    #[error("Event not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl EventError {
    /// Outcome label used on the operations counter
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Duplicate(_) => "duplicate",
            Self::NotFound(_) => "not_found",
            Self::Store(_) => "store_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, EventError>;

impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::Validation(msg) => AppError::Validation(msg),
            EventError::Duplicate(reason) => AppError::Duplicate(reason.to_string()),
            EventError::NotFound(id) => AppError::NotFound(format!("Event not found: {}", id)),
            EventError::Store(detail) => AppError::Database(detail),
        }
    }
}

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for EventError {
    fn from(err: mongodb::error::Error) -> Self {
        EventError::Store(err.to_string())
    }
}

/// Collapse field errors into one message.
///
/// Missing or blank fields are listed together by their JSON names; an
/// unparseable date is reported on its own.
impl From<ValidationErrors> for EventError {
    fn from(errors: ValidationErrors) -> Self {
        let mut missing = Vec::new();
        let mut invalid_date = false;

        for (field, field_errors) in errors.field_errors() {
            for error in field_errors.iter() {
                match error.code.as_ref() {
                    "date" => invalid_date = true,
                    _ => missing.push(json_field_name(&field.to_string())),
                }
            }
        }

        if !missing.is_empty() {
            missing.sort();
            missing.dedup();
            return EventError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            ));
        }

        if invalid_date {
            return EventError::Validation(
                "invalid date: expected an ISO-8601 date or date-time".to_string(),
            );
        }

        EventError::Validation(errors.to_string())
    }
}

fn json_field_name(field: &str) -> String {
    let mut name = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            name.extend(c.to_uppercase());
            upper_next = false;
        } else {
            name.push(c);
        }
    }
    name
}
