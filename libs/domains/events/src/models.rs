//! Event domain models

use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::error::{EventError, Result};

/// A stored event record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Store-assigned identifier
    pub id: String,
    pub title: String,
    pub description: String,
    /// When the event takes place
    pub date: DateTime<Utc>,
    pub location: String,
    pub organizer: String,
    /// Free-form category, e.g. "Concert" or "Workshop"
    pub event_type: String,
    /// Idempotency token supplied at creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Store-assigned; refreshed on every update
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating or replacing an event
///
/// Every field is optional at the JSON level so a missing field is reported
/// as a validation error rather than a deserialization failure. Unknown
/// fields, including `id` and `updatedAt`, are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    #[validate(required, custom(function = "not_blank"))]
    pub title: Option<String>,

    #[validate(required, custom(function = "not_blank"))]
    pub description: Option<String>,

    /// RFC 3339 date-time, `YYYY-MM-DDTHH:MM:SS[.fff]` (UTC) or `YYYY-MM-DD`
    #[validate(required, custom(function = "valid_event_date"))]
    #[schema(example = "2024-06-01T18:00:00Z")]
    pub date: Option<String>,

    #[validate(required, custom(function = "not_blank"))]
    pub location: Option<String>,

    #[validate(required, custom(function = "not_blank"))]
    pub organizer: Option<String>,

    #[validate(required, custom(function = "not_blank"))]
    pub event_type: Option<String>,

    /// Optional idempotency token; ignored on update
    pub request_id: Option<String>,
}

impl EventPayload {
    /// Validate and convert into store-ready fields plus the normalized request id
    pub fn into_new_event(self) -> Result<NewEvent> {
        self.validate()?;

        let request_id = self
            .request_id
            .clone()
            .filter(|id| !id.trim().is_empty());

        Ok(NewEvent {
            fields: self.into_fields()?,
            request_id,
        })
    }

    /// Validate and convert into store-ready fields, dropping any request id
    pub fn into_event_fields(self) -> Result<EventFields> {
        self.validate()?;
        self.into_fields()
    }

    fn into_fields(self) -> Result<EventFields> {
        let missing = || EventError::Validation("missing required fields".to_string());
        let raw_date = self.date.ok_or_else(missing)?;
        let date = parse_event_date(&raw_date).ok_or_else(|| invalid_date(&raw_date))?;

        Ok(EventFields {
            title: self.title.ok_or_else(missing)?,
            description: self.description.ok_or_else(missing)?,
            date,
            location: self.location.ok_or_else(missing)?,
            organizer: self.organizer.ok_or_else(missing)?,
            event_type: self.event_type.ok_or_else(missing)?,
        })
    }
}

/// Validated mutable fields of an event
#[derive(Debug, Clone, PartialEq)]
pub struct EventFields {
    pub title: String,
    pub description: String,
    /// Truncated to millisecond precision
    pub date: DateTime<Utc>,
    pub location: String,
    pub organizer: String,
    pub event_type: String,
}

/// Input to a store insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub fields: EventFields,
    pub request_id: Option<String>,
}

/// Inclusive range on `date`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn contains(&self, date: DateTime<Utc>) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Store query; the default (empty) query matches every event
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventQuery {
    /// Exact, case-sensitive match on `eventType`
    pub event_type: Option<String>,
    pub date_range: Option<DateRange>,
}

impl EventQuery {
    pub fn matches(&self, event: &Event) -> bool {
        self.event_type
            .as_ref()
            .is_none_or(|event_type| &event.event_type == event_type)
            && self
                .date_range
                .is_none_or(|range| range.contains(event.date))
    }
}

/// Query string of `GET /filterEvents`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParams {
    pub event_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl FilterParams {
    /// Build a store query.
    ///
    /// Empty parameters count as absent. A date range applies only when both
    /// `startDate` and `endDate` are given, but any supplied date must parse.
    pub fn into_query(self) -> Result<EventQuery> {
        let present = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let parse = |value: Option<String>| -> Result<Option<DateTime<Utc>>> {
            present(value)
                .map(|raw| parse_event_date(&raw).ok_or_else(|| invalid_date(&raw)))
                .transpose()
        };

        let start = parse(self.start_date)?;
        let end = parse(self.end_date)?;

        Ok(EventQuery {
            event_type: present(self.event_type),
            date_range: match (start, end) {
                (Some(start), Some(end)) => Some(DateRange { start, end }),
                _ => None,
            },
        })
    }
}

/// Body returned by a successful delete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub id: String,
    #[schema(example = "Event with ID 665f1c2e9b1e8a3d4c5b6a79 deleted")]
    pub message: String,
}

impl DeleteResponse {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            message: format!("Event with ID {} deleted", id),
            id,
        }
    }
}

/// Parse an event date.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.fff]` taken as UTC, or a bare
/// `YYYY-MM-DD` at midnight UTC. The result is truncated to milliseconds, the
/// precision the store keeps.
pub fn parse_event_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|day| day.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })?;

    Some(parsed.trunc_subsecs(3))
}

fn invalid_date(raw: &str) -> EventError {
    EventError::Validation(format!(
        "invalid date '{}': expected an ISO-8601 date or date-time",
        raw
    ))
}

fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn valid_event_date(value: &str) -> std::result::Result<(), ValidationError> {
    not_blank(value)?;
    if parse_event_date(value).is_none() {
        return Err(ValidationError::new("date"));
    }
    Ok(())
}
