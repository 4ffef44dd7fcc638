//! Event repository trait

use crate::error::Result;
use crate::models::{Event, EventFields, EventQuery, NewEvent};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Storage operations for event records.
///
/// Identifiers the store cannot interpret are treated as unknown: lookups
/// return `None` and deletes return `false`, never an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Persist a new event; the store assigns `id` and `updatedAt`
    async fn insert(&self, event: NewEvent) -> Result<Event>;

    async fn get_by_id(&self, id: &str) -> Result<Option<Event>>;

    /// All events matching `query`, in store order
    async fn find(&self, query: &EventQuery) -> Result<Vec<Event>>;

    async fn exists_by_request_id(&self, request_id: &str) -> Result<bool>;

    /// Exact match on both title and date
    async fn exists_by_title_and_date(&self, title: &str, date: DateTime<Utc>) -> Result<bool>;

    /// Replace the mutable fields and advance `updatedAt`.
    ///
    /// Returns the post-update record, or `None` if no event has this id.
    async fn update(&self, id: &str, fields: EventFields) -> Result<Option<Event>>;

    /// Returns whether an event was removed
    async fn delete(&self, id: &str) -> Result<bool>;
}
