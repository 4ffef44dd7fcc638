//! Event Service - validation, duplicate detection and store orchestration

use std::sync::Arc;

use observability::EventStoreMetrics;
use tracing::instrument;

use crate::error::{DuplicateReason, EventError, Result};
use crate::models::{Event, EventPayload, EventQuery, FilterParams};
use crate::repository::EventRepository;

/// Event operations over an injected repository
pub struct EventService<R: EventRepository> {
    repository: Arc<R>,
}

impl<R: EventRepository> EventService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create an event.
    ///
    /// The request-id and title+date checks run as separate reads before the
    /// insert. Two concurrent creates with the same title and date can both
    /// pass them.
    #[instrument(skip(self, payload), fields(title = ?payload.title))]
    pub async fn create_event(&self, payload: EventPayload) -> Result<Event> {
        let result = self.try_create(payload).await;
        if let Err(EventError::Duplicate(reason)) = &result {
            EventStoreMetrics::record_duplicate(reason.label());
        }
        observe("create", result)
    }

    async fn try_create(&self, payload: EventPayload) -> Result<Event> {
        let new_event = payload.into_new_event()?;

        if let Some(request_id) = &new_event.request_id {
            if self.repository.exists_by_request_id(request_id).await? {
                return Err(EventError::Duplicate(DuplicateReason::RequestId));
            }
        }

        if self
            .repository
            .exists_by_title_and_date(&new_event.fields.title, new_event.fields.date)
            .await?
        {
            return Err(EventError::Duplicate(DuplicateReason::TitleAndDate));
        }

        let event = self.repository.insert(new_event).await?;
        tracing::info!(event_id = %event.id, "Event created");
        Ok(event)
    }

    /// All events in store order
    #[instrument(skip(self))]
    pub async fn list_events(&self) -> Result<Vec<Event>> {
        observe("list", self.repository.find(&EventQuery::default()).await)
    }

    #[instrument(skip(self))]
    pub async fn get_event(&self, id: &str) -> Result<Event> {
        let result = self
            .repository
            .get_by_id(id)
            .await
            .and_then(|found| found.ok_or_else(|| EventError::NotFound(id.to_string())));
        observe("get", result)
    }

    /// Replace every mutable field of an event; `requestId` is left untouched
    #[instrument(skip(self, payload))]
    pub async fn update_event(&self, id: &str, payload: EventPayload) -> Result<Event> {
        let result = match payload.into_event_fields() {
            Ok(fields) => self
                .repository
                .update(id, fields)
                .await
                .and_then(|found| found.ok_or_else(|| EventError::NotFound(id.to_string()))),
            Err(e) => Err(e),
        };
        observe("update", result)
    }

    #[instrument(skip(self))]
    pub async fn delete_event(&self, id: &str) -> Result<()> {
        observe("delete", self.try_delete(id).await)
    }

    async fn try_delete(&self, id: &str) -> Result<()> {
        if self.repository.get_by_id(id).await?.is_none() {
            return Err(EventError::NotFound(id.to_string()));
        }

        // Another request may have removed it since the lookup
        if !self.repository.delete(id).await? {
            return Err(EventError::NotFound(id.to_string()));
        }

        tracing::info!(event_id = %id, "Event deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn filter_events(&self, params: FilterParams) -> Result<Vec<Event>> {
        let result = match params.into_query() {
            Ok(query) => self.repository.find(&query).await,
            Err(e) => Err(e),
        };
        observe("filter", result)
    }
}

fn observe<T>(operation: &'static str, result: Result<T>) -> Result<T> {
    let outcome = match &result {
        Ok(_) => "ok",
        Err(e) => e.outcome(),
    };
    EventStoreMetrics::record_operation(operation, outcome);

    if let Err(EventError::Store(detail)) = &result {
        tracing::error!(operation, "Event store failure: {}", detail);
    }
    result
}
