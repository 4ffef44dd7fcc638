//! In-memory implementation of EventRepository

use crate::error::Result;
use crate::models::{Event, EventFields, EventQuery, NewEvent};
use crate::repository::EventRepository;
use async_trait::async_trait;
use chrono::{DateTime, Duration, SubsecRound, Utc};
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::instrument;
use uuid::Uuid;

/// Process-local event store.
///
/// Ids are UUIDv7, so iteration order follows creation order. Timestamps keep
/// millisecond precision to match the MongoDB store.
#[derive(Default)]
pub struct InMemoryEventRepository {
    events: RwLock<BTreeMap<String, Event>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    #[instrument(skip(self, event), fields(title = %event.fields.title))]
    async fn insert(&self, event: NewEvent) -> Result<Event> {
        let fields = event.fields;
        let stored = Event {
            id: Uuid::now_v7().to_string(),
            title: fields.title,
            description: fields.description,
            date: fields.date,
            location: fields.location,
            organizer: fields.organizer,
            event_type: fields.event_type,
            request_id: event.request_id,
            updated_at: now(),
        };

        self.events
            .write()
            .await
            .insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &str) -> Result<Option<Event>> {
        Ok(self.events.read().await.get(id).cloned())
    }

    #[instrument(skip(self, query))]
    async fn find(&self, query: &EventQuery) -> Result<Vec<Event>> {
        Ok(self
            .events
            .read()
            .await
            .values()
            .filter(|event| query.matches(event))
            .cloned()
            .collect())
    }

    #[instrument(skip(self))]
    async fn exists_by_request_id(&self, request_id: &str) -> Result<bool> {
        Ok(self
            .events
            .read()
            .await
            .values()
            .any(|event| event.request_id.as_deref() == Some(request_id)))
    }

    #[instrument(skip(self))]
    async fn exists_by_title_and_date(&self, title: &str, date: DateTime<Utc>) -> Result<bool> {
        Ok(self
            .events
            .read()
            .await
            .values()
            .any(|event| event.title == title && event.date == date))
    }

    #[instrument(skip(self, fields))]
    async fn update(&self, id: &str, fields: EventFields) -> Result<Option<Event>> {
        let mut events = self.events.write().await;
        let Some(event) = events.get_mut(id) else {
            return Ok(None);
        };

        event.title = fields.title;
        event.description = fields.description;
        event.date = fields.date;
        event.location = fields.location;
        event.organizer = fields.organizer;
        event.event_type = fields.event_type;
        event.updated_at = now().max(event.updated_at + Duration::milliseconds(1));

        Ok(Some(event.clone()))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.events.write().await.remove(id).is_some())
    }
}
