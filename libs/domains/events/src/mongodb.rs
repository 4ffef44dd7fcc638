//! MongoDB implementation of EventRepository

use crate::error::{EventError, Result};
use crate::models::{Event, EventFields, EventQuery, NewEvent};
use crate::repository::EventRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, Document, doc};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};
use tracing::instrument;

const COLLECTION: &str = "events";

/// Stored shape of an event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    title: String,
    description: String,
    date: bson::DateTime,
    location: String,
    organizer: String,
    event_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    request_id: Option<String>,
    updated_at: bson::DateTime,
}

impl TryFrom<EventDocument> for Event {
    type Error = EventError;

    fn try_from(doc: EventDocument) -> Result<Self> {
        Ok(Event {
            id: doc.id.to_hex(),
            title: doc.title,
            description: doc.description,
            date: from_bson_datetime(doc.date)?,
            location: doc.location,
            organizer: doc.organizer,
            event_type: doc.event_type,
            request_id: doc.request_id,
            updated_at: from_bson_datetime(doc.updated_at)?,
        })
    }
}

/// MongoDB-backed event repository
#[derive(Clone)]
pub struct MongoEventRepository {
    collection: Collection<EventDocument>,
}

impl MongoEventRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(COLLECTION),
        }
    }

    /// Create the lookup indexes used by duplicate checks and filtering
    pub async fn create_indexes(&self) -> Result<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "requestId": 1 })
                .options(
                    IndexOptions::builder()
                        .name("request_id_idx".to_string())
                        .sparse(true)
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "title": 1, "date": 1 })
                .options(
                    IndexOptions::builder()
                        .name("title_date_idx".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "eventType": 1, "date": 1 })
                .options(
                    IndexOptions::builder()
                        .name("event_type_date_idx".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "date": 1 })
                .options(IndexOptions::builder().name("date_idx".to_string()).build())
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!(collection = COLLECTION, "Event indexes ensured");
        Ok(())
    }

    fn build_filter(query: &EventQuery) -> Document {
        let mut filter = Document::new();

        if let Some(event_type) = &query.event_type {
            filter.insert("eventType", event_type);
        }

        if let Some(range) = &query.date_range {
            filter.insert(
                "date",
                doc! {
                    "$gte": to_bson_datetime(range.start),
                    "$lte": to_bson_datetime(range.end),
                },
            );
        }

        filter
    }
}

fn to_bson_datetime(dt: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(dt.timestamp_millis())
}

fn from_bson_datetime(dt: bson::DateTime) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(dt.timestamp_millis()).ok_or_else(|| {
        EventError::Store(format!(
            "stored date out of range: {} ms",
            dt.timestamp_millis()
        ))
    })
}

/// Ids that are not valid ObjectIds cannot name a stored event
fn parse_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}

#[async_trait]
impl EventRepository for MongoEventRepository {
    #[instrument(skip(self, event), fields(title = %event.fields.title))]
    async fn insert(&self, event: NewEvent) -> Result<Event> {
        let fields = event.fields;
        let mut on_insert = doc! {
            "title": fields.title,
            "description": fields.description,
            "date": to_bson_datetime(fields.date),
            "location": fields.location,
            "organizer": fields.organizer,
            "eventType": fields.event_type,
        };
        if let Some(request_id) = event.request_id {
            on_insert.insert("requestId", request_id);
        }

        // Upsert on a fresh id so the server clock stamps `updatedAt`
        let stored = self
            .collection
            .find_one_and_update(
                doc! { "_id": ObjectId::new() },
                doc! {
                    "$setOnInsert": on_insert,
                    "$currentDate": { "updatedAt": true },
                },
            )
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| EventError::Store("insert returned no document".to_string()))?;

        stored.try_into()
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &str) -> Result<Option<Event>> {
        let Some(oid) = parse_id(id) else {
            return Ok(None);
        };

        let found = self.collection.find_one(doc! { "_id": oid }).await?;
        found.map(Event::try_from).transpose()
    }

    #[instrument(skip(self, query))]
    async fn find(&self, query: &EventQuery) -> Result<Vec<Event>> {
        let cursor = self.collection.find(Self::build_filter(query)).await?;
        let docs: Vec<EventDocument> = cursor.try_collect().await?;
        docs.into_iter().map(Event::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn exists_by_request_id(&self, request_id: &str) -> Result<bool> {
        let count = self
            .collection
            .count_documents(doc! { "requestId": request_id })
            .limit(1)
            .await?;
        Ok(count > 0)
    }

    #[instrument(skip(self))]
    async fn exists_by_title_and_date(&self, title: &str, date: DateTime<Utc>) -> Result<bool> {
        let count = self
            .collection
            .count_documents(doc! { "title": title, "date": to_bson_datetime(date) })
            .limit(1)
            .await?;
        Ok(count > 0)
    }

    #[instrument(skip(self, fields))]
    async fn update(&self, id: &str, fields: EventFields) -> Result<Option<Event>> {
        let Some(oid) = parse_id(id) else {
            return Ok(None);
        };

        // Pipeline update: strings go through $literal so a leading '$' is not
        // read as a field path, and updatedAt always moves forward.
        let pipeline = vec![doc! {
            "$set": {
                "title": { "$literal": fields.title },
                "description": { "$literal": fields.description },
                "date": to_bson_datetime(fields.date),
                "location": { "$literal": fields.location },
                "organizer": { "$literal": fields.organizer },
                "eventType": { "$literal": fields.event_type },
                "updatedAt": { "$max": ["$$NOW", { "$add": ["$updatedAt", 1_i64] }] },
            }
        }];

        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": oid }, pipeline)
            .return_document(ReturnDocument::After)
            .await?;

        updated.map(Event::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<bool> {
        let Some(oid) = parse_id(id) else {
            return Ok(false);
        };

        let result = self.collection.delete_one(doc! { "_id": oid }).await?;
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DateRange;
    use chrono::TimeZone;

    #[test]
    fn test_parse_id_rejects_non_object_ids() {
        assert!(parse_id("nonexistent-id").is_none());
        assert!(parse_id("").is_none());
        assert!(parse_id("665f1c2e9b1e8a3d4c5b6a79").is_some());
    }

    #[test]
    fn test_build_filter_empty_query_matches_all() {
        assert!(MongoEventRepository::build_filter(&EventQuery::default()).is_empty());
    }

    #[test]
    fn test_build_filter_type_and_range() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap();
        let filter = MongoEventRepository::build_filter(&EventQuery {
            event_type: Some("Concert".into()),
            date_range: Some(DateRange { start, end }),
        });

        assert_eq!(filter.get_str("eventType").unwrap(), "Concert");
        let date = filter.get_document("date").unwrap();
        assert_eq!(
            date.get_datetime("$gte").unwrap().timestamp_millis(),
            start.timestamp_millis()
        );
        assert_eq!(
            date.get_datetime("$lte").unwrap().timestamp_millis(),
            end.timestamp_millis()
        );
    }

    #[test]
    fn test_document_to_event() {
        let oid = ObjectId::new();
        let date = Utc.with_ymd_and_hms(2024, 6, 1, 18, 0, 0).unwrap();
        let event = Event::try_from(document(oid, to_bson_datetime(date))).unwrap();

        assert_eq!(event.id, oid.to_hex());
        assert_eq!(event.date, date);
        assert_eq!(event.request_id, None);
    }

    #[test]
    fn test_out_of_range_stored_date_is_a_store_error() {
        let result = Event::try_from(document(ObjectId::new(), bson::DateTime::MAX));
        assert!(matches!(result, Err(EventError::Store(_))));
    }

    fn document(id: ObjectId, date: bson::DateTime) -> EventDocument {
        EventDocument {
            id,
            title: "t".into(),
            description: "d".into(),
            date,
            location: "l".into(),
            organizer: "o".into(),
            event_type: "Concert".into(),
            request_id: None,
            updated_at: date,
        }
    }
}
