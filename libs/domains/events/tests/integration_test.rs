//! MongoDB repository tests (require Docker)

use chrono::{DateTime, Duration, TimeZone, Utc};
use domain_events::{
    DateRange, EventFields, EventPayload, EventQuery, EventRepository, EventService,
    MongoEventRepository, NewEvent,
};
use test_utils::{TestDataBuilder, TestMongo};

fn fields(title: &str, date: DateTime<Utc>, event_type: &str) -> EventFields {
    EventFields {
        title: title.to_string(),
        description: "An event".to_string(),
        date,
        location: "Berlin".to_string(),
        organizer: "ACME".to_string(),
        event_type: event_type.to_string(),
    }
}

async fn repository(mongo: &TestMongo, test_name: &str) -> MongoEventRepository {
    let data = TestDataBuilder::from_test_name(test_name);
    let repo = MongoEventRepository::new(&mongo.database(&data.name("db", "events")));
    repo.create_indexes().await.unwrap();
    repo
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_insert_assigns_object_id_and_server_timestamp() {
    let mongo = TestMongo::new().await;
    let repo = repository(&mongo, "insert_assigns").await;
    let date = Utc.with_ymd_and_hms(2024, 6, 1, 18, 0, 0).unwrap();
    let before = Utc::now() - Duration::seconds(5);

    let event = repo
        .insert(NewEvent {
            fields: fields("Launch", date, "Conference"),
            request_id: Some("req-1".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(event.id.len(), 24);
    assert_eq!(event.date, date);
    assert_eq!(event.request_id.as_deref(), Some("req-1"));
    assert!(event.updated_at > before);

    let fetched = repo.get_by_id(&event.id).await.unwrap();
    assert_eq!(fetched, Some(event));
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_exists_checks_and_unknown_ids() {
    let mongo = TestMongo::new().await;
    let repo = repository(&mongo, "exists_checks").await;
    let date = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

    repo.insert(NewEvent {
        fields: fields("Launch", date, "Conference"),
        request_id: Some("req-1".to_string()),
    })
    .await
    .unwrap();

    assert!(repo.exists_by_request_id("req-1").await.unwrap());
    assert!(!repo.exists_by_request_id("req-2").await.unwrap());
    assert!(repo.exists_by_title_and_date("Launch", date).await.unwrap());
    assert!(
        !repo
            .exists_by_title_and_date("Launch", date + Duration::milliseconds(1))
            .await
            .unwrap()
    );

    assert_eq!(repo.get_by_id("nonexistent-id").await.unwrap(), None);
    assert_eq!(
        repo.get_by_id("665f1c2e9b1e8a3d4c5b6a79").await.unwrap(),
        None
    );
    assert!(!repo.delete("nonexistent-id").await.unwrap());
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_update_advances_updated_at_and_keeps_literals() {
    let mongo = TestMongo::new().await;
    let repo = repository(&mongo, "update_advances").await;
    let date = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

    let created = repo
        .insert(NewEvent {
            fields: fields("Launch", date, "Conference"),
            request_id: Some("req-1".to_string()),
        })
        .await
        .unwrap();

    let mut replacement = fields("$title", date + Duration::days(1), "Workshop");
    replacement.location = "$$NOW".to_string();

    let first = repo
        .update(&created.id, replacement.clone())
        .await
        .unwrap()
        .unwrap();
    let second = repo.update(&created.id, replacement).await.unwrap().unwrap();

    assert_eq!(first.id, created.id);
    assert_eq!(first.title, "$title");
    assert_eq!(first.location, "$$NOW");
    assert_eq!(first.event_type, "Workshop");
    assert_eq!(first.request_id.as_deref(), Some("req-1"));
    assert!(first.updated_at > created.updated_at);
    assert!(second.updated_at > first.updated_at);

    let missing = repo
        .update("665f1c2e9b1e8a3d4c5b6a79", fields("x", date, "y"))
        .await
        .unwrap();
    assert_eq!(missing, None);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_find_by_type_and_range() {
    let mongo = TestMongo::new().await;
    let repo = repository(&mongo, "find_by_type_and_range").await;
    let june = |day| Utc.with_ymd_and_hms(2024, 6, day, 0, 0, 0).unwrap();

    let a = repo
        .insert(NewEvent {
            fields: fields("A", june(1), "Workshop"),
            request_id: None,
        })
        .await
        .unwrap();
    let b = repo
        .insert(NewEvent {
            fields: fields("B", june(15), "Concert"),
            request_id: None,
        })
        .await
        .unwrap();
    repo.insert(NewEvent {
        fields: fields("C", june(30), "Concert"),
        request_id: None,
    })
    .await
    .unwrap();

    let all = repo.find(&EventQuery::default()).await.unwrap();
    assert_eq!(all.len(), 3);

    let concerts = repo
        .find(&EventQuery {
            event_type: Some("Concert".to_string()),
            date_range: None,
        })
        .await
        .unwrap();
    assert_eq!(concerts.len(), 2);

    let ranged = repo
        .find(&EventQuery {
            event_type: None,
            date_range: Some(DateRange {
                start: june(1),
                end: june(15),
            }),
        })
        .await
        .unwrap();
    let ids: Vec<_> = ranged.iter().map(|e| e.id.clone()).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&a.id));
    assert!(ids.contains(&b.id));
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_service_rejects_duplicate_against_mongo() {
    let mongo = TestMongo::new().await;
    let service = EventService::new(repository(&mongo, "service_duplicate").await);

    let payload = EventPayload {
        title: Some("Launch".into()),
        description: Some("Product launch".into()),
        date: Some("2024-06-01".into()),
        location: Some("Berlin".into()),
        organizer: Some("ACME".into()),
        event_type: Some("Conference".into()),
        request_id: None,
    };

    let created = service.create_event(payload.clone()).await.unwrap();
    let err = service.create_event(payload).await.unwrap_err();
    assert_eq!(err.to_string(), "event already exists");

    service.delete_event(&created.id).await.unwrap();
    assert!(service.get_event(&created.id).await.is_err());
    assert!(service.list_events().await.unwrap().is_empty());
}
