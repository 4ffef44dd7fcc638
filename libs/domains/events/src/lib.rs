//! Events Domain
//!
//! CRUD over event records with duplicate-submission protection:
//! - creation rejects a reused `requestId` and an existing title+date pair
//! - the store assigns `id` and `updatedAt`; every update advances `updatedAt`
//! - filtering by exact `eventType` and an inclusive `date` range
//!
//! Storage sits behind [`EventRepository`], backed by MongoDB
//! ([`MongoEventRepository`]) or process memory ([`InMemoryEventRepository`]).

use utoipa::OpenApi;

mod error;
mod handlers;
mod memory;
mod models;
mod mongodb;
mod repository;
mod service;

pub use error::{DuplicateReason, EventError, Result};
pub use handlers::{EventsState, router};
pub use memory::InMemoryEventRepository;
pub use models::{
    DateRange, DeleteResponse, Event, EventFields, EventPayload, EventQuery, FilterParams,
    NewEvent, parse_event_date,
};
pub use mongodb::MongoEventRepository;
pub use repository::EventRepository;
pub use service::EventService;

/// OpenAPI documentation for the events API
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_events,
        handlers::create_event,
        handlers::get_event,
        handlers::update_event,
        handlers::delete_event,
        handlers::filter_events,
    ),
    components(
        schemas(Event, EventPayload, DeleteResponse),
        responses(
            axum_helpers::errors::responses::BadRequestValidationResponse,
            axum_helpers::errors::responses::NotFoundResponse,
            axum_helpers::errors::responses::InternalServerErrorResponse,
        )
    ),
    tags(
        (name = "events", description = "Event records")
    )
)]
pub struct ApiDoc;
