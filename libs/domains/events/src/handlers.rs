//! HTTP handlers for events API

use crate::error::EventError;
use crate::models::{DeleteResponse, Event, EventPayload, FilterParams};
use crate::repository::EventRepository;
use crate::service::EventService;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use axum_helpers::errors::responses::{
    BadRequestValidationResponse, InternalServerErrorResponse, NotFoundResponse,
};
use axum_helpers::{JsonBody, QueryParams};
use std::sync::Arc;

/// Events router state
pub type EventsState<R> = Arc<EventService<R>>;

/// Event routes mounted at the root, with the service as state.
///
/// The camelCase paths (`/createEvent`, `/getAllEvents`, ...) are kept as
/// aliases of the resource routes for existing clients.
pub fn router<R: EventRepository + 'static>(service: EventService<R>) -> Router {
    let state: EventsState<R> = Arc::new(service);

    Router::new()
        .route("/events", get(list_events::<R>).post(create_event::<R>))
        .route(
            "/events/{id}",
            get(get_event::<R>)
                .put(update_event::<R>)
                .delete(delete_event::<R>),
        )
        .route("/filterEvents", get(filter_events::<R>))
        .route("/createEvent", post(create_event::<R>))
        .route("/getAllEvents", get(list_events::<R>))
        .route("/getEventById/{id}", get(get_event::<R>))
        .route("/updateEvent/{id}", put(update_event::<R>))
        .route("/deleteEvent/{id}", delete(delete_event::<R>))
        .with_state(state)
}

/// List all events
#[utoipa::path(
    get,
    path = "/events",
    tag = "events",
    responses(
        (status = 200, description = "All events, possibly empty", body = Vec<Event>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn list_events<R: EventRepository>(
    State(service): State<EventsState<R>>,
) -> Result<Json<Vec<Event>>, EventError> {
    Ok(Json(service.list_events().await?))
}

/// Create an event
#[utoipa::path(
    post,
    path = "/events",
    tag = "events",
    request_body = EventPayload,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn create_event<R: EventRepository>(
    State(service): State<EventsState<R>>,
    JsonBody(payload): JsonBody<EventPayload>,
) -> Result<impl IntoResponse, EventError> {
    let event = service.create_event(payload).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// Get an event by id
#[utoipa::path(
    get,
    path = "/events/{id}",
    tag = "events",
    params(
        ("id" = String, Path, description = "Event id")
    ),
    responses(
        (status = 200, description = "Event found", body = Event),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn get_event<R: EventRepository>(
    State(service): State<EventsState<R>>,
    Path(id): Path<String>,
) -> Result<Json<Event>, EventError> {
    Ok(Json(service.get_event(&id).await?))
}

/// Replace all fields of an event
#[utoipa::path(
    put,
    path = "/events/{id}",
    tag = "events",
    params(
        ("id" = String, Path, description = "Event id")
    ),
    request_body = EventPayload,
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn update_event<R: EventRepository>(
    State(service): State<EventsState<R>>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<EventPayload>,
) -> Result<Json<Event>, EventError> {
    Ok(Json(service.update_event(&id, payload).await?))
}

/// Delete an event
#[utoipa::path(
    delete,
    path = "/events/{id}",
    tag = "events",
    params(
        ("id" = String, Path, description = "Event id")
    ),
    responses(
        (status = 200, description = "Event deleted", body = DeleteResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn delete_event<R: EventRepository>(
    State(service): State<EventsState<R>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, EventError> {
    service.delete_event(&id).await?;
    Ok(Json(DeleteResponse::new(id)))
}

/// Filter events by type and date range
#[utoipa::path(
    get,
    path = "/filterEvents",
    tag = "events",
    params(
        ("eventType" = Option<String>, Query, description = "Exact, case-sensitive event type"),
        ("startDate" = Option<String>, Query, description = "Inclusive lower bound; applied only together with endDate"),
        ("endDate" = Option<String>, Query, description = "Inclusive upper bound; applied only together with startDate"),
    ),
    responses(
        (status = 200, description = "Matching events", body = Vec<Event>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn filter_events<R: EventRepository>(
    State(service): State<EventsState<R>>,
    QueryParams(params): QueryParams<FilterParams>,
) -> Result<Json<Vec<Event>>, EventError> {
    Ok(Json(service.filter_events(params).await?))
}
