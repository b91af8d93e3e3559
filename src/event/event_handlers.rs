use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, Result},
    middleware::CurrentUser,
    state::AppState,
};
use super::{
    event_dto::{CreateEventRequest, UpdateEventRequest},
    event_models::Event,
};

/// Create an event (admin only)
#[utoipa::path(
    post,
    path = "/api/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    tag = "events",
    security(("bearer_auth" = []))
)]
pub async fn create_event(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(payload): Json<CreateEventRequest>,
) -> Result<impl IntoResponse> {
    if !current_user.is_admin() {
        return Err(AppError::Forbidden("Only admins can create events".to_string()));
    }

    payload.validate()?;

    let event = state
        .event_repository
        .create(
            &payload.title,
            payload.description.as_deref(),
            payload.event_date,
            payload.start_time,
            payload.end_time,
            &payload.location,
            current_user.id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(event)))
}

/// List all events, soonest first
#[utoipa::path(
    get,
    path = "/api/events",
    responses(
        (status = 200, description = "List of events", body = Vec<Event>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "events",
    security(("bearer_auth" = []))
)]
pub async fn get_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>> {
    let events = state.event_repository.find_all().await?;

    Ok(Json(events))
}

/// Update an event (admin only)
#[utoipa::path(
    put,
    path = "/api/events/{id}",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Event not found")
    ),
    tag = "events",
    security(("bearer_auth" = []))
)]
pub async fn update_event(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(event_id): Path<Uuid>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<Json<Event>> {
    if !current_user.is_admin() {
        return Err(AppError::Forbidden("Only admins can edit events".to_string()));
    }

    payload.validate()?;

    let event = state
        .event_repository
        .update(
            event_id,
            payload.title.as_deref(),
            payload.description.as_deref(),
            payload.event_date,
            payload.start_time,
            payload.end_time,
            payload.location.as_deref(),
        )
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    Ok(Json(event))
}

/// Delete an event (admin only)
#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Event not found")
    ),
    tag = "events",
    security(("bearer_auth" = []))
)]
pub async fn delete_event(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(event_id): Path<Uuid>,
) -> Result<StatusCode> {
    if !current_user.is_admin() {
        return Err(AppError::Forbidden("Only admins can delete events".to_string()));
    }

    let rows_affected = state.event_repository.delete(event_id).await?;

    if rows_affected == 0 {
        return Err(AppError::NotFound("Event not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
