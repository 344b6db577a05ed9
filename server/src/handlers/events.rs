use axum::{
    extract::{Path, State},
    response::Response,
    Extension,
};

use crate::auth::AuthUser;
use crate::handlers::extract::ValidatedJson;
use crate::models::CreateEventRequest;
use crate::services::events as event_service;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

/// `GET /allEvents`
pub async fn list_events(State(state): State<AppState>) -> Result<Response, AppError> {
    let events = event_service::list_events(state.store.as_ref()).await?;
    Ok(success(events, "Events retrieved successfully"))
}

/// `PUT /addEvent/:clubId`
pub async fn create_event(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(club_id): Path<String>,
    ValidatedJson(request): ValidatedJson<CreateEventRequest>,
) -> Result<Response, AppError> {
    let event = event_service::create_event(state.store.as_ref(), &caller, &club_id, request).await?;
    Ok(success(event, "Event created successfully"))
}

/// `DELETE /deleteEvent/:id`
pub async fn delete_event(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(event_id): Path<String>,
) -> Result<Response, AppError> {
    let confirmation = event_service::delete_event(state.store.as_ref(), &caller, &event_id).await?;
    Ok(success(confirmation, "Event deleted successfully"))
}
