//! Event operations behind the HTTP handlers.
//!
//! Create and delete each touch two records (the event and its creator's
//! `eventsCreated` set). The store offers no transaction across them, so the
//! second write is followed by a compensating write when it fails.

use crate::auth::AuthUser;
use crate::models::{CreateEventRequest, Event};
use crate::store::{EventStore, StoreError};
use crate::utils::error::AppError;

pub async fn list_events(store: &dyn EventStore) -> Result<Vec<Event>, AppError> {
    let events = store.find_all_events().await?;
    tracing::debug!(count = events.len(), "Listed events");
    Ok(events)
}

pub async fn create_event(
    store: &dyn EventStore,
    caller: &AuthUser,
    club_id: &str,
    request: CreateEventRequest,
) -> Result<Event, AppError> {
    let event = request
        .into_event(&caller.id, club_id)
        .map_err(|field| AppError::ValidationError(vec![field]))?;

    if store.find_club(club_id).await?.is_none() {
        return Err(AppError::NotFound("Club not found.".to_string()));
    }
    if store.find_user(&caller.id).await?.is_none() {
        return Err(AppError::NotFound("User not found.".to_string()));
    }

    store.insert_event(&event).await?;

    match store.add_event_to_user(&caller.id, &event.id).await {
        Ok(true) => {}
        Ok(false) => {
            undo_insert(store, &event, "user vanished before eventsCreated update").await?;
            return Err(AppError::NotFound("User not found.".to_string()));
        }
        Err(e) => {
            undo_insert(store, &event, &e.to_string()).await?;
            return Err(e.into());
        }
    }

    tracing::info!(event_id = %event.id, club_id, creator = %caller.id, "Event created");
    Ok(event)
}

pub async fn delete_event(
    store: &dyn EventStore,
    caller: &AuthUser,
    event_id: &str,
) -> Result<String, AppError> {
    let existing = store
        .find_event(event_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    if existing.creator != caller.id {
        return Err(AppError::Unauthorized("Unauthorized".to_string()));
    }

    let removed = store
        .delete_event(event_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    if let Err(e) = store.remove_event_from_user(&removed.creator, event_id).await {
        undo_delete(store, &removed, &e).await?;
        return Err(e.into());
    }

    tracing::info!(event_id, creator = %caller.id, "Event deleted");
    Ok(format!("removed event {}", event_id))
}

async fn undo_insert(store: &dyn EventStore, event: &Event, cause: &str) -> Result<(), AppError> {
    tracing::warn!(event_id = %event.id, cause, "Rolling back event insert");
    match store.delete_event(&event.id).await {
        Ok(_) => Ok(()),
        Err(rollback) => Err(AppError::PartialWrite {
            step: "insert_event",
            cause: format!("{}; rollback failed: {}", cause, rollback),
        }),
    }
}

async fn undo_delete(
    store: &dyn EventStore,
    event: &Event,
    cause: &StoreError,
) -> Result<(), AppError> {
    tracing::warn!(event_id = %event.id, cause = %cause, "Restoring deleted event");
    store
        .insert_event(event)
        .await
        .map_err(|restore| AppError::PartialWrite {
            step: "delete_event",
            cause: format!("{}; restore failed: {}", cause, restore),
        })
}
