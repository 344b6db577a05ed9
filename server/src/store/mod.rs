//! Persistence seam for clubs, users and events.
//!
//! Handlers only talk to [`EventStore`]; the Postgres implementation backs
//! the running service and the in-memory one backs tests and embedding.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Club, Event, User};

pub mod memory;
pub mod postgres;

pub use memory::{MemoryStore, StoreOp};
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("store unavailable during {0}")]
    Unavailable(&'static str),
}

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Every event, ordered by start time (earliest first).
    async fn find_all_events(&self) -> Result<Vec<Event>, StoreError>;

    async fn find_event(&self, id: &str) -> Result<Option<Event>, StoreError>;

    async fn insert_event(&self, event: &Event) -> Result<(), StoreError>;

    /// Removes the event and returns it, or `None` if it was already gone.
    async fn delete_event(&self, id: &str) -> Result<Option<Event>, StoreError>;

    async fn find_club(&self, id: &str) -> Result<Option<Club>, StoreError>;

    async fn find_user(&self, id: &str) -> Result<Option<User>, StoreError>;

    /// Set-add `event_id` to the user's `eventsCreated`. Returns `false` when
    /// no user matched.
    async fn add_event_to_user(&self, user_id: &str, event_id: &str) -> Result<bool, StoreError>;

    /// Set-remove `event_id` from the user's `eventsCreated`. Returns `false`
    /// when no user matched.
    async fn remove_event_from_user(
        &self,
        user_id: &str,
        event_id: &str,
    ) -> Result<bool, StoreError>;
}
