use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{EventStore, StoreError};
use crate::models::{Club, Event, User};

/// Store operations, used to make a specific call fail on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    FindAllEvents,
    FindEvent,
    InsertEvent,
    DeleteEvent,
    FindClub,
    FindUser,
    AddEventToUser,
    RemoveEventFromUser,
}

impl StoreOp {
    fn name(self) -> &'static str {
        match self {
            StoreOp::FindAllEvents => "find_all_events",
            StoreOp::FindEvent => "find_event",
            StoreOp::InsertEvent => "insert_event",
            StoreOp::DeleteEvent => "delete_event",
            StoreOp::FindClub => "find_club",
            StoreOp::FindUser => "find_user",
            StoreOp::AddEventToUser => "add_event_to_user",
            StoreOp::RemoveEventFromUser => "remove_event_from_user",
        }
    }
}

#[derive(Default)]
struct Inner {
    // Vec keeps insertion order as the tie-breaker when start times match.
    events: Vec<Event>,
    clubs: HashMap<String, Club>,
    users: HashMap<String, User>,
    failing: HashSet<StoreOp>,
}

impl Inner {
    fn check(&self, op: StoreOp) -> Result<(), StoreError> {
        if self.failing.contains(&op) {
            tracing::warn!(op = op.name(), "Injected store failure");
            return Err(StoreError::Unavailable(op.name()));
        }
        Ok(())
    }
}

/// Process-local store. Clubs and users are seeded directly since this
/// service never creates them.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put_club(&self, club: Club) {
        self.inner.write().await.clubs.insert(club.id.clone(), club);
    }

    pub async fn put_user(&self, user: User) {
        self.inner.write().await.users.insert(user.id.clone(), user);
    }

    /// Makes every subsequent call of `op` fail until [`MemoryStore::recover`].
    pub async fn fail(&self, op: StoreOp) {
        self.inner.write().await.failing.insert(op);
    }

    pub async fn recover(&self, op: StoreOp) {
        self.inner.write().await.failing.remove(&op);
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn find_all_events(&self) -> Result<Vec<Event>, StoreError> {
        let inner = self.inner.read().await;
        inner.check(StoreOp::FindAllEvents)?;

        let mut events = inner.events.clone();
        events.sort_by_key(|event| event.start_time);
        Ok(events)
    }

    async fn find_event(&self, id: &str) -> Result<Option<Event>, StoreError> {
        let inner = self.inner.read().await;
        inner.check(StoreOp::FindEvent)?;
        Ok(inner.events.iter().find(|event| event.id == id).cloned())
    }

    async fn insert_event(&self, event: &Event) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.check(StoreOp::InsertEvent)?;
        inner.events.push(event.clone());
        Ok(())
    }

    async fn delete_event(&self, id: &str) -> Result<Option<Event>, StoreError> {
        let mut inner = self.inner.write().await;
        inner.check(StoreOp::DeleteEvent)?;
        let position = inner.events.iter().position(|event| event.id == id);
        Ok(position.map(|index| inner.events.remove(index)))
    }

    async fn find_club(&self, id: &str) -> Result<Option<Club>, StoreError> {
        let inner = self.inner.read().await;
        inner.check(StoreOp::FindClub)?;
        Ok(inner.clubs.get(id).cloned())
    }

    async fn find_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        inner.check(StoreOp::FindUser)?;
        Ok(inner.users.get(id).cloned())
    }

    async fn add_event_to_user(&self, user_id: &str, event_id: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        inner.check(StoreOp::AddEventToUser)?;
        match inner.users.get_mut(user_id) {
            Some(user) => {
                if !user.has_created(event_id) {
                    user.events_created.push(event_id.to_string());
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_event_from_user(
        &self,
        user_id: &str,
        event_id: &str,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        inner.check(StoreOp::RemoveEventFromUser)?;
        match inner.users.get_mut(user_id) {
            Some(user) => {
                user.events_created.retain(|id| id != event_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
