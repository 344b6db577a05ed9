use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    /// Ids of the events this user created. Kept free of duplicates.
    pub events_created: Vec<String>,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            events_created: Vec::new(),
        }
    }

    pub fn has_created(&self, event_id: &str) -> bool {
        self.events_created.iter().any(|id| id == event_id)
    }
}
