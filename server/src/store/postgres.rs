use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};

use super::{EventStore, StoreError};
use crate::models::{Club, Event, User};

const EVENT_COLUMNS: &str =
    "id, title, description, start_time, end_time, venue, creator, of_club, created_at";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool and brings the schema up to date.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        tracing::info!("Successfully connected to database");

        sqlx::migrate!().run(&pool).await?;

        tracing::info!("Migrations run successfully");

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl EventStore for PgStore {
    async fn find_all_events(&self) -> Result<Vec<Event>, StoreError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY start_time ASC, created_at ASC");
        let events = sqlx::query_as::<_, Event>(&sql).fetch_all(&self.pool).await?;
        Ok(events)
    }

    async fn find_event(&self, id: &str) -> Result<Option<Event>, StoreError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(event)
    }

    async fn insert_event(&self, event: &Event) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO events (id, title, description, start_time, end_time, venue, creator, of_club, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(&event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.start_time)
        .bind(event.end_time)
        .bind(&event.venue)
        .bind(&event.creator)
        .bind(&event.of_club)
        .bind(event.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_event(&self, id: &str) -> Result<Option<Event>, StoreError> {
        let sql = format!("DELETE FROM events WHERE id = $1 RETURNING {EVENT_COLUMNS}");
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(event)
    }

    async fn find_club(&self, id: &str) -> Result<Option<Club>, StoreError> {
        let club = sqlx::query_as::<_, Club>("SELECT id, name, created_at FROM clubs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(club)
    }

    async fn find_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        let user =
            sqlx::query_as::<_, User>("SELECT id, name, events_created FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(user)
    }

    async fn add_event_to_user(&self, user_id: &str, event_id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET events_created = CASE
                WHEN $2 = ANY(events_created) THEN events_created
                ELSE array_append(events_created, $2)
            END
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn remove_event_from_user(
        &self,
        user_id: &str,
        event_id: &str,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE users SET events_created = array_remove(events_created, $2) WHERE id = $1",
        )
        .bind(user_id)
        .bind(event_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
