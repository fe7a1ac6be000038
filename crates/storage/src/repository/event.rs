use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::schedule::ScheduledEvent;
use crate::error::Result;
use crate::models::Event;

/// Repository for race weekend lookups
pub struct EventRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> EventRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, event_id: Uuid) -> Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            SELECT event_id, season, round, name, country, location, circuit_name,
                   starts_at, has_sprint
            FROM events
            WHERE event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(event)
    }

    /// Season calendar in round order
    pub async fn list_by_season(&self, season: i32) -> Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(
            r#"
            SELECT event_id, season, round, name, country, location, circuit_name,
                   starts_at, has_sprint
            FROM events
            WHERE season = $1
            ORDER BY round ASC
            "#,
        )
        .bind(season)
        .fetch_all(self.pool)
        .await?;

        Ok(events)
    }

    /// Inserts the event at `(season, round)` or refreshes its descriptors
    /// and start time. The event id never changes.
    pub async fn upsert(&self, season: i32, event: &ScheduledEvent) -> Result<Event> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (season, round, name, country, location, circuit_name,
                                starts_at, has_sprint)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (season, round)
            DO UPDATE SET
                name = EXCLUDED.name,
                country = EXCLUDED.country,
                location = EXCLUDED.location,
                circuit_name = EXCLUDED.circuit_name,
                starts_at = EXCLUDED.starts_at,
                has_sprint = EXCLUDED.has_sprint
            RETURNING event_id, season, round, name, country, location, circuit_name,
                      starts_at, has_sprint
            "#,
        )
        .bind(season)
        .bind(event.round)
        .bind(&event.name)
        .bind(&event.country)
        .bind(&event.location)
        .bind(&event.circuit_name)
        .bind(event.starts_at)
        .bind(event.has_sprint)
        .fetch_one(self.pool)
        .await?;

        Ok(event)
    }
}
