use crate::error::Result;
use chrono::{NaiveDate, NaiveTime};
use sqlx::PgPool;
use uuid::Uuid;
use super::event_models::Event;

#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(
            "SELECT * FROM events ORDER BY event_date ASC, start_time ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Events scheduled on the given calendar day, ordered by start time.
    /// The dispatcher calls this once per cycle.
    pub async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE event_date = $1 ORDER BY start_time ASC",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    pub async fn create(
        &self,
        title: &str,
        description: Option<&str>,
        event_date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        location: &str,
        created_by: Uuid,
    ) -> Result<Event> {
        let event = sqlx::query_as::<_, Event>(
            "INSERT INTO events (title, description, event_date, start_time, end_time, location, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
        .bind(title)
        .bind(description)
        .bind(event_date)
        .bind(start_time)
        .bind(end_time)
        .bind(location)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        title: Option<&str>,
        description: Option<&str>,
        event_date: Option<NaiveDate>,
        start_time: Option<NaiveTime>,
        end_time: Option<NaiveTime>,
        location: Option<&str>,
    ) -> Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(
            "UPDATE events SET
                title = COALESCE($1, title),
                description = COALESCE($2, description),
                event_date = COALESCE($3, event_date),
                start_time = COALESCE($4, start_time),
                end_time = COALESCE($5, end_time),
                location = COALESCE($6, location),
                updated_at = NOW()
             WHERE id = $7
             RETURNING *",
        )
        .bind(title)
        .bind(description)
        .bind(event_date)
        .bind(start_time)
        .bind(end_time)
        .bind(location)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
