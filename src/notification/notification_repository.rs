use crate::error::Result;
use sqlx::PgPool;
use uuid::Uuid;
use super::notification_models::Notification;

#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all_by_user(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        let notifications = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE user_id = $1 ORDER BY timestamp DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    /// Durable dedup probe: has this user already been notified for this
    /// event?
    pub async fn find_event_notification(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> Result<Option<Notification>> {
        let notification = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications
             WHERE user_id = $1 AND event_id = $2 AND type = $3",
        )
        .bind(user_id)
        .bind(event_id)
        .bind(Notification::TYPE_EVENT)
        .fetch_optional(&self.pool)
        .await?;

        Ok(notification)
    }

    /// Insert an event-start notification. The UNIQUE
    /// (user_id, event_id, type) constraint makes this fail with a unique
    /// violation when a concurrent writer got there first; callers treat
    /// that as already-sent.
    pub async fn create_event_notification(
        &self,
        user_id: Uuid,
        event_id: Uuid,
        title: &str,
        message: &str,
    ) -> Result<Notification> {
        let notification = sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (user_id, event_id, title, message, type)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(user_id)
        .bind(event_id)
        .bind(title)
        .bind(message)
        .bind(Notification::TYPE_EVENT)
        .fetch_one(&self.pool)
        .await?;

        Ok(notification)
    }

    pub async fn mark_as_read(&self, id: Uuid, user_id: Uuid) -> Result<Option<Notification>> {
        let notification = sqlx::query_as::<_, Notification>(
            "UPDATE notifications SET is_read = true WHERE id = $1 AND user_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(notification)
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete_all_by_user(&self, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
