use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A stored notification. Serializing one of these is exactly the payload
/// pushed to WebSocket clients, so field names here are wire names: the
/// discriminator column `type` maps to the `kind` field both ways.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Option<Uuid>,
    pub title: String,
    pub message: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub is_read: bool,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    /// Discriminator for event-start notifications, part of the unique
    /// (user_id, event_id, type) triple.
    pub const TYPE_EVENT: &'static str = "event";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape_uses_type_and_timestamp() {
        let notification = Notification {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            event_id: Some(Uuid::new_v4()),
            title: "Event Starting Now".to_string(),
            message: "The event 'Orientation' is starting at 09:00 AM!".to_string(),
            kind: Notification::TYPE_EVENT.to_string(),
            is_read: false,
            timestamp: Utc::now(),
        };

        let json = serde_json::to_value(&notification).unwrap();
        assert_eq!(json["type"], "event");
        assert_eq!(json["is_read"], false);
        assert!(json.get("kind").is_none());
        // ISO 8601 timestamp string
        assert!(json["timestamp"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn test_round_trips_through_wire_names() {
        let json = serde_json::json!({
            "id": Uuid::new_v4(),
            "user_id": Uuid::new_v4(),
            "event_id": null,
            "title": "Event Starting Now",
            "message": "The event 'Job Fair' is starting at 01:30 PM!",
            "type": "event",
            "is_read": true,
            "timestamp": "2025-06-01T13:30:00Z",
        });

        let notification: Notification = serde_json::from_value(json).unwrap();
        assert_eq!(notification.kind, "event");
        assert!(notification.is_read);
        assert!(notification.event_id.is_none());
    }
}
