use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A campus event. `event_date` and the time columns are naive wall-clock
/// values; combining them yields the instant the dispatcher matches against.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub event_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub location: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_by_serializes_as_plain_id() {
        let creator = Uuid::new_v4();
        let event = Event {
            id: Uuid::new_v4(),
            title: "Orientation".to_string(),
            description: None,
            event_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
            location: "Main Hall".to_string(),
            created_by: creator,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&event).unwrap();
        // Every event carries its creator; only description may be null.
        assert_eq!(json["created_by"], creator.to_string());
        assert!(json["description"].is_null());
    }
}
