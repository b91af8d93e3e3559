use chrono::NaiveDateTime;
use dashmap::DashSet;
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

use crate::error::Result;
use crate::event::Event;
use crate::state::AppState;
use super::notification_models::Notification;

/// Half-width of the start window in seconds. An event is "starting now"
/// while its start instant lies within this many seconds of the clock, on
/// either side, so with a 60-second cycle every event is seen by at least
/// one cycle and often by several.
pub const DISPATCH_WINDOW_SECS: i64 = 120;

const EVENT_STARTING_TITLE: &str = "Event Starting Now";

/// Seconds from `now` until the event's start instant. Negative once the
/// start has passed.
pub fn start_offset_secs(event: &Event, now: NaiveDateTime) -> i64 {
    let starts_at = event.event_date.and_time(event.start_time);
    (starts_at - now).num_seconds()
}

/// Whether the event falls inside the dispatch window at `now`. Both window
/// edges are inclusive.
pub fn is_due(event: &Event, now: NaiveDateTime) -> bool {
    let offset = start_offset_secs(event, now);
    (-DISPATCH_WINDOW_SECS..=DISPATCH_WINDOW_SECS).contains(&offset)
}

/// Body text for an event-start notification. Times render in 12-hour
/// clock with an AM/PM suffix.
pub fn starting_now_message(event: &Event) -> String {
    format!(
        "The event '{}' is starting at {}!",
        event.title,
        event.start_time.format("%I:%M %p")
    )
}

/// In-memory record of (user, event) pairs already handled this day.
///
/// The ledger is an optimization, not the source of truth: it saves the
/// dedup SELECT and the doomed INSERT on the cycles after a pair was first
/// handled. Durable dedup is the UNIQUE (user_id, event_id, type)
/// constraint, which stays correct across restarts and concurrent writers;
/// a cleared or cold ledger only costs extra queries, never duplicate
/// notifications.
#[derive(Clone)]
pub struct DispatchLedger {
    issued: Arc<DashSet<(Uuid, Uuid)>>,
}

impl DispatchLedger {
    pub fn new() -> Self {
        Self {
            issued: Arc::new(DashSet::new()),
        }
    }

    pub fn is_marked(&self, user_id: Uuid, event_id: Uuid) -> bool {
        self.issued.contains(&(user_id, event_id))
    }

    pub fn mark(&self, user_id: Uuid, event_id: Uuid) {
        self.issued.insert((user_id, event_id));
    }

    /// Drop every entry. Run once a day so entries for past events do not
    /// accumulate forever.
    pub fn clear(&self) {
        self.issued.clear();
    }

    pub fn len(&self) -> usize {
        self.issued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }
}

impl Default for DispatchLedger {
    fn default() -> Self {
        Self::new()
    }
}

/// One dispatch pass at wall-clock time `now`: find today's events inside
/// the start window, write one notification per (user, event) pair that has
/// none yet, and push each created row to the connected WebSocket clients.
///
/// Returns the number of notifications created. A failure for one pair is
/// logged and skipped so the rest of the pass still runs; only the
/// up-front event/user queries abort the whole cycle.
pub async fn run_dispatch_cycle(state: &AppState, now: NaiveDateTime) -> Result<u64> {
    let events_today = state.event_repository.find_by_date(now.date()).await?;

    if events_today.is_empty() {
        return Ok(0);
    }

    let users = state.user_repository.find_all().await?;

    let mut created = 0u64;

    for event in events_today.iter().filter(|event| is_due(event, now)) {
        for user in &users {
            match notify_pair(state, user.id, event).await {
                Ok(Some(notification)) => {
                    state.ws_connections.broadcast(&notification);
                    created += 1;
                }
                Ok(None) => {}
                Err(e) => {
                    error!(
                        "Failed to notify user {} for event {}: {:?}",
                        user.id, event.id, e
                    );
                }
            }
        }
    }

    Ok(created)
}

/// Write the notification for one (user, event) pair unless it already
/// exists. Returns the created row, or `None` when the pair was already
/// handled.
async fn notify_pair(
    state: &AppState,
    user_id: Uuid,
    event: &Event,
) -> Result<Option<Notification>> {
    if state.dispatch_ledger.is_marked(user_id, event.id) {
        return Ok(None);
    }

    // The cache misses after a restart or the daily clear; fall back to the
    // durable record before inserting.
    if let Some(_existing) = state
        .notification_repository
        .find_event_notification(user_id, event.id)
        .await?
    {
        state.dispatch_ledger.mark(user_id, event.id);
        return Ok(None);
    }

    let message = starting_now_message(event);

    match state
        .notification_repository
        .create_event_notification(user_id, event.id, EVENT_STARTING_TITLE, &message)
        .await
    {
        Ok(notification) => {
            state.dispatch_ledger.mark(user_id, event.id);
            Ok(Some(notification))
        }
        // Lost the race to a concurrent writer; the notification exists.
        Err(e) if e.is_unique_violation() => {
            state.dispatch_ledger.mark(user_id, event.id);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, Utc};

    fn event_at(date: NaiveDate, start: NaiveTime) -> Event {
        Event {
            id: Uuid::new_v4(),
            title: "Foundation Day".to_string(),
            description: None,
            event_date: date,
            start_time: start,
            end_time: start + chrono::Duration::hours(2),
            location: "Gymnasium".to_string(),
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn naive(dt: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(dt, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_start_offset() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let event = event_at(date, NaiveTime::from_hms_opt(14, 0, 0).unwrap());

        assert_eq!(start_offset_secs(&event, naive("2025-06-01 13:58:00")), 120);
        assert_eq!(start_offset_secs(&event, naive("2025-06-01 14:00:00")), 0);
        assert_eq!(start_offset_secs(&event, naive("2025-06-01 14:01:30")), -90);
    }

    #[test]
    fn test_window_edges_are_inclusive() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let event = event_at(date, NaiveTime::from_hms_opt(14, 0, 0).unwrap());

        assert!(is_due(&event, naive("2025-06-01 13:58:00"))); // +120s
        assert!(is_due(&event, naive("2025-06-01 14:02:00"))); // -120s
        assert!(is_due(&event, naive("2025-06-01 13:58:30")));
        assert!(is_due(&event, naive("2025-06-01 14:00:00")));

        assert!(!is_due(&event, naive("2025-06-01 13:57:59"))); // +121s
        assert!(!is_due(&event, naive("2025-06-01 14:02:01"))); // -121s
        assert!(!is_due(&event, naive("2025-06-01 13:00:00")));
        assert!(!is_due(&event, naive("2025-06-01 15:00:00"))); // -3600s, no backfill
        assert!(!is_due(&event, naive("2025-06-02 14:00:00"))); // next day
    }

    #[test]
    fn test_starting_now_message_formats_12_hour_time() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        let afternoon = event_at(date, NaiveTime::from_hms_opt(14, 0, 0).unwrap());
        assert_eq!(
            starting_now_message(&afternoon),
            "The event 'Foundation Day' is starting at 02:00 PM!"
        );

        let morning = event_at(date, NaiveTime::from_hms_opt(9, 5, 0).unwrap());
        assert_eq!(
            starting_now_message(&morning),
            "The event 'Foundation Day' is starting at 09:05 AM!"
        );

        let noon = event_at(date, NaiveTime::from_hms_opt(12, 0, 0).unwrap());
        assert_eq!(
            starting_now_message(&noon),
            "The event 'Foundation Day' is starting at 12:00 PM!"
        );
    }

    #[test]
    fn test_ledger_marking() {
        let ledger = DispatchLedger::new();
        let user_id = Uuid::new_v4();
        let event_id = Uuid::new_v4();

        assert!(!ledger.is_marked(user_id, event_id));
        assert!(ledger.is_empty());

        ledger.mark(user_id, event_id);
        assert!(ledger.is_marked(user_id, event_id));
        assert_eq!(ledger.len(), 1);

        // Same pair again is a no-op.
        ledger.mark(user_id, event_id);
        assert_eq!(ledger.len(), 1);

        // Same user, different event is a distinct entry.
        let other_event = Uuid::new_v4();
        ledger.mark(user_id, other_event);
        assert_eq!(ledger.len(), 2);
        assert!(!ledger.is_marked(other_event, user_id));

        ledger.clear();
        assert!(ledger.is_empty());
        assert!(!ledger.is_marked(user_id, event_id));
    }

    #[test]
    fn test_ledger_shares_entries_across_clones() {
        let ledger = DispatchLedger::new();
        let clone = ledger.clone();

        let user_id = Uuid::new_v4();
        let event_id = Uuid::new_v4();
        ledger.mark(user_id, event_id);

        assert!(clone.is_marked(user_id, event_id));
    }
}
