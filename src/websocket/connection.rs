use axum::extract::ws::Message;
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

pub type WsSender = mpsc::UnboundedSender<Message>;

/// Registry of live WebSocket connections for the notification feed.
/// Cloning shares the underlying map, so the HTTP handlers and the
/// dispatcher see the same set of clients.
#[derive(Clone)]
pub struct ConnectionManager {
    connections: Arc<DashMap<Uuid, WsSender>>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(DashMap::new()),
        }
    }

    /// Register a connection and return the id that identifies it until
    /// disconnect.
    pub fn add_connection(&self, sender: WsSender) -> Uuid {
        let connection_id = Uuid::new_v4();
        self.connections.insert(connection_id, sender);
        tracing::info!(
            "WebSocket client {} connected ({} online)",
            connection_id,
            self.connection_count()
        );
        connection_id
    }

    /// Remove a connection. Unknown or already-removed ids are a no-op.
    pub fn remove_connection(&self, connection_id: &Uuid) {
        if self.connections.remove(connection_id).is_some() {
            tracing::info!(
                "WebSocket client {} disconnected ({} online)",
                connection_id,
                self.connection_count()
            );
        }
    }

    /// Serialize `payload` once and push it to every connection. Connections
    /// whose receiving task has gone away fail to accept the send; those are
    /// collected during the pass and removed after it, so one dead client
    /// never blocks delivery to the rest.
    pub fn broadcast<T: Serialize>(&self, payload: &T) {
        let json = match serde_json::to_string(payload) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize broadcast payload: {:?}", e);
                return;
            }
        };

        let mut dropped = Vec::new();

        for entry in self.connections.iter() {
            if entry.value().send(Message::Text(json.clone())).is_err() {
                dropped.push(*entry.key());
            }
        }

        for connection_id in dropped {
            self.remove_connection(&connection_id);
        }
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn subscriber(manager: &ConnectionManager) -> (Uuid, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = manager.add_connection(tx);
        (id, rx)
    }

    #[test]
    fn test_broadcast_reaches_every_connection() {
        let manager = ConnectionManager::new();
        let (_id_a, mut rx_a) = subscriber(&manager);
        let (_id_b, mut rx_b) = subscriber(&manager);

        manager.broadcast(&json!({"title": "Event Starting Now"}));

        for rx in [&mut rx_a, &mut rx_b] {
            match rx.try_recv().unwrap() {
                Message::Text(text) => assert!(text.contains("Event Starting Now")),
                other => panic!("expected text frame, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_broadcast_prunes_dead_connections() {
        let manager = ConnectionManager::new();
        let (_id_a, mut rx_a) = subscriber(&manager);
        let (_id_b, rx_b) = subscriber(&manager);
        let (_id_c, mut rx_c) = subscriber(&manager);
        assert_eq!(manager.connection_count(), 3);

        // Simulate a client whose socket task exited.
        drop(rx_b);

        manager.broadcast(&json!({"message": "hello"}));

        assert_eq!(manager.connection_count(), 2);
        assert!(rx_a.try_recv().is_ok());
        assert!(rx_c.try_recv().is_ok());
    }

    #[test]
    fn test_remove_connection_is_idempotent() {
        let manager = ConnectionManager::new();
        let (id, _rx) = subscriber(&manager);

        manager.remove_connection(&id);
        manager.remove_connection(&id);
        manager.remove_connection(&Uuid::new_v4());

        assert_eq!(manager.connection_count(), 0);
    }
}
