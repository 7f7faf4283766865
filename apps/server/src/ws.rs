//! WebSocket endpoint and live connection registry.
//!
//! Each socket gets a uuid connection id and an unbounded outbound channel.
//! The registry maps connection ids to those channels and implements the
//! core [`PushChannel`] trait, so broadcast fan-out and direct replies share
//! one delivery path. Client frames carry tagged JSON commands; disconnect
//! tears down the registry entry and the connection's subscriptions.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use dashmap::DashMap;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use uuid::Uuid;

use quotecast_core::errors::DeliveryError;
use quotecast_core::PushChannel;
use quotecast_market_data::Interval;

use crate::main_lib::AppState;

/// Live WebSocket connections keyed by connection id.
///
/// Values are the per-socket outbound channels; the socket task forwards
/// whatever lands there onto the wire. Sending never blocks the caller.
pub struct ConnectionRegistry {
    senders: DashMap<String, mpsc::UnboundedSender<Message>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            senders: DashMap::new(),
        }
    }

    pub fn register(&self, connection_id: impl Into<String>, sender: mpsc::UnboundedSender<Message>) {
        self.senders.insert(connection_id.into(), sender);
    }

    /// Idempotent; unregistering an unknown id is a no-op.
    pub fn unregister(&self, connection_id: &str) {
        self.senders.remove(connection_id);
    }

    pub fn active_connections(&self) -> usize {
        self.senders.len()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PushChannel for ConnectionRegistry {
    async fn send(&self, connection_id: &str, payload: &[u8]) -> Result<(), DeliveryError> {
        let sender = match self.senders.get(connection_id) {
            Some(entry) => entry.value().clone(),
            None => return Err(DeliveryError::NotFound(connection_id.to_string())),
        };
        let text =
            String::from_utf8(payload.to_vec()).map_err(|e| DeliveryError::SendFailed {
                connection_id: connection_id.to_string(),
                message: format!("payload is not valid UTF-8: {e}"),
            })?;
        sender
            .send(Message::Text(text.into()))
            .map_err(|_| DeliveryError::Closed(connection_id.to_string()))
    }
}

/// Commands a client may send over the socket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Subscribe {
        symbols: Vec<String>,
        #[serde(default)]
        interval: Interval,
    },
    Unsubscribe {
        symbols: Vec<String>,
    },
    Ping,
}

/// Replies and notifications the server sends.
///
/// Quote pushes are not part of this enum; the broadcast dispatcher writes
/// its own `{"quotes": ...}` payloads through the registry.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Connected { connection_id: String },
    Subscribed { symbols: Vec<String> },
    Unsubscribed { symbols: Vec<String> },
    Pong,
    Error { message: String },
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = Uuid::new_v4().to_string();
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();

    state.connections.register(connection_id.clone(), tx);
    info!("WebSocket connected: {}", connection_id);

    let greeting = ServerMessage::Connected {
        connection_id: connection_id.clone(),
    };
    let mut connected = match encode(&greeting) {
        Some(message) => sender.send(message).await.is_ok(),
        None => false,
    };

    while connected {
        tokio::select! {
            outbound = rx.recv() => {
                match outbound {
                    Some(message) => {
                        if sender.send(message).await.is_err() {
                            connected = false;
                        }
                    }
                    None => connected = false,
                }
            }
            inbound = receiver.next() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => {
                        let reply =
                            handle_client_message(&state, &connection_id, text.as_str()).await;
                        if let Some(message) = encode(&reply) {
                            if sender.send(message).await.is_err() {
                                connected = false;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => connected = false,
                    // Binary frames and ws-level ping/pong need no reply here
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("WebSocket error on {}: {}", connection_id, e);
                        connected = false;
                    }
                }
            }
        }
    }

    state.connections.unregister(&connection_id);
    let removed = state
        .subscription_service
        .delete_all_subscriptions(&connection_id)
        .await;
    info!(
        "WebSocket disconnected: {} (subscriptions removed: {})",
        connection_id, removed
    );
}

async fn handle_client_message(
    state: &Arc<AppState>,
    connection_id: &str,
    raw: &str,
) -> ServerMessage {
    let parsed: ClientMessage = match serde_json::from_str(raw) {
        Ok(message) => message,
        Err(e) => {
            return ServerMessage::Error {
                message: format!("Unrecognized message: {}", e),
            }
        }
    };

    match parsed {
        ClientMessage::Subscribe { symbols, interval } => {
            match state
                .subscription_service
                .create_subscriptions(connection_id, &symbols, interval)
                .await
            {
                // Ack with the full set now subscribed, not just the delta
                Ok(symbols) => ServerMessage::Subscribed { symbols },
                Err(e) => ServerMessage::Error {
                    message: e.to_string(),
                },
            }
        }
        ClientMessage::Unsubscribe { symbols } => {
            match state
                .subscription_service
                .delete_subscriptions(connection_id, &symbols)
                .await
            {
                Ok(symbols) => ServerMessage::Unsubscribed { symbols },
                Err(e) => ServerMessage::Error {
                    message: e.to_string(),
                },
            }
        }
        ClientMessage::Ping => ServerMessage::Pong,
    }
}

fn encode(message: &ServerMessage) -> Option<Message> {
    match serde_json::to_string(message) {
        Ok(json) => Some(Message::Text(json.into())),
        Err(e) => {
            error!("Failed to encode server message: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod protocol {
        use super::*;

        #[test]
        fn test_subscribe_parses_with_interval() {
            let raw = r#"{"type":"subscribe","symbols":["AAPL","MSFT"],"interval":"s"}"#;
            let parsed: ClientMessage = serde_json::from_str(raw).unwrap();
            match parsed {
                ClientMessage::Subscribe { symbols, interval } => {
                    assert_eq!(symbols, vec!["AAPL", "MSFT"]);
                    assert_eq!(interval, Interval::Seconds);
                }
                other => panic!("expected subscribe, got {:?}", other),
            }
        }

        #[test]
        fn test_subscribe_interval_defaults_when_absent() {
            let raw = r#"{"type":"subscribe","symbols":["AAPL"]}"#;
            let parsed: ClientMessage = serde_json::from_str(raw).unwrap();
            match parsed {
                ClientMessage::Subscribe { interval, .. } => {
                    assert_eq!(interval, Interval::Daily);
                }
                other => panic!("expected subscribe, got {:?}", other),
            }
        }

        #[test]
        fn test_unknown_type_is_rejected() {
            let raw = r#"{"type":"shout","symbols":["AAPL"]}"#;
            assert!(serde_json::from_str::<ClientMessage>(raw).is_err());
        }

        #[test]
        fn test_ping_is_a_bare_tag() {
            let parsed: ClientMessage = serde_json::from_str(r#"{"type":"ping"}"#).unwrap();
            assert!(matches!(parsed, ClientMessage::Ping));
        }

        #[test]
        fn test_connected_serializes_with_snake_case_tag() {
            let message = ServerMessage::Connected {
                connection_id: "conn-1".to_string(),
            };
            let json: serde_json::Value =
                serde_json::from_str(&serde_json::to_string(&message).unwrap()).unwrap();
            assert_eq!(json["type"], "connected");
            assert_eq!(json["connection_id"], "conn-1");
        }

        #[test]
        fn test_pong_serializes_without_payload() {
            let json = serde_json::to_string(&ServerMessage::Pong).unwrap();
            assert_eq!(json, r#"{"type":"pong"}"#);
        }
    }

    mod registry {
        use super::*;

        #[tokio::test]
        async fn test_send_delivers_text_to_registered_connection() {
            let registry = ConnectionRegistry::new();
            let (tx, mut rx) = mpsc::unbounded_channel();
            registry.register("conn-1", tx);

            registry.send("conn-1", br#"{"quotes":{}}"#).await.unwrap();

            match rx.recv().await {
                Some(Message::Text(text)) => assert_eq!(text.as_str(), r#"{"quotes":{}}"#),
                other => panic!("expected text frame, got {:?}", other),
            }
        }

        #[tokio::test]
        async fn test_send_to_unknown_connection_is_not_found() {
            let registry = ConnectionRegistry::new();
            let err = registry.send("ghost", b"{}").await.unwrap_err();
            assert!(matches!(err, DeliveryError::NotFound(_)));
        }

        #[tokio::test]
        async fn test_send_after_receiver_dropped_is_closed() {
            let registry = ConnectionRegistry::new();
            let (tx, rx) = mpsc::unbounded_channel();
            registry.register("conn-1", tx);
            drop(rx);

            let err = registry.send("conn-1", b"{}").await.unwrap_err();
            assert!(matches!(err, DeliveryError::Closed(_)));
        }

        #[tokio::test]
        async fn test_unregister_removes_the_connection() {
            let registry = ConnectionRegistry::new();
            let (tx, _rx) = mpsc::unbounded_channel();
            registry.register("conn-1", tx);
            assert_eq!(registry.active_connections(), 1);

            registry.unregister("conn-1");
            assert_eq!(registry.active_connections(), 0);

            // Unregistering again stays silent
            registry.unregister("conn-1");
            let err = registry.send("conn-1", b"{}").await.unwrap_err();
            assert!(matches!(err, DeliveryError::NotFound(_)));
        }
    }
}
