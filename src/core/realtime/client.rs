//! WebSocket connection to the OpenAI Realtime API.
//!
//! [`RealtimeLeg::connect`] performs the handshake and spawns a connection
//! task that owns the socket. Outgoing [`ClientEvent`]s are routed through an
//! mpsc channel so callers never block on the network; parsed [`ServerEvent`]s
//! come back through a second channel, which closes when the connection ends.
//!
//! There is no reconnection: a dropped AI leg ends the call.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::{debug, info, warn};

use super::messages::{ClientEvent, ServerEvent};
use super::{OPENAI_REALTIME_URL, RealtimeError, RealtimeResult};

/// Channel capacity for WebSocket message routing.
const WS_CHANNEL_CAPACITY: usize = 256;

/// Routing for events headed to the AI leg's socket writer.
#[derive(Debug)]
pub enum RealtimeRoute {
    /// JSON client event
    Event(ClientEvent),
    /// Close the connection
    Close,
}

/// One live connection to the Realtime API.
pub struct RealtimeLeg {
    route_tx: mpsc::Sender<RealtimeRoute>,
    events: mpsc::Receiver<ServerEvent>,
    task: JoinHandle<()>,
}

impl RealtimeLeg {
    /// Open the WebSocket and spawn the connection task.
    pub async fn connect(api_key: &str, model: &str) -> RealtimeResult<Self> {
        if api_key.is_empty() {
            return Err(RealtimeError::AuthenticationFailed(
                "API key is required".to_string(),
            ));
        }

        let url = format!("{OPENAI_REALTIME_URL}?model={model}");
        let request = http::Request::builder()
            .uri(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("OpenAI-Beta", "realtime=v1")
            .header(
                "Sec-WebSocket-Key",
                tungstenite::handshake::client::generate_key(),
            )
            .header("Sec-WebSocket-Version", "13")
            .header("Connection", "Upgrade")
            .header("Upgrade", "websocket")
            .header("Host", "api.openai.com")
            .body(())
            .map_err(|e| RealtimeError::ConnectionFailed(e.to_string()))?;

        let (ws_stream, _response) = tokio_tungstenite::connect_async(request)
            .await
            .map_err(|e| RealtimeError::ConnectionFailed(e.to_string()))?;

        info!("Connected to OpenAI Realtime API");

        let (mut ws_sink, mut ws_stream) = ws_stream.split();
        let (route_tx, mut route_rx) = mpsc::channel::<RealtimeRoute>(WS_CHANNEL_CAPACITY);
        let (event_tx, events) = mpsc::channel::<ServerEvent>(WS_CHANNEL_CAPACITY);

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    route = route_rx.recv() => match route {
                        Some(RealtimeRoute::Event(event)) => {
                            let json = match serde_json::to_string(&event) {
                                Ok(json) => json,
                                Err(e) => {
                                    warn!("Failed to serialize client event: {e}");
                                    continue;
                                }
                            };
                            if let Err(e) = ws_sink.send(Message::Text(json.into())).await {
                                warn!("Failed to send on AI leg: {e}");
                                break;
                            }
                        }
                        // All senders dropped counts as a close request.
                        Some(RealtimeRoute::Close) | None => {
                            let _ = ws_sink.send(Message::Close(None)).await;
                            break;
                        }
                    },

                    msg = ws_stream.next() => match msg {
                        Some(Ok(Message::Text(text))) => {
                            match serde_json::from_str::<ServerEvent>(&text) {
                                Ok(event) => {
                                    // Receiver gone means the call is over.
                                    if event_tx.send(event).await.is_err() {
                                        break;
                                    }
                                }
                                // Unmodeled event kinds and malformed frames
                                // alike: drop, keep the connection open.
                                Err(e) => debug!("Dropping unhandled AI event: {e}"),
                            }
                        }
                        Some(Ok(Message::Ping(data))) => {
                            if let Err(e) = ws_sink.send(Message::Pong(data)).await {
                                warn!("Failed to send pong: {e}");
                            }
                        }
                        Some(Ok(Message::Close(_))) => {
                            info!("AI leg closed by server");
                            break;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            warn!("AI leg WebSocket error: {e}");
                            break;
                        }
                        None => break,
                    },
                }
            }
            debug!("AI leg connection task ended");
        });

        Ok(Self {
            route_tx,
            events,
            task,
        })
    }

    /// Sender handle for routing client events to the socket writer.
    pub fn route_sender(&self) -> mpsc::Sender<RealtimeRoute> {
        self.route_tx.clone()
    }

    /// Next parsed server event, or `None` once the connection has ended.
    pub async fn next_event(&mut self) -> Option<ServerEvent> {
        self.events.recv().await
    }

    /// Tear down the connection. Idempotent from the caller's perspective:
    /// a leg that already closed simply has nothing left to stop.
    pub async fn close(self) {
        let _ = self.route_tx.send(RealtimeRoute::Close).await;
        self.task.abort();
    }
}
