//! Media stream WebSocket handler.
//!
//! One connection here is one phone call. The handler accepts the telephony
//! provider's media-stream WebSocket, opens the AI leg, and runs the
//! per-call bridge loop: a single `select!` over both legs' inbound events,
//! so every mutation of call state happens on one task. Each leg's outbound
//! traffic is drained by its own writer so event handling never blocks on a
//! socket send.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tokio::select;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::core::bridge::{BridgeSettings, ConnectionBridge};
use crate::core::realtime::RealtimeLeg;
use crate::core::telephony::{TelephonyRoute, TwilioEvent};
use crate::state::AppState;

/// Channel buffer size for outbound telephony frames.
const CHANNEL_BUFFER_SIZE: usize = 1024;

/// Maximum WebSocket frame size (1 MB)
const MAX_WS_FRAME_SIZE: usize = 1024 * 1024;

/// Maximum WebSocket message size (1 MB)
const MAX_WS_MESSAGE_SIZE: usize = 1024 * 1024;

/// Media stream WebSocket handler.
///
/// Upgrades the HTTP connection and hands the socket to the per-call bridge
/// loop.
pub async fn media_stream_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    info!("Media stream WebSocket upgrade requested");

    ws.max_frame_size(MAX_WS_FRAME_SIZE)
        .max_message_size(MAX_WS_MESSAGE_SIZE)
        .on_upgrade(move |socket| handle_media_socket(socket, state))
}

/// Run one call.
async fn handle_media_socket(socket: WebSocket, state: Arc<AppState>) {
    let call_id = Uuid::new_v4();
    info!(%call_id, "Telephony stream connected");

    let (mut ws_sink, mut ws_stream) = socket.split();
    let (telephony_tx, mut telephony_rx) = mpsc::channel::<TelephonyRoute>(CHANNEL_BUFFER_SIZE);

    // Writer task for the telephony leg.
    let sender_task = tokio::spawn(async move {
        while let Some(route) = telephony_rx.recv().await {
            let result = match route {
                TelephonyRoute::Message(message) => match serde_json::to_string(&message) {
                    Ok(json) => ws_sink.send(Message::Text(json.into())).await,
                    Err(e) => {
                        error!("Failed to serialize outbound telephony frame: {e}");
                        continue;
                    }
                },
                TelephonyRoute::Close => {
                    let _ = ws_sink.send(Message::Close(None)).await;
                    break;
                }
            };

            if let Err(e) = result {
                warn!("Failed to send on telephony leg: {e}");
                break;
            }
        }
    });

    // Instruction text composed at webhook time; per-call from here on.
    let instructions = state.call_instructions();

    let mut ai_leg = match RealtimeLeg::connect(
        &state.config.openai_api_key,
        &state.config.realtime_model,
    )
    .await
    {
        Ok(leg) => leg,
        Err(e) => {
            // No retry: close the telephony leg and let the call end.
            error!(%call_id, "AI leg failed to open: {e}");
            let _ = telephony_tx.send(TelephonyRoute::Close).await;
            let _ = sender_task.await;
            return;
        }
    };

    let mut bridge = ConnectionBridge::new(
        instructions.as_ref().clone(),
        BridgeSettings::from_config(&state.config),
        telephony_tx.clone(),
        ai_leg.route_sender(),
    );

    loop {
        select! {
            frame = ws_stream.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<TwilioEvent>(&text) {
                        Ok(event) => {
                            if !bridge.on_telephony_event(event).await {
                                break;
                            }
                        }
                        // Malformed frames are dropped; the leg stays open.
                        Err(e) => debug!("Dropping malformed telephony frame: {e}"),
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    info!(%call_id, "Telephony leg closed");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(%call_id, "Telephony WebSocket error: {e}");
                    break;
                }
            },

            event = ai_leg.next_event() => match event {
                Some(event) => bridge.on_ai_event(event).await,
                None => {
                    info!(%call_id, "AI leg closed");
                    bridge.on_ai_closed().await;
                    break;
                }
            },
        }
    }

    // Either leg ending tears down the other; every path here is idempotent.
    bridge.on_telephony_closed().await;
    ai_leg.close().await;
    sender_task.abort();

    info!(%call_id, "Call terminated");
}
