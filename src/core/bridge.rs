//! Connection bridge: the per-call state machine joining the two legs.
//!
//! One [`ConnectionBridge`] exists per phone call. It owns the
//! [`CallSession`], gates the one-time session initialization on both legs
//! being ready, translates each leg's events into the other leg's vocabulary,
//! re-chunks AI audio into telephony frames, and runs the closing protocol.
//! Outbound traffic goes through the legs' routing channels, so no handler
//! here blocks on network I/O.

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::config::ServerConfig;
use crate::core::audio::FrameRechunker;
use crate::core::realtime::messages::{
    ClientEvent, ConversationItem, ServerEvent, SessionConfig, TurnDetection,
};
use crate::core::realtime::{AudioFormat, RealtimeRoute, RealtimeVoice};
use crate::core::session::CallSession;
use crate::core::telephony::{TelephonyRoute, TwilioEvent, TwilioMessage};

/// Server-side voice activity detection tunables for a call.
#[derive(Debug, Clone, Copy)]
pub struct TurnDetectionSettings {
    /// Activation threshold (0.0 to 1.0)
    pub threshold: f32,
    /// Audio included before detected speech, in ms
    pub prefix_padding_ms: u32,
    /// Silence that ends a turn, in ms
    pub silence_duration_ms: u32,
}

/// Per-call configuration applied at session initialization.
#[derive(Debug, Clone)]
pub struct BridgeSettings {
    /// Synthesized voice identity
    pub voice: RealtimeVoice,
    /// Sampling randomness, 0.0 to 1.0
    pub temperature: f32,
    /// Server VAD tunables
    pub turn_detection: TurnDetectionSettings,
    /// Prompt for a synthetic first turn so the AI speaks before the caller;
    /// `None` waits for caller input
    pub greeting: Option<String>,
    /// Session audio codec; must match the telephony leg's codec
    pub audio_format: AudioFormat,
}

impl BridgeSettings {
    /// Build per-call settings from server configuration.
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            voice: RealtimeVoice::from_str_or_default(&config.voice),
            temperature: config.temperature,
            turn_detection: TurnDetectionSettings {
                threshold: config.vad_threshold,
                prefix_padding_ms: config.vad_prefix_padding_ms,
                silence_duration_ms: config.vad_silence_duration_ms,
            },
            greeting: config.greeting.clone(),
            // Fixed to the telephony codec: frames pass between the legs
            // without transcoding.
            audio_format: AudioFormat::G711Ulaw,
        }
    }
}

/// Orchestrates one call across the telephony and AI legs.
pub struct ConnectionBridge {
    session: CallSession,
    rechunker: FrameRechunker,
    settings: BridgeSettings,
    telephony_tx: mpsc::Sender<TelephonyRoute>,
    ai_tx: mpsc::Sender<RealtimeRoute>,
    telephony_closed: bool,
    ai_closed: bool,
}

impl ConnectionBridge {
    pub fn new(
        instructions: String,
        settings: BridgeSettings,
        telephony_tx: mpsc::Sender<TelephonyRoute>,
        ai_tx: mpsc::Sender<RealtimeRoute>,
    ) -> Self {
        Self {
            session: CallSession::new(instructions),
            rechunker: FrameRechunker::new(),
            settings,
            telephony_tx,
            ai_tx,
            telephony_closed: false,
            ai_closed: false,
        }
    }

    pub fn session(&self) -> &CallSession {
        &self.session
    }

    /// Bytes of AI audio buffered awaiting a complete telephony frame.
    pub fn buffered_audio(&self) -> usize {
        self.rechunker.buffered()
    }

    // =========================================================================
    // Telephony leg events
    // =========================================================================

    /// Dispatch one inbound telephony event.
    ///
    /// Returns `false` when the call should end.
    pub async fn on_telephony_event(&mut self, event: TwilioEvent) -> bool {
        match event {
            TwilioEvent::Connected => {
                debug!("Telephony stream handshake complete");
                true
            }

            TwilioEvent::Start { start } => {
                info!(
                    stream_sid = %start.stream_sid,
                    call_sid = ?start.call_sid,
                    "Telephony stream started"
                );
                self.on_telephony_start(start.stream_sid).await;
                true
            }

            TwilioEvent::Media { media } => {
                self.session.observe_media_timestamp(media.timestamp);

                // Caller audio over an in-flight response is where barge-in
                // truncation would hook in; the turn state for it is tracked
                // but not acted on.
                if !self.ai_closed {
                    // Payload is already in the AI leg's wire encoding;
                    // forward it untouched.
                    self.send_ai(ClientEvent::InputAudioBufferAppend {
                        audio: media.payload,
                    })
                    .await;
                }
                true
            }

            TwilioEvent::Mark { mark } => {
                match self.session.turn.ack_mark() {
                    Some(sent) => debug!(acknowledged = %sent, received = %mark.name, "Playback mark acknowledged"),
                    None => debug!(received = %mark.name, "Mark acknowledged with empty queue"),
                }
                true
            }

            TwilioEvent::Stop => {
                info!("Telephony stream stopped");
                false
            }
        }
    }

    async fn on_telephony_start(&mut self, stream_sid: String) {
        self.session.started = true;
        self.session.stream_sid = Some(stream_sid);
        self.session.latest_media_timestamp_ms = 0;
        self.try_init().await;
    }

    // =========================================================================
    // AI leg events
    // =========================================================================

    /// Dispatch one inbound AI event.
    pub async fn on_ai_event(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::SessionCreated { session } => {
                info!(session_id = %session.id, "AI session created");
                self.session.ai_ready = true;
                self.try_init().await;
            }

            ServerEvent::SessionUpdated { session } => {
                debug!(session_id = %session.id, "AI session configuration acknowledged");
            }

            ServerEvent::AudioDelta {
                item_id, delta, ..
            } => {
                self.on_audio_delta(item_id.as_deref(), &delta).await;
            }

            ServerEvent::AudioDone { item_id } => {
                debug!(item_id = %item_id, "AI audio for item complete");
            }

            ServerEvent::AudioTranscriptDone { transcript, .. } => {
                info!(transcript = %transcript, "Assistant transcript");
            }

            ServerEvent::SpeechStarted { audio_start_ms, .. } => {
                debug!(audio_start_ms, "Caller speech started");
            }

            ServerEvent::SpeechStopped { audio_end_ms, .. } => {
                debug!(audio_end_ms, "Caller speech stopped");
            }

            ServerEvent::ResponseDone { response } => {
                debug!(response_id = %response.id, status = ?response.status, "AI response complete");
                self.session.turn.reset();
            }

            ServerEvent::Error { error } => {
                error!(
                    error_type = %error.error_type,
                    code = ?error.code,
                    "AI leg reported an error: {}",
                    error.message
                );
            }
        }
    }

    /// Decode a spoken-audio delta, emit complete telephony frames, and send
    /// one playback marker for the forward.
    async fn on_audio_delta(&mut self, item_id: Option<&str>, delta: &str) {
        let Some(stream_sid) = self.session.stream_sid.clone() else {
            debug!("Dropping AI audio before telephony stream start");
            return;
        };

        let bytes = match ServerEvent::decode_audio_delta(delta) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Dropping undecodable audio delta: {e}");
                return;
            }
        };

        self.session
            .turn
            .on_audio_delta(self.session.latest_media_timestamp_ms, item_id);

        for frame in self.rechunker.push(&bytes) {
            self.send_telephony(TwilioMessage::media(&stream_sid, &frame))
                .await;
        }

        let mark = self.session.turn.push_mark();
        self.send_telephony(TwilioMessage::mark(&stream_sid, &mark))
            .await;
    }

    // =========================================================================
    // Initialization gate
    // =========================================================================

    /// Send the one-time session configuration once both legs are ready.
    ///
    /// A no-op unless `started && ai_ready && !session_initialized`, so the
    /// arrival order of `start` and `session.created` does not matter and the
    /// configuration is sent exactly once per call.
    async fn try_init(&mut self) {
        if !(self.session.started && self.session.ai_ready) || self.session.session_initialized {
            return;
        }
        self.session.session_initialized = true;

        info!("Both legs ready, initializing AI session");
        let config = self.build_session_config();
        self.send_ai(ClientEvent::SessionUpdate { session: config })
            .await;

        if let Some(greeting) = self.settings.greeting.clone() {
            self.send_ai(ClientEvent::ConversationItemCreate {
                item: ConversationItem::user_text(greeting),
            })
            .await;
            self.send_ai(ClientEvent::ResponseCreate).await;
        }
    }

    fn build_session_config(&self) -> SessionConfig {
        let format = self.settings.audio_format.as_str().to_string();
        SessionConfig {
            modalities: Some(vec!["text".to_string(), "audio".to_string()]),
            instructions: Some(self.session.instructions.clone()),
            voice: Some(self.settings.voice.as_str().to_string()),
            input_audio_format: Some(format.clone()),
            output_audio_format: Some(format),
            turn_detection: Some(TurnDetection::ServerVad {
                threshold: self.settings.turn_detection.threshold,
                prefix_padding_ms: self.settings.turn_detection.prefix_padding_ms,
                silence_duration_ms: self.settings.turn_detection.silence_duration_ms,
            }),
            temperature: Some(self.settings.temperature),
        }
    }

    // =========================================================================
    // Closing protocol
    // =========================================================================

    /// The telephony leg has ended: discard per-call buffers and close the
    /// AI leg if it is still open. Safe to call more than once.
    pub async fn on_telephony_closed(&mut self) {
        self.telephony_closed = true;
        self.discard_call_state();
        if !self.ai_closed {
            self.ai_closed = true;
            let _ = self.ai_tx.send(RealtimeRoute::Close).await;
        }
    }

    /// The AI leg has ended: discard per-call buffers and close the telephony
    /// leg if it is still open. Safe to call more than once.
    pub async fn on_ai_closed(&mut self) {
        self.ai_closed = true;
        self.discard_call_state();
        if !self.telephony_closed {
            self.telephony_closed = true;
            let _ = self.telephony_tx.send(TelephonyRoute::Close).await;
        }
    }

    fn discard_call_state(&mut self) {
        self.rechunker.clear();
        self.session.turn.reset();
    }

    // =========================================================================
    // Outbound routing
    // =========================================================================

    async fn send_telephony(&self, message: TwilioMessage) {
        if self
            .telephony_tx
            .send(TelephonyRoute::Message(message))
            .await
            .is_err()
        {
            debug!("Telephony leg writer gone, dropping outbound message");
        }
    }

    async fn send_ai(&self, event: ClientEvent) {
        if self.ai_tx.send(RealtimeRoute::Event(event)).await.is_err() {
            debug!("AI leg writer gone, dropping outbound event");
        }
    }
}
