//! OpenAI Realtime API WebSocket message types.
//!
//! All events are JSON-encoded and sent over WebSocket, dispatched on the
//! `type` field.
//!
//! Client events (sent to server):
//! - session.update - Configure audio formats, voice, instructions, VAD
//! - input_audio_buffer.append - Append caller audio to the input buffer
//! - conversation.item.create - Add an item to the conversation
//! - response.create - Request a model response
//!
//! Server events (received from server): only the events the bridge acts on
//! are modeled here; anything else fails to parse and is dropped by the
//! connection task, which is the intended treatment for event kinds the core
//! does not consume.

use base64::prelude::*;
use serde::{Deserialize, Serialize};

// =============================================================================
// Session Configuration
// =============================================================================

/// Session configuration carried by `session.update`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Response modalities (text, audio)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modalities: Option<Vec<String>>,

    /// System instructions for the assistant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,

    /// Voice for audio output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,

    /// Input audio format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_audio_format: Option<String>,

    /// Output audio format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_audio_format: Option<String>,

    /// Turn detection configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turn_detection: Option<TurnDetection>,

    /// Temperature for response generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Turn detection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TurnDetection {
    /// Server-side voice activity detection
    #[serde(rename = "server_vad")]
    ServerVad {
        /// Activation threshold (0.0 to 1.0)
        threshold: f32,
        /// Audio included before detected speech, in ms
        prefix_padding_ms: u32,
        /// Silence that ends a turn, in ms
        silence_duration_ms: u32,
    },
}

// =============================================================================
// Conversation Items
// =============================================================================

/// Conversation item for `conversation.item.create`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationItem {
    /// Item type
    #[serde(rename = "type")]
    pub item_type: String,
    /// Item role (user, assistant, system)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Content parts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<ContentPart>>,
}

/// Content part within a conversation item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentPart {
    /// Content type (input_text, input_audio, text, audio)
    #[serde(rename = "type")]
    pub content_type: String,
    /// Text content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ConversationItem {
    /// A user text message item.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            item_type: "message".to_string(),
            role: Some("user".to_string()),
            content: Some(vec![ContentPart {
                content_type: "input_text".to_string(),
                text: Some(text.into()),
            }]),
        }
    }
}

// =============================================================================
// Client Events (sent to server)
// =============================================================================

/// Client events sent to the Realtime API.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    /// Update session configuration
    #[serde(rename = "session.update")]
    SessionUpdate {
        /// Session configuration
        session: SessionConfig,
    },

    /// Append audio to the input buffer
    #[serde(rename = "input_audio_buffer.append")]
    InputAudioBufferAppend {
        /// Base64-encoded audio data
        audio: String,
    },

    /// Create a conversation item
    #[serde(rename = "conversation.item.create")]
    ConversationItemCreate {
        /// Item to create
        item: ConversationItem,
    },

    /// Request a model response
    #[serde(rename = "response.create")]
    ResponseCreate,
}

// =============================================================================
// Server Events (received from server)
// =============================================================================

/// Server events received from the Realtime API.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    /// Error occurred
    #[serde(rename = "error")]
    Error {
        /// Error details
        error: ApiError,
    },

    /// Session created — the deterministic readiness signal for the AI leg
    #[serde(rename = "session.created")]
    SessionCreated {
        /// Session information
        session: SessionInfo,
    },

    /// Session configuration acknowledged
    #[serde(rename = "session.updated")]
    SessionUpdated {
        /// Session information
        session: SessionInfo,
    },

    /// Speech detected in the caller audio
    #[serde(rename = "input_audio_buffer.speech_started")]
    SpeechStarted {
        /// Audio start timestamp in ms
        audio_start_ms: u64,
        /// Item ID
        item_id: String,
    },

    /// Silence detected after caller speech
    #[serde(rename = "input_audio_buffer.speech_stopped")]
    SpeechStopped {
        /// Audio end timestamp in ms
        audio_end_ms: u64,
        /// Item ID
        item_id: String,
    },

    /// Audio chunk of the response being spoken
    #[serde(rename = "response.audio.delta")]
    AudioDelta {
        /// Response ID
        response_id: String,
        /// Item ID of the response item being spoken
        #[serde(default)]
        item_id: Option<String>,
        /// Base64-encoded audio delta
        delta: String,
    },

    /// Audio generation for an item complete
    #[serde(rename = "response.audio.done")]
    AudioDone {
        /// Item ID
        item_id: String,
    },

    /// Transcript of a finished spoken response
    #[serde(rename = "response.audio_transcript.done")]
    AudioTranscriptDone {
        /// Item ID
        item_id: String,
        /// Full transcript
        transcript: String,
    },

    /// Response complete
    #[serde(rename = "response.done")]
    ResponseDone {
        /// Response information
        response: ResponseInfo,
    },
}

impl ServerEvent {
    /// Decode base64 audio from an AudioDelta event.
    pub fn decode_audio_delta(delta: &str) -> Result<Vec<u8>, base64::DecodeError> {
        BASE64_STANDARD.decode(delta)
    }
}

// =============================================================================
// Supporting Types
// =============================================================================

/// API error information.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    /// Error type
    #[serde(rename = "type")]
    pub error_type: String,
    /// Error code
    #[serde(default)]
    pub code: Option<String>,
    /// Error message
    pub message: String,
}

/// Session information.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionInfo {
    /// Session ID
    pub id: String,
    /// Model in use
    #[serde(default)]
    pub model: Option<String>,
}

/// Response information.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseInfo {
    /// Response ID
    pub id: String,
    /// Response status
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_update_serialization() {
        let event = ClientEvent::SessionUpdate {
            session: SessionConfig {
                modalities: Some(vec!["text".to_string(), "audio".to_string()]),
                instructions: Some("Be helpful".to_string()),
                voice: Some("alloy".to_string()),
                input_audio_format: Some("g711_ulaw".to_string()),
                output_audio_format: Some("g711_ulaw".to_string()),
                turn_detection: Some(TurnDetection::ServerVad {
                    threshold: 0.5,
                    prefix_padding_ms: 300,
                    silence_duration_ms: 500,
                }),
                temperature: Some(0.7),
            },
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("session.update"));
        assert!(json.contains("g711_ulaw"));
        assert!(json.contains("server_vad"));
        assert!(json.contains("alloy"));
    }

    #[test]
    fn test_audio_append_passes_payload_through() {
        let event = ClientEvent::InputAudioBufferAppend {
            audio: "b2s=".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("input_audio_buffer.append"));
        assert!(json.contains("b2s="));
    }

    #[test]
    fn test_greeting_item_serialization() {
        let event = ClientEvent::ConversationItemCreate {
            item: ConversationItem::user_text("Greet the caller."),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("conversation.item.create"));
        assert!(json.contains(r#""type":"message""#));
        assert!(json.contains(r#""role":"user""#));
        assert!(json.contains("input_text"));
    }

    #[test]
    fn test_response_create_serialization() {
        let json = serde_json::to_string(&ClientEvent::ResponseCreate).unwrap();
        assert_eq!(json, r#"{"type":"response.create"}"#);
    }

    #[test]
    fn test_session_created_deserialization() {
        let json = r#"{
            "type": "session.created",
            "event_id": "event_1",
            "session": {"id": "sess_1", "object": "realtime.session", "model": "gpt-4o-realtime-preview"}
        }"#;
        let event: ServerEvent = serde_json::from_str(json).unwrap();
        match event {
            ServerEvent::SessionCreated { session } => {
                assert_eq!(session.id, "sess_1");
                assert_eq!(session.model.as_deref(), Some("gpt-4o-realtime-preview"));
            }
            _ => panic!("Expected SessionCreated variant"),
        }
    }

    #[test]
    fn test_audio_delta_deserialization_and_decode() {
        let payload = BASE64_STANDARD.encode([1u8, 2, 3]);
        let json = format!(
            r#"{{
                "type": "response.audio.delta",
                "response_id": "resp_1",
                "item_id": "item_1",
                "output_index": 0,
                "content_index": 0,
                "delta": "{payload}"
            }}"#
        );
        let event: ServerEvent = serde_json::from_str(&json).unwrap();
        match event {
            ServerEvent::AudioDelta { item_id, delta, .. } => {
                assert_eq!(item_id.as_deref(), Some("item_1"));
                assert_eq!(ServerEvent::decode_audio_delta(&delta).unwrap(), [1, 2, 3]);
            }
            _ => panic!("Expected AudioDelta variant"),
        }
    }

    #[test]
    fn test_audio_delta_without_item_id() {
        let json = r#"{"type": "response.audio.delta", "response_id": "resp_1", "delta": "AAAA"}"#;
        let event: ServerEvent = serde_json::from_str(json).unwrap();
        match event {
            ServerEvent::AudioDelta { item_id, .. } => assert!(item_id.is_none()),
            _ => panic!("Expected AudioDelta variant"),
        }
    }

    #[test]
    fn test_unmodeled_event_kind_fails_to_parse() {
        let json = r#"{"type": "rate_limits.updated", "rate_limits": []}"#;
        assert!(serde_json::from_str::<ServerEvent>(json).is_err());
    }

    #[test]
    fn test_error_event_deserialization() {
        let json = r#"{
            "type": "error",
            "error": {"type": "invalid_request_error", "message": "Test error"}
        }"#;
        let event: ServerEvent = serde_json::from_str(json).unwrap();
        match event {
            ServerEvent::Error { error } => {
                assert_eq!(error.error_type, "invalid_request_error");
                assert_eq!(error.message, "Test error");
            }
            _ => panic!("Expected Error variant"),
        }
    }
}
