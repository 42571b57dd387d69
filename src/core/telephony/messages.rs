//! Twilio Media Streams wire message types.
//!
//! One JSON object per WebSocket text frame, dispatched on the `event` field.
//! Inbound events carry stream lifecycle (`start`/`stop`), caller audio
//! (`media`), and playback acknowledgements (`mark`); outbound messages carry
//! AI audio back to the caller plus the markers used to observe playback
//! progress. Payloads are base64-encoded µ-law audio in both directions.

use base64::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// Inbound Events (Twilio -> bridge)
// =============================================================================

/// Inbound events from the telephony media stream.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum TwilioEvent {
    /// Handshake preamble, carries no call state
    Connected,

    /// Stream metadata; marks the telephony leg as started
    Start {
        /// Stream descriptor
        start: StartMessage,
    },

    /// Caller audio chunk
    Media {
        /// Audio payload and timing
        media: MediaMessage,
    },

    /// Playback marker acknowledgement
    Mark {
        /// Echoed marker
        mark: MarkMessage,
    },

    /// Stream ended by the provider
    Stop,
}

/// Payload of a `start` event.
#[derive(Debug, Clone, Deserialize)]
pub struct StartMessage {
    /// Stream identifier, echoed on every outbound message
    #[serde(rename = "streamSid")]
    pub stream_sid: String,

    /// Parent call identifier
    #[serde(rename = "callSid", default)]
    pub call_sid: Option<String>,
}

/// Payload of a `media` event.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaMessage {
    /// Milliseconds since stream start. Arrives as a decimal string on the
    /// wire; a bare number is accepted too.
    #[serde(default, deserialize_with = "timestamp_ms")]
    pub timestamp: u64,

    /// Base64-encoded µ-law audio
    pub payload: String,
}

/// Payload of a `mark` event.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkMessage {
    /// Name of the acknowledged marker
    pub name: String,
}

fn timestamp_ms<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

// =============================================================================
// Outbound Messages (bridge -> Twilio)
// =============================================================================

/// Outbound messages to the telephony media stream.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum TwilioMessage {
    /// AI audio frame for playback
    Media {
        /// Stream identifier
        #[serde(rename = "streamSid")]
        stream_sid: String,
        /// Frame payload
        media: OutboundMedia,
    },

    /// Playback marker; echoed back by the provider once the audio queued
    /// before it has played
    Mark {
        /// Stream identifier
        #[serde(rename = "streamSid")]
        stream_sid: String,
        /// Marker name
        mark: OutboundMark,
    },
}

/// Media payload of an outbound `media` message.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundMedia {
    /// Base64-encoded µ-law frame
    pub payload: String,
}

/// Marker payload of an outbound `mark` message.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundMark {
    /// Marker name
    pub name: String,
}

impl TwilioMessage {
    /// Build an outbound `media` message from a raw audio frame.
    pub fn media(stream_sid: &str, frame: &[u8]) -> Self {
        TwilioMessage::Media {
            stream_sid: stream_sid.to_string(),
            media: OutboundMedia {
                payload: BASE64_STANDARD.encode(frame),
            },
        }
    }

    /// Build an outbound `mark` message.
    pub fn mark(stream_sid: &str, name: &str) -> Self {
        TwilioMessage::Mark {
            stream_sid: stream_sid.to_string(),
            mark: OutboundMark {
                name: name.to_string(),
            },
        }
    }
}
