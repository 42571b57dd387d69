//! OpenAI Realtime API configuration types: endpoint, model, voice and
//! audio format selection.

use serde::{Deserialize, Serialize};

/// OpenAI Realtime API WebSocket endpoint.
pub const OPENAI_REALTIME_URL: &str = "wss://api.openai.com/v1/realtime";

/// Default Realtime model.
pub const DEFAULT_REALTIME_MODEL: &str = "gpt-4o-realtime-preview-2024-10-01";

// =============================================================================
// Voices
// =============================================================================

/// Available voices for the Realtime API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RealtimeVoice {
    /// Alloy voice (default)
    #[default]
    Alloy,
    /// Ash voice
    Ash,
    /// Ballad voice
    Ballad,
    /// Coral voice
    Coral,
    /// Echo voice
    Echo,
    /// Sage voice
    Sage,
    /// Shimmer voice
    Shimmer,
    /// Verse voice
    Verse,
}

impl RealtimeVoice {
    /// Convert to the API parameter value.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alloy => "alloy",
            Self::Ash => "ash",
            Self::Ballad => "ballad",
            Self::Coral => "coral",
            Self::Echo => "echo",
            Self::Sage => "sage",
            Self::Shimmer => "shimmer",
            Self::Verse => "verse",
        }
    }

    /// Parse from string, with fallback to default.
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "alloy" => Self::Alloy,
            "ash" => Self::Ash,
            "ballad" => Self::Ballad,
            "coral" => Self::Coral,
            "echo" => Self::Echo,
            "sage" => Self::Sage,
            "shimmer" => Self::Shimmer,
            "verse" => Self::Verse,
            _ => Self::default(),
        }
    }
}

impl std::fmt::Display for RealtimeVoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Audio Formats
// =============================================================================

/// Session audio formats supported by the Realtime API.
///
/// The bridge always runs `g711_ulaw` end to end — it matches the telephony
/// leg's codec, so payloads pass through without transcoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AudioFormat {
    /// 8-bit µ-law companded audio at 8 kHz (default)
    #[default]
    #[serde(rename = "g711_ulaw")]
    G711Ulaw,
    /// 8-bit A-law companded audio at 8 kHz
    #[serde(rename = "g711_alaw")]
    G711Alaw,
    /// PCM 16-bit signed little-endian at 24 kHz
    #[serde(rename = "pcm16")]
    Pcm16,
}

impl AudioFormat {
    /// Convert to the API parameter value.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::G711Ulaw => "g711_ulaw",
            Self::G711Alaw => "g711_alaw",
            Self::Pcm16 => "pcm16",
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_parse_roundtrip() {
        for voice in [
            RealtimeVoice::Alloy,
            RealtimeVoice::Ash,
            RealtimeVoice::Ballad,
            RealtimeVoice::Coral,
            RealtimeVoice::Echo,
            RealtimeVoice::Sage,
            RealtimeVoice::Shimmer,
            RealtimeVoice::Verse,
        ] {
            assert_eq!(RealtimeVoice::from_str_or_default(voice.as_str()), voice);
        }
    }

    #[test]
    fn test_unknown_voice_falls_back_to_default() {
        assert_eq!(
            RealtimeVoice::from_str_or_default("not-a-voice"),
            RealtimeVoice::Alloy
        );
    }

    #[test]
    fn test_audio_format_wire_names() {
        assert_eq!(AudioFormat::G711Ulaw.as_str(), "g711_ulaw");
        assert_eq!(AudioFormat::default(), AudioFormat::G711Ulaw);
    }
}
