//! AI leg: OpenAI Realtime API over WebSocket.
//!
//! The bridge talks to the Realtime API as a plain duplex event stream:
//! [`RealtimeLeg`] owns the connection task, client events go out through a
//! channel, parsed server events come back through another. There is no
//! automatic reconnection — when the AI leg drops, the call ends.
//!
//! # Audio Format
//!
//! The session is configured for `g711_ulaw` in both directions so audio can
//! pass between the legs without transcoding.

mod client;
pub mod config;
pub mod messages;

use thiserror::Error;

pub use client::{RealtimeLeg, RealtimeRoute};
pub use config::{
    AudioFormat, DEFAULT_REALTIME_MODEL, OPENAI_REALTIME_URL, RealtimeVoice,
};

/// Errors that can occur while opening the AI leg.
#[derive(Debug, Error)]
pub enum RealtimeError {
    /// Connection to the provider failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),
}

/// Result alias for realtime operations.
pub type RealtimeResult<T> = Result<T, RealtimeError>;
