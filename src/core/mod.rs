//! Core call-bridging logic.
//!
//! Everything with real protocol or state-machine complexity lives here:
//! the per-call [`bridge::ConnectionBridge`], the two legs' wire vocabularies
//! ([`telephony`], [`realtime`]), audio re-framing ([`audio`]), per-call state
//! ([`session`]) and instruction composition ([`instructions`]). The HTTP
//! surface in `handlers`/`routes` is glue around this module.

pub mod audio;
pub mod bridge;
pub mod instructions;
pub mod realtime;
pub mod session;
pub mod telephony;

pub use audio::{FRAME_SIZE, FrameRechunker};
pub use bridge::{BridgeSettings, ConnectionBridge, TurnDetectionSettings};
pub use session::{CallSession, TurnTracker};
