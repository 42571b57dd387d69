//! Telephony leg protocol: Twilio Media Streams over WebSocket.

pub mod messages;

pub use messages::{
    MarkMessage, MediaMessage, StartMessage, TwilioEvent, TwilioMessage,
};

/// Routing for frames headed to the telephony leg's socket writer.
///
/// The per-call handler drains these from a channel into the WebSocket,
/// so event processing never blocks on network writes.
#[derive(Debug)]
pub enum TelephonyRoute {
    /// JSON text frame
    Message(TwilioMessage),
    /// Close the connection
    Close,
}
