//! Fixed-size re-framing of streamed audio.
//!
//! The AI leg delivers decoded audio in arbitrarily sized chunks; the
//! telephony leg only accepts frames of exactly [`FRAME_SIZE`] bytes.
//! [`FrameRechunker`] buffers incoming bytes and drains them as complete
//! frames in arrival order, carrying any partial tail forward to the next
//! chunk. A partial frame is never emitted.

use bytes::{Bytes, BytesMut};

/// Telephony media frame size in bytes: 20 ms of 8 kHz mono µ-law audio.
pub const FRAME_SIZE: usize = 160;

/// Buffers raw audio bytes and emits exact [`FRAME_SIZE`] frames.
///
/// Conservation invariant: at any point,
/// `emitted bytes + buffered() == total bytes pushed`.
#[derive(Debug, Default)]
pub struct FrameRechunker {
    pending: BytesMut,
}

impl FrameRechunker {
    pub fn new() -> Self {
        Self {
            pending: BytesMut::new(),
        }
    }

    /// Append a chunk and drain every complete frame it makes available.
    ///
    /// Frames come out in the order their bytes arrived. The remainder
    /// (< [`FRAME_SIZE`] bytes) stays buffered for the next push.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Bytes> {
        self.pending.extend_from_slice(chunk);

        let mut frames = Vec::with_capacity(self.pending.len() / FRAME_SIZE);
        while self.pending.len() >= FRAME_SIZE {
            frames.push(self.pending.split_to(FRAME_SIZE).freeze());
        }
        frames
    }

    /// Number of bytes currently buffered awaiting a full frame.
    pub fn buffered(&self) -> usize {
        self.pending.len()
    }

    /// Discard any buffered remainder. Called when a call ends so no audio
    /// leaks into a later call.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
