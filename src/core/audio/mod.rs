//! Audio utilities for the telephony leg.

mod rechunker;

pub use rechunker::{FRAME_SIZE, FrameRechunker};
