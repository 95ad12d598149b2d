//! Frame sources feeding the transport layer.
//!
//! This crate never talks to a bus directly. The "physical" side is whatever
//! produces `(identifier, 8-byte payload)` pairs in arrival order:
//! - Text transcripts, one frame per line (`7E8021003AAAAAAAAAA`)
//! - In-memory queues for tests
//!
//! Sources are responsible for rejecting malformed records. Anything that
//! reaches the transport layer is a well-formed 8-byte [`Frame`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use isotp_trace::physical::{transcript::TranscriptReader, FrameSource};
//!
//! let mut reader = TranscriptReader::open("transcript.txt").unwrap();
//! while let Some(frame) = reader.receive_frame().unwrap() {
//!     println!("{}", frame);
//! }
//! ```

pub mod transcript;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

use crate::error::Result;
use crate::types::Frame;

/// Source of raw frames in arrival order
pub trait FrameSource {
    /// Returns the next frame, or `None` once the source is exhausted
    fn receive_frame(&mut self) -> Result<Option<Frame>>;
}

impl<S: FrameSource + ?Sized> FrameSource for &mut S {
    fn receive_frame(&mut self) -> Result<Option<Frame>> {
        (**self).receive_frame()
    }
}
