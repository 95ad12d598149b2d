use std::collections::VecDeque;

use super::FrameSource;
use crate::error::{DecoderError, Result};
use crate::types::Frame;

/// Mock frame source for testing
#[derive(Debug, Default)]
pub struct MockSource {
    frames: VecDeque<Frame>,
    fail_after: Option<usize>,
}

impl MockSource {
    /// Creates a mock source that replays the given frames in order
    pub fn new(frames: impl IntoIterator<Item = Frame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            fail_after: None,
        }
    }

    /// Creates a mock source from `(id, payload)` pairs
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, [u8; 8])>) -> Result<Self> {
        let frames = pairs
            .into_iter()
            .map(|(id, data)| Frame::new(id, &data))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(frames))
    }

    /// Creates a mock source that reports an I/O error after `count` frames
    pub fn failing_after(frames: impl IntoIterator<Item = Frame>, count: usize) -> Self {
        Self {
            fail_after: Some(count),
            ..Self::new(frames)
        }
    }

    /// Frames not yet received
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for MockSource {
    fn receive_frame(&mut self) -> Result<Option<Frame>> {
        if let Some(remaining) = self.fail_after.as_mut() {
            if *remaining == 0 {
                return Err(DecoderError::Io(std::io::Error::other("mock source failure")));
            }
            *remaining -= 1;
        }
        Ok(self.frames.pop_front())
    }
}
