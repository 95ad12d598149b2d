use std::fmt;

use crate::error::{DecoderError, Result};

/// Payload size of a classic CAN frame
pub const FRAME_PAYLOAD_LEN: usize = 8;

/// Frame identifier as it appears in the transcript (e.g. `"7E8"`).
///
/// The token is opaque: it keys reassembly state and is echoed in output,
/// but is never interpreted numerically.
pub type FrameId = String;

/// Fixed-size frame payload
pub type FrameData = [u8; FRAME_PAYLOAD_LEN];

/// Raw link-layer frame fed to the transport layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub id: FrameId,
    pub data: FrameData,
}

impl Frame {
    /// Builds a frame, rejecting payloads that are not exactly 8 bytes long
    pub fn new(id: impl Into<FrameId>, data: &[u8]) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(DecoderError::InvalidParameter);
        }
        let data: FrameData = data
            .try_into()
            .map_err(|_| DecoderError::InvalidPayloadLength(data.len()))?;
        Ok(Self { id, data })
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.id, hex::encode_upper(self.data))
    }
}

/// Configuration trait that must be implemented by all protocol configurations
pub trait Config: Send + Sync {
    fn validate(&self) -> Result<()>;
}
