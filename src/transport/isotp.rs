use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace};

use super::TransportLayer;
use crate::error::Result;
use crate::types::{Config, Frame, FrameId};

const SF_PCI: u8 = 0x0; // Single Frame
const FF_PCI: u8 = 0x1; // First Frame
const CF_PCI: u8 = 0x2; // Consecutive Frame
const FC_PCI: u8 = 0x3; // Flow Control

/// Data bytes carried by a First Frame (bytes 2..8)
pub const FIRST_FRAME_DATA_LEN: usize = 6;
/// Data bytes carried by a Consecutive Frame (bytes 1..8)
pub const CONSECUTIVE_FRAME_DATA_LEN: usize = 7;
/// Largest message length a 12-bit First Frame can announce
pub const MAX_MESSAGE_LEN: usize = 0x0FFF;

/// Flow status nibble of a Flow Control frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStatus {
    ContinueToSend,
    Wait,
    Overflow,
    Unknown(u8),
}

impl From<u8> for FlowStatus {
    fn from(nibble: u8) -> Self {
        match nibble {
            0x0 => FlowStatus::ContinueToSend,
            0x1 => FlowStatus::Wait,
            0x2 => FlowStatus::Overflow,
            other => FlowStatus::Unknown(other),
        }
    }
}

impl fmt::Display for FlowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlowStatus::ContinueToSend => "CTS",
            FlowStatus::Wait => "Wait",
            FlowStatus::Overflow => "Overflow",
            FlowStatus::Unknown(_) => "Unknown",
        };
        f.write_str(name)
    }
}

/// Decoded STmin (minimum separation time between Consecutive Frames)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeparationTime {
    /// 0x00..=0x7F
    Millis(u8),
    /// 0xF1..=0xF9, in 100us steps
    Micros(u16),
    /// Any reserved encoding, kept raw
    Reserved(u8),
}

impl From<u8> for SeparationTime {
    fn from(raw: u8) -> Self {
        match raw {
            0x00..=0x7F => SeparationTime::Millis(raw),
            0xF1..=0xF9 => SeparationTime::Micros(u16::from(raw - 0xF0) * 100),
            _ => SeparationTime::Reserved(raw),
        }
    }
}

impl fmt::Display for SeparationTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeparationTime::Millis(ms) => write!(f, "{}ms", ms),
            SeparationTime::Micros(us) => write!(f, "{}us", us),
            SeparationTime::Reserved(raw) => write!(f, "0x{:02X}", raw),
        }
    }
}

/// A frame classified by its PCI type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsoTpFrame<'a> {
    SingleFrame {
        data: &'a [u8],
    },
    FirstFrame {
        length: usize,
        data: &'a [u8],
    },
    ConsecutiveFrame {
        sequence: u8,
        data: &'a [u8],
    },
    FlowControl {
        status: FlowStatus,
        block_size: u8,
        separation_time: SeparationTime,
    },
    Unknown {
        pci_type: u8,
    },
}

impl<'a> IsoTpFrame<'a> {
    /// Splits the payload according to the PCI in byte 0
    pub fn classify(payload: &'a [u8; 8]) -> Self {
        let pci = payload[0];
        let low = pci & 0x0F;
        match pci >> 4 {
            SF_PCI => {
                // Lengths above 7 cannot fit; keep what the frame holds
                let length = usize::from(low).min(CONSECUTIVE_FRAME_DATA_LEN);
                IsoTpFrame::SingleFrame {
                    data: &payload[1..1 + length],
                }
            }
            FF_PCI => IsoTpFrame::FirstFrame {
                length: (usize::from(low) << 8) | usize::from(payload[1]),
                data: &payload[2..],
            },
            CF_PCI => IsoTpFrame::ConsecutiveFrame {
                sequence: low,
                data: &payload[1..],
            },
            FC_PCI => IsoTpFrame::FlowControl {
                status: FlowStatus::from(low),
                block_size: payload[1],
                separation_time: SeparationTime::from(payload[2]),
            },
            pci_type => IsoTpFrame::Unknown { pci_type },
        }
    }
}

/// A reassembled application message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEvent {
    pub id: FrameId,
    pub data: Vec<u8>,
}

/// A decoded Flow Control frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowControlEvent {
    pub id: FrameId,
    pub status: FlowStatus,
    pub block_size: u8,
    pub separation_time: SeparationTime,
}

/// Output of the reassembly engine for a single frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedEvent {
    Message(MessageEvent),
    FlowControl(FlowControlEvent),
}

impl DecodedEvent {
    /// Identifier of the frame that produced this event
    pub fn id(&self) -> &str {
        match self {
            DecodedEvent::Message(msg) => &msg.id,
            DecodedEvent::FlowControl(fc) => &fc.id,
        }
    }
}

/// ISO-TP reassembly configuration
#[derive(Debug, Clone, Default)]
pub struct IsoTpConfig {
    /// Drop an assembly when a Consecutive Frame carries an unexpected
    /// sequence number. Off by default: sequence numbers are not checked.
    pub strict_sequence: bool,
}

impl Config for IsoTpConfig {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// In-progress multi-frame message for one identifier.
///
/// An entry only exists in the engine's map while the assembly is active.
#[derive(Debug)]
struct AssemblyState {
    expected_length: usize,
    buffer: Vec<u8>,
    next_sequence: u8,
}

impl AssemblyState {
    fn start(expected_length: usize, data: &[u8]) -> Self {
        let mut buffer = Vec::with_capacity(expected_length.max(data.len()));
        buffer.extend_from_slice(data);
        Self {
            expected_length,
            buffer,
            next_sequence: 1,
        }
    }

    fn is_complete(&self) -> bool {
        self.buffer.len() >= self.expected_length
    }

    fn into_message(mut self) -> Vec<u8> {
        self.buffer.truncate(self.expected_length);
        self.buffer
    }
}

/// Per-identifier ISO-TP reassembly engine.
///
/// Frames are processed strictly in arrival order and each produces at most
/// one [`DecodedEvent`]. Malformed or out-of-protocol frames never fail:
/// they are dropped without touching state.
#[derive(Debug, Default)]
pub struct ReassemblyEngine {
    config: IsoTpConfig,
    assemblies: HashMap<FrameId, AssemblyState>,
}

impl ReassemblyEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with the given configuration
    pub fn with_config(config: IsoTpConfig) -> Self {
        Self {
            config,
            assemblies: HashMap::new(),
        }
    }

    pub fn config(&self) -> &IsoTpConfig {
        &self.config
    }

    /// Number of identifiers with a multi-frame message in progress
    pub fn in_progress(&self) -> usize {
        self.assemblies.len()
    }

    pub fn is_assembling(&self, id: &str) -> bool {
        self.assemblies.contains_key(id)
    }

    /// Classifies the frame and dispatches it to the matching handler
    pub fn process(&mut self, frame: &Frame) -> Option<DecodedEvent> {
        match IsoTpFrame::classify(&frame.data) {
            IsoTpFrame::SingleFrame { data } => self.handle_single_frame(&frame.id, data),
            IsoTpFrame::FirstFrame { length, data } => {
                self.handle_first_frame(&frame.id, length, data)
            }
            IsoTpFrame::ConsecutiveFrame { sequence, data } => {
                self.handle_consecutive_frame(&frame.id, sequence, data)
            }
            IsoTpFrame::FlowControl {
                status,
                block_size,
                separation_time,
            } => Some(DecodedEvent::FlowControl(FlowControlEvent {
                id: frame.id.clone(),
                status,
                block_size,
                separation_time,
            })),
            IsoTpFrame::Unknown { pci_type } => {
                trace!(id = %frame.id, pci_type, "dropping frame with unknown PCI type");
                None
            }
        }
    }

    fn handle_single_frame(&mut self, id: &str, data: &[u8]) -> Option<DecodedEvent> {
        if self.assemblies.remove(id).is_some() {
            debug!(id, "single frame discarded in-progress assembly");
        }
        Some(DecodedEvent::Message(MessageEvent {
            id: id.to_owned(),
            data: data.to_vec(),
        }))
    }

    fn handle_first_frame(
        &mut self,
        id: &str,
        length: usize,
        data: &[u8],
    ) -> Option<DecodedEvent> {
        let state = AssemblyState::start(length, data);
        if self.assemblies.insert(id.to_owned(), state).is_some() {
            debug!(id, length, "first frame replaced in-progress assembly");
        } else {
            trace!(id, length, "first frame started assembly");
        }
        // Completion is only checked after a Consecutive Frame, even when
        // the announced length already fits in the first frame.
        None
    }

    fn handle_consecutive_frame(
        &mut self,
        id: &str,
        sequence: u8,
        data: &[u8],
    ) -> Option<DecodedEvent> {
        let Some(state) = self.assemblies.get_mut(id) else {
            trace!(id, sequence, "dropping consecutive frame without first frame");
            return None;
        };

        if self.config.strict_sequence {
            if sequence != state.next_sequence {
                debug!(
                    id,
                    expected = state.next_sequence,
                    found = sequence,
                    "sequence mismatch, discarding assembly"
                );
                self.assemblies.remove(id);
                return None;
            }
            state.next_sequence = (state.next_sequence + 1) & 0x0F;
        }

        state.buffer.extend_from_slice(data);
        if !state.is_complete() {
            return None;
        }

        let state = self.assemblies.remove(id)?;
        let data = state.into_message();
        trace!(id, len = data.len(), "assembly complete");
        Some(DecodedEvent::Message(MessageEvent {
            id: id.to_owned(),
            data,
        }))
    }
}

impl TransportLayer for ReassemblyEngine {
    type Config = IsoTpConfig;

    fn new(config: Self::Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn process(&mut self, frame: &Frame) -> Option<DecodedEvent> {
        ReassemblyEngine::process(self, frame)
    }

    fn reset(&mut self) {
        self.assemblies.clear();
    }
}
