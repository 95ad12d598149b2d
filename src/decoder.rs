use bitflags::bitflags;
use tracing::{info, trace};

use crate::application::EventSink;
use crate::error::Result;
use crate::physical::FrameSource;
use crate::transport::isotp::{DecodedEvent, IsoTpConfig, ReassemblyEngine};
use crate::transport::TransportLayer;
use crate::types::{Config, Frame};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DecoderOptions: u32 {
        const NONE = 0;
        const FLOW_CONTROL = 1;
        const STRICT_SEQUENCE = 2;
    }
}

impl Default for DecoderOptions {
    fn default() -> Self {
        DecoderOptions::FLOW_CONTROL
    }
}

/// Decoder pipeline configuration
#[derive(Debug, Clone, Default)]
pub struct DecoderConfig {
    pub options: DecoderOptions,
}

impl DecoderConfig {
    pub fn include_flow_control(&self) -> bool {
        self.options.contains(DecoderOptions::FLOW_CONTROL)
    }

    /// Transport configuration derived from the options
    pub fn isotp(&self) -> IsoTpConfig {
        IsoTpConfig {
            strict_sequence: self.options.contains(DecoderOptions::STRICT_SEQUENCE),
        }
    }
}

impl Config for DecoderConfig {
    fn validate(&self) -> Result<()> {
        self.isotp().validate()
    }
}

/// Counters collected over a decoding run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeSummary {
    pub frames: usize,
    pub messages: usize,
    pub flow_control: usize,
    pub flow_control_suppressed: usize,
}

/// Source → transport → sink pipeline.
///
/// The transport layer always decodes Flow Control frames; whether they are
/// forwarded is decided here, from [`DecoderOptions::FLOW_CONTROL`].
pub struct Decoder<T: TransportLayer = ReassemblyEngine> {
    config: DecoderConfig,
    transport: T,
    summary: DecodeSummary,
}

impl Decoder<ReassemblyEngine> {
    pub fn new(config: DecoderConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReassemblyEngine::with_config(config.isotp());
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: TransportLayer> Decoder<T> {
    /// Creates a decoder on top of an existing transport layer
    pub fn with_transport(config: DecoderConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            summary: DecodeSummary::default(),
        }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn summary(&self) -> DecodeSummary {
        self.summary
    }

    /// Processes one frame, returning the event to forward, if any
    pub fn decode_frame(&mut self, frame: &Frame) -> Option<DecodedEvent> {
        self.summary.frames += 1;
        let event = self.transport.process(frame)?;
        trace!(id = event.id(), "decoded event");
        match event {
            DecodedEvent::Message(_) => self.summary.messages += 1,
            DecodedEvent::FlowControl(_) if !self.config.include_flow_control() => {
                self.summary.flow_control_suppressed += 1;
                return None;
            }
            DecodedEvent::FlowControl(_) => self.summary.flow_control += 1,
        }
        Some(event)
    }

    /// Drains `source` into `sink`, preserving frame order
    pub fn run<S, K>(&mut self, mut source: S, mut sink: K) -> Result<DecodeSummary>
    where
        S: FrameSource,
        K: EventSink,
    {
        while let Some(frame) = source.receive_frame()? {
            if let Some(event) = self.decode_frame(&frame) {
                sink.emit(&event)?;
            }
        }
        sink.flush()?;

        info!(
            frames = self.summary.frames,
            messages = self.summary.messages,
            flow_control = self.summary.flow_control,
            suppressed = self.summary.flow_control_suppressed,
            "decoding finished"
        );
        Ok(self.summary)
    }
}
