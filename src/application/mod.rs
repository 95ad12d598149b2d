//! Consumers of decoded ISO-TP traffic.
//!
//! The transport layer turns frames into [`DecodedEvent`]s; this module
//! decides where they go:
//! - [`text::TextSink`] renders each event as one line of text, in the same
//!   format older tooling printed (`7E8: 5003003201F4`,
//!   `7E0: FC(CTS, BS=8, STmin=10ms)`)
//! - `Vec<DecodedEvent>` collects events in memory
//!
//! # Examples
//!
//! ```rust
//! use isotp_trace::application::{text::TextSink, EventSink};
//! use isotp_trace::transport::ReassemblyEngine;
//! use isotp_trace::types::Frame;
//!
//! let mut engine = ReassemblyEngine::new();
//! let mut sink = TextSink::new(Vec::new());
//!
//! let frame = Frame::new("7E8", &[0x02, 0x50, 0x03, 0, 0, 0, 0, 0]).unwrap();
//! if let Some(event) = engine.process(&frame) {
//!     sink.emit(&event).unwrap();
//! }
//! assert_eq!(sink.into_inner(), b"7E8: 5003\n");
//! ```

pub mod text;

use crate::error::Result;

pub use crate::transport::isotp::{DecodedEvent, FlowControlEvent, MessageEvent};
pub use text::TextSink;

/// Receiver of decoded events, called in frame arrival order
pub trait EventSink {
    fn emit(&mut self, event: &DecodedEvent) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl EventSink for Vec<DecodedEvent> {
    fn emit(&mut self, event: &DecodedEvent) -> Result<()> {
        self.push(event.clone());
        Ok(())
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: &DecodedEvent) -> Result<()> {
        (**self).emit(event)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}
