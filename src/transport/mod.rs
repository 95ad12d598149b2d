pub mod isotp;

use crate::error::Result;
use crate::types::{Config, Frame};

pub use isotp::{DecodedEvent, FlowControlEvent, MessageEvent, ReassemblyEngine};

/// Transport layer trait that must be implemented by ISO-TP
pub trait TransportLayer: Send {
    type Config: Config;

    fn new(config: Self::Config) -> Result<Self>
    where
        Self: Sized;
    /// Feeds one frame, returning the event it completes, if any
    fn process(&mut self, frame: &Frame) -> Option<DecodedEvent>;
    /// Drops every in-progress assembly
    fn reset(&mut self);
}
