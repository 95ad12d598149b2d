use std::fmt;
use std::io::Write;

use super::{DecodedEvent, EventSink, FlowControlEvent, MessageEvent};
use crate::error::Result;

impl fmt::Display for MessageEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, hex::encode_upper(&self.data))
    }
}

impl fmt::Display for FlowControlEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: FC({}, BS={}, STmin={})",
            self.id, self.status, self.block_size, self.separation_time
        )
    }
}

impl fmt::Display for DecodedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedEvent::Message(msg) => fmt::Display::fmt(msg, f),
            DecodedEvent::FlowControl(fc) => fmt::Display::fmt(fc, f),
        }
    }
}

/// Writes one line of text per event
pub struct TextSink<W: Write> {
    writer: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> EventSink for TextSink<W> {
    fn emit(&mut self, event: &DecodedEvent) -> Result<()> {
        writeln!(self.writer, "{}", event)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
