// OSI Layer modules
pub mod application; // Event sinks and text rendering
pub mod physical; // Frame sources (transcripts, mocks)
pub mod transport; // ISO-TP reassembly

// Pipeline tying the layers together
pub mod decoder;

// Re-exports for convenience
pub use application::{text::TextSink, EventSink};
pub use decoder::{DecodeSummary, Decoder, DecoderConfig, DecoderOptions};
pub use physical::{transcript::TranscriptReader, FrameSource};
pub use transport::isotp::{self, DecodedEvent, ReassemblyEngine};

// Common types and traits
pub mod error;
pub mod types;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
