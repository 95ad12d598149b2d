//! isotp-trace — reassemble ISO-TP messages from a CAN frame transcript.
//!
//! Each transcript line holds a 3-character identifier followed by 16 hex
//! digits of payload. Decoded messages and Flow Control frames are printed
//! to stdout in arrival order; diagnostics go to stderr.

use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use isotp_trace::{Decoder, DecoderConfig, DecoderOptions, TextSink, TranscriptReader};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "isotp-trace",
    about = "Reassemble ISO-TP messages from a CAN transcript",
    version
)]
struct Cli {
    /// Transcript file to decode
    #[arg(default_value = "transcript.txt")]
    input: PathBuf,

    /// Do not print Flow Control frames
    #[arg(long = "no-fc")]
    no_fc: bool,

    /// Drop multi-frame messages whose sequence numbers skip or repeat
    #[arg(long)]
    strict_sequence: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn decoder_config(&self) -> DecoderConfig {
        let mut options = DecoderOptions::default();
        options.set(DecoderOptions::FLOW_CONTROL, !self.no_fc);
        options.set(DecoderOptions::STRICT_SEQUENCE, self.strict_sequence);
        DecoderConfig { options }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let mut reader = TranscriptReader::open(&cli.input)
        .with_context(|| format!("Failed to open input file: {}", cli.input.display()))?;
    let sink = TextSink::new(BufWriter::new(io::stdout().lock()));

    let mut decoder = Decoder::new(cli.decoder_config())?;
    decoder
        .run(&mut reader, sink)
        .with_context(|| format!("Failed to decode {}", cli.input.display()))?;
    info!(
        lines = reader.line_number(),
        skipped = reader.skipped(),
        "transcript consumed"
    );

    Ok(())
}
