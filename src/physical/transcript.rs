use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use super::FrameSource;
use crate::error::{DecoderError, Result};
use crate::types::{Frame, FRAME_PAYLOAD_LEN};

/// Characters taken by the identifier at the start of each record
pub const ID_LEN: usize = 3;
/// Shortest record that can hold an identifier and a full payload
pub const MIN_RECORD_LEN: usize = ID_LEN + 2 * FRAME_PAYLOAD_LEN;

/// Parses one transcript line.
///
/// Whitespace anywhere in the line is ignored. Returns `Ok(None)` for blank
/// lines and an error for records that cannot be turned into a frame.
pub fn parse_record(line: &str) -> Result<Option<Frame>> {
    let record: String = line
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();
    if record.is_empty() {
        return Ok(None);
    }
    if record.len() < MIN_RECORD_LEN {
        return Err(DecoderError::MalformedRecord("record too short"));
    }
    if !record.is_char_boundary(ID_LEN) {
        return Err(DecoderError::MalformedRecord("identifier is not ASCII"));
    }

    let (id, payload) = record.split_at(ID_LEN);
    let data =
        hex::decode(payload).map_err(|_| DecoderError::MalformedRecord("payload is not hex"))?;
    if data.len() != FRAME_PAYLOAD_LEN {
        return Err(DecoderError::MalformedRecord("payload is not 8 bytes"));
    }
    Frame::new(id, &data).map(Some)
}

/// Reads frames from a line-oriented text transcript.
///
/// Malformed records are skipped and counted; they never reach the caller.
pub struct TranscriptReader<R> {
    reader: R,
    line: String,
    line_number: usize,
    skipped: usize,
}

impl TranscriptReader<BufReader<File>> {
    /// Opens a transcript file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> TranscriptReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            line_number: 0,
            skipped: 0,
        }
    }

    /// Number of records skipped as malformed so far
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Number of lines consumed so far
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

impl<R: BufRead> FrameSource for TranscriptReader<R> {
    fn receive_frame(&mut self) -> Result<Option<Frame>> {
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            match parse_record(&self.line) {
                Ok(Some(frame)) => return Ok(Some(frame)),
                Ok(None) => continue,
                Err(err) => {
                    debug!(line = self.line_number, %err, "skipping transcript record");
                    self.skipped += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read_all(text: &str) -> (Vec<Frame>, usize) {
        let mut reader = TranscriptReader::new(Cursor::new(text));
        let mut frames = Vec::new();
        while let Some(frame) = reader.receive_frame().unwrap() {
            frames.push(frame);
        }
        (frames, reader.skipped())
    }

    #[test]
    fn test_parse_record() {
        let frame = parse_record("7E8021003AAAAAAAAAA").unwrap().unwrap();
        assert_eq!(frame.id, "7E8");
        assert_eq!(frame.data, [0x02, 0x10, 0x03, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA]);
    }

    #[test]
    fn test_parse_record_ignores_whitespace() {
        let frame = parse_record("  7E0 02 10 03 aa aa aa aa aa\r\n")
            .unwrap()
            .unwrap();
        assert_eq!(frame.id, "7E0");
        assert_eq!(frame.data, [0x02, 0x10, 0x03, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA]);
    }

    #[test]
    fn test_parse_record_blank() {
        assert!(parse_record("").unwrap().is_none());
        assert!(parse_record(" \t\r\n").unwrap().is_none());
    }

    #[test]
    fn test_parse_record_malformed() {
        // Too short
        assert!(parse_record("7E80210").is_err());
        // Odd number of hex digits
        assert!(parse_record("7E8021003AAAAAAAAAAA").is_err());
        // Non-hex characters
        assert!(parse_record("7E8021003AAAAAAAAZZ").is_err());
        // Nine bytes
        assert!(parse_record("7E8021003AAAAAAAAAABB").is_err());
        // Multi-byte character inside the identifier
        assert!(parse_record("7Eé021003AAAAAAAAAA").is_err());
    }

    #[test]
    fn test_reader_skips_malformed_lines() {
        let text = "7E0021003AAAAAAAAAA\n\
                    \n\
                    garbage\n\
                    7E8065003003201F4AA\n\
                    7E8XX\n";
        let (frames, skipped) = read_all(text);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].id, "7E0");
        assert_eq!(frames[1].id, "7E8");
        assert_eq!(skipped, 2);
    }

    #[test]
    fn test_reader_handles_missing_trailing_newline() {
        let (frames, skipped) = read_all("7E0021003AAAAAAAAAA\r\n7E8025001AAAAAAAAAA");
        assert_eq!(frames.len(), 2);
        assert_eq!(skipped, 0);
    }

    #[test]
    fn test_open_missing_file() {
        let err = TranscriptReader::open("/nonexistent/transcript.txt")
            .err()
            .unwrap();
        assert!(matches!(err, DecoderError::Io(_)));
    }
}
