use std::io::Cursor;

use isotp_trace::application::{text::TextSink, DecodedEvent};
use isotp_trace::decoder::{DecodeSummary, Decoder, DecoderConfig, DecoderOptions};
use isotp_trace::error::DecoderError;
use isotp_trace::physical::transcript::TranscriptReader;
use isotp_trace::transport::isotp::MessageEvent;

// Tester on 7E0 reads the VIN (22 F190) from the ECU on 7E8
const VIN_SESSION: &str = "\
7E0 03 22 F1 90 AA AA AA AA
7E8 10 14 62 F1 90 57 30 4C
7E0 30 00 0A AA AA AA AA AA
7E8 21 30 30 30 30 34 33 4D
7E8 22 42 35 34 31 33 32 36
7E0 02 10 03 AA AA AA AA AA
7E8 06 50 03 00 32 01 F4 AA
";

fn decode(text: &str, options: DecoderOptions) -> (String, DecodeSummary) {
    let mut decoder = Decoder::new(DecoderConfig { options }).unwrap();
    let mut output = Vec::new();
    let summary = decoder
        .run(
            TranscriptReader::new(Cursor::new(text)),
            TextSink::new(&mut output),
        )
        .unwrap();
    (String::from_utf8(output).unwrap(), summary)
}

#[test]
fn test_full_session_text_output() {
    let (text, summary) = decode(VIN_SESSION, DecoderOptions::default());
    assert_eq!(
        text,
        "7E0: 22F190\n\
         7E0: FC(CTS, BS=0, STmin=10ms)\n\
         7E8: 62F19057304C3030303034334D42353431333236\n\
         7E0: 1003\n\
         7E8: 5003003201F4\n"
    );
    assert_eq!(summary.frames, 7);
    assert_eq!(summary.messages, 4);
    assert_eq!(summary.flow_control, 1);
}

#[test]
fn test_full_session_without_flow_control() {
    let (text, summary) = decode(VIN_SESSION, DecoderOptions::NONE);
    assert!(!text.contains("FC("));
    assert_eq!(text.lines().count(), 4);
    assert_eq!(summary.flow_control_suppressed, 1);
}

#[test]
fn test_vin_payload() {
    let mut decoder = Decoder::new(DecoderConfig::default()).unwrap();
    let mut events: Vec<DecodedEvent> = Vec::new();
    decoder
        .run(TranscriptReader::new(Cursor::new(VIN_SESSION)), &mut events)
        .unwrap();

    let vin = events
        .iter()
        .find_map(|event| match event {
            DecodedEvent::Message(MessageEvent { id, data }) if id == "7E8" && data.len() == 20 => {
                Some(data[3..].to_vec())
            }
            _ => None,
        })
        .unwrap();
    assert_eq!(String::from_utf8(vin).unwrap(), "W0L000043MB541326");
}

#[test]
fn test_malformed_lines_never_reach_engine() {
    let text = "\
7E8 10 0A 01 02 03 04 05 06
7E8 21 07 08
not a frame
7E8 21 07 08 09 0A 0B 0C 0D
";
    let (output, summary) = decode(text, DecoderOptions::default());
    assert_eq!(output, "7E8: 0102030405060708090A\n");
    assert_eq!(summary.frames, 2);
}

#[test]
fn test_orphans_and_unknown_pci_are_silent() {
    let text = "\
7E8 21 01 02 03 04 05 06 07
7E8 45 00 00 00 00 00 00 00
7E8 F0 00 00 00 00 00 00 00
";
    let (output, summary) = decode(text, DecoderOptions::default());
    assert!(output.is_empty());
    assert_eq!(summary.frames, 3);
    assert_eq!(summary.messages, 0);
}

#[test]
fn test_strict_sequence_option() {
    let text = "\
7E8 10 0A 01 02 03 04 05 06
7E8 22 07 08 09 0A 00 00 00
";
    let (lenient, _) = decode(text, DecoderOptions::default());
    assert_eq!(lenient, "7E8: 0102030405060708090A\n");

    let (strict, _) = decode(
        text,
        DecoderOptions::FLOW_CONTROL | DecoderOptions::STRICT_SEQUENCE,
    );
    assert!(strict.is_empty());
}

#[test]
fn test_missing_transcript_is_an_error() {
    let result = TranscriptReader::open("does/not/exist/transcript.txt");
    assert!(matches!(result, Err(DecoderError::Io(_))));
}
