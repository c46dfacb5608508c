//! Decoding of captured HTTP transcripts into header lines and body bytes

use std::collections::BTreeMap;

use base64::Engine;
use thiserror::Error;

/// Separator between the header section and the body.
pub const HEADER_DELIMITER: &[u8] = b"\r\n\r\n";

const LINE_DELIMITER: &str = "\r\n";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Transcript is not valid base64: {0}")]
pub struct DecodeError(#[from] pub base64::DecodeError);

/// A transcript split into its header section and body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedMessage {
    /// Header lines in transcript order; the first is the request or status line.
    pub header_lines: Vec<String>,
    pub body: Vec<u8>,
}

impl DecodedMessage {
    /// Parse raw transcript bytes.
    ///
    /// Without a blank-line delimiter the whole content is treated as the
    /// header section and the body is empty.
    pub fn parse(raw: &[u8]) -> Self {
        let (head, body) = match find_subslice(raw, HEADER_DELIMITER) {
            Some(pos) => (&raw[..pos], &raw[pos + HEADER_DELIMITER.len()..]),
            None => (raw, &raw[raw.len()..]),
        };

        let head = String::from_utf8_lossy(head);
        let header_lines = if head.is_empty() {
            Vec::new()
        } else {
            head.split(LINE_DELIMITER).map(str::to_string).collect()
        };

        Self {
            header_lines,
            body: body.to_vec(),
        }
    }

    /// The request line or status line, if the transcript had one.
    pub fn start_line(&self) -> Option<&str> {
        self.header_lines.first().map(String::as_str)
    }

    /// Header name to value, skipping the start line.
    ///
    /// Lines without a colon are ignored. Names and values are trimmed and a
    /// repeated name keeps its last value.
    pub fn header_map(&self) -> BTreeMap<String, String> {
        self.header_lines
            .iter()
            .skip(1)
            .filter_map(|line| line.split_once(':'))
            .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
            .collect()
    }

    /// Split the body at an insertion offset, clamped to the body length.
    pub fn split_body(&self, offset: usize) -> (&[u8], &[u8]) {
        split_clamped(&self.body, offset)
    }
}

/// Split `bytes` at `offset`, clamping the offset into `[0, bytes.len()]`.
pub fn split_clamped(bytes: &[u8], offset: usize) -> (&[u8], &[u8]) {
    bytes.split_at(offset.min(bytes.len()))
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Turns a stored transcript into a [`DecodedMessage`].
pub trait MessageCodec {
    fn decode(&self, transcript: &str) -> Result<DecodedMessage, DecodeError>;
}

/// Codec for transcripts stored as standard base64, the form Burp exports.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Codec;

impl Base64Codec {
    pub fn encode(&self, raw: &[u8]) -> String {
        base64::engine::general_purpose::STANDARD.encode(raw)
    }
}

impl MessageCodec for Base64Codec {
    fn decode(&self, transcript: &str) -> Result<DecodedMessage, DecodeError> {
        let raw = base64::engine::general_purpose::STANDARD.decode(transcript.trim())?;
        Ok(DecodedMessage::parse(&raw))
    }
}
