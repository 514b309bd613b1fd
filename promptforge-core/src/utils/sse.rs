//! Line framing for server-sent event bodies

use crate::config::constants::sse::DATA_PREFIX;

/// Splits an arriving byte stream into complete lines.
///
/// Only the unterminated tail of the most recent chunk is kept between
/// calls, so a line split across two network chunks (including a multi-byte
/// UTF-8 sequence) is reassembled instead of being dropped.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and return every line it completed, without line endings
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        let mut start = 0;

        for (index, byte) in chunk.iter().enumerate() {
            if *byte != b'\n' {
                continue;
            }
            let segment = &chunk[start..index];
            if self.pending.is_empty() {
                lines.push(decode_line(segment));
            } else {
                self.pending.extend_from_slice(segment);
                lines.push(decode_line(&self.pending));
                self.pending.clear();
            }
            start = index + 1;
        }

        self.pending.extend_from_slice(&chunk[start..]);
        lines
    }

    /// Return whatever is left once the body has ended
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let line = decode_line(&self.pending);
        self.pending.clear();
        if line.trim().is_empty() { None } else { Some(line) }
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

/// Payload of a `data:` line, `None` for every other kind of line
pub fn data_payload(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(DATA_PREFIX.trim_end())?;
    Some(rest.strip_prefix(' ').unwrap_or(rest).trim_end())
}

fn decode_line(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.strip_suffix('\r').unwrap_or(&text).to_string()
}
