//! Incremental decoder for the relay's event stream.
//!
//! Chunks arrive with arbitrary boundaries: a line, or a multi-byte UTF-8
//! character, may be split across two chunks. The decoder keeps the
//! unterminated tail until the next chunk (or [`SseDecoder::finish`]).

use relaychat_types::{DATA_PREFIX, DONE_SENTINEL};

/// A meaningful line of the event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseLine {
    /// Payload of a `data: ` line (JSON, still undecoded).
    Data(String),
    /// The `data: [DONE]` sentinel.
    Done,
}

#[derive(Debug, Default)]
pub struct SseDecoder {
    pending: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk; returns the data lines it completed, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseLine> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=pos).collect();
            if let Some(line) = parse_line(&raw[..pos]) {
                lines.push(line);
            }
        }
        lines
    }

    /// Flush a final line that was not newline-terminated.
    pub fn finish(&mut self) -> Option<SseLine> {
        let raw = std::mem::take(&mut self.pending);
        parse_line(&raw)
    }
}

fn parse_line(raw: &[u8]) -> Option<SseLine> {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    let text = String::from_utf8_lossy(raw);
    let payload = text.strip_prefix(DATA_PREFIX)?;
    if payload == DONE_SENTINEL {
        Some(SseLine::Done)
    } else {
        Some(SseLine::Data(payload.to_owned()))
    }
}
