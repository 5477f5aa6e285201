//! Serial byte-to-line assembly
//!
//! Feed raw UART bytes one at a time; complete lines come back with
//! trailing CR/LF stripped. Blank lines (the padding the modem puts
//! around replies) are dropped. Bytes past the line capacity are
//! discarded rather than written anywhere.

use heapless::String;

use super::LINE_MAX;

/// State machine turning a byte stream into trimmed lines
#[derive(Debug, Default)]
pub struct LineAssembler {
    buf: String<LINE_MAX>,
}

impl LineAssembler {
    pub const fn new() -> Self {
        Self { buf: String::new() }
    }

    /// Drop any partially assembled line
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    /// Feed one byte; returns a completed line on LF
    pub fn feed(&mut self, byte: u8) -> Option<String<LINE_MAX>> {
        if byte == b'\n' {
            while self.buf.ends_with('\r') {
                self.buf.pop();
            }
            if self.buf.is_empty() {
                return None;
            }
            return Some(core::mem::take(&mut self.buf));
        }
        if byte == b'\r' {
            // Kept until LF so a bare CR mid-line survives trimming
            let _ = self.buf.push('\r');
            return None;
        }
        let c = if byte.is_ascii() { byte as char } else { '?' };
        // Overflow: excess bytes are dropped, the line stays truncated
        let _ = self.buf.push(c);
        None
    }

    /// Feed a slice; returns the first completed line, if any
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Option<String<LINE_MAX>> {
        for &byte in bytes {
            if let Some(line) = self.feed(byte) {
                return Some(line);
            }
        }
        None
    }
}
