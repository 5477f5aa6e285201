//! Output sanitization
//!
//! Transcripts shown to the user must not inject control characters into
//! the rendered history, so everything outside printable ASCII becomes a
//! space. Trailing whitespace and line terminators are stripped first.

use heapless::String;

/// Maximum length of a reply surfaced to the user
pub const REPLY_MAX: usize = 512;

/// Clean a transcript for display; overlong input is truncated
pub fn sanitize(text: &str) -> String<REPLY_MAX> {
    let mut out = String::new();
    for c in text.trim_end().chars() {
        let mapped = if matches!(c, '\x20'..='\x7e') { c } else { ' ' };
        if out.push(mapped).is_err() {
            break;
        }
    }
    out
}
