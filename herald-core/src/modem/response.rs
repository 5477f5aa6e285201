//! Transcript accumulation and transaction outcome rules
//!
//! Terminator detection is anchored to whole trimmed lines. Substring
//! search over the full transcript would false-positive on data lines
//! that happen to contain "OK", so both the terminator check and the
//! success rule work line by line.

use super::{Transcript, PROMPT, TIMEOUT_MARKER};

/// Result of feeding one line to an accumulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FeedOutcome {
    /// More lines expected
    Pending,
    /// A terminator line ended the transaction
    Complete,
    /// The modem is prompting for a raw payload; the transaction is
    /// complete and the transport slot must be released immediately
    Prompt,
}

/// Builds the transcript for one in-flight transaction
#[derive(Debug)]
pub struct ResponseAccumulator {
    transcript: Transcript,
    expect_terminator: bool,
}

impl ResponseAccumulator {
    pub fn new(expect_terminator: bool) -> Self {
        Self {
            transcript: Transcript::new(),
            expect_terminator,
        }
    }

    /// Append a received line and decide whether it ends the transaction
    pub fn feed_line(&mut self, line: &str) -> FeedOutcome {
        // A full transcript keeps its content; further lines still drive
        // termination but their text is dropped
        if self.transcript.len() + line.len() + 1 <= self.transcript.capacity() {
            let _ = self.transcript.push_str(line);
            let _ = self.transcript.push('\n');
        }

        if !self.expect_terminator {
            return FeedOutcome::Complete;
        }
        let trimmed = line.trim();
        if trimmed == PROMPT {
            return FeedOutcome::Prompt;
        }
        if is_terminator_line(trimmed) {
            return FeedOutcome::Complete;
        }
        FeedOutcome::Pending
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn into_transcript(self) -> Transcript {
        self.transcript
    }
}

/// True if this trimmed line ends a multi-line AT exchange
pub fn is_terminator_line(line: &str) -> bool {
    let line = line.trim();
    line == "OK" || line == "ERROR" || line.contains("+CME ERROR") || line.contains("+CMS ERROR")
}

/// True if this trimmed line reports failure
fn is_error_line(line: &str) -> bool {
    let line = line.trim();
    line == "ERROR" || line.contains("+CME ERROR") || line.contains("+CMS ERROR")
}

/// Success rule for a finished transcript
///
/// Success requires a positive line (`OK`, or the `>` payload prompt)
/// and no negative line. The literal timeout marker is always failure.
pub fn transcript_ok(transcript: &str) -> bool {
    if transcript == TIMEOUT_MARKER {
        return false;
    }
    let mut positive = false;
    for line in transcript.lines() {
        let trimmed = line.trim();
        if is_error_line(trimmed) {
            return false;
        }
        if trimmed == "OK" || trimmed == PROMPT {
            positive = true;
        }
    }
    positive
}
