//! Shared command buffer
//!
//! The one structure shared between the keyboard/interpreter pipeline and
//! the display: the line being typed, the last result, and a bounded
//! history ring. It has no behavior beyond capacity-checked field updates;
//! the firmware wraps it in a mutex and every access copies in or out
//! while holding the lock, never across a modem transaction.

use heapless::{Deque, String};

/// Capacity of the input line and each history entry
pub const ENTRY_MAX: usize = 256;

/// Capacity of the result text
pub const OUTPUT_MAX: usize = 512;

/// History ring depth
pub const HISTORY_LINES: usize = 10;

/// Processing state of the shared buffer
///
/// Idle -> Typing on the first keystroke, Typing -> Processing when a
/// line is submitted, Processing -> Done when the interpreter finishes,
/// Done -> Typing on the next keystroke or Done -> Idle when cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandState {
    #[default]
    Idle,
    Typing,
    Processing,
    Done,
}

/// Shared state of the command page
#[derive(Debug)]
pub struct CommandBuffer {
    input: String<ENTRY_MAX>,
    output: String<OUTPUT_MAX>,
    history: Deque<String<ENTRY_MAX>, HISTORY_LINES>,
    state: CommandState,
}

impl Default for CommandBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandBuffer {
    /// Empty buffer in the Idle state
    pub const fn new() -> Self {
        Self {
            input: String::new(),
            output: String::new(),
            history: Deque::new(),
            state: CommandState::Idle,
        }
    }

    /// Replace the input line, truncating to capacity
    pub fn set_input(&mut self, line: &str) {
        self.input.clear();
        let _ = self.input.push_str(truncate_to_fit(line, ENTRY_MAX));
    }

    /// Clear the input line
    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Replace the result text, truncating to capacity
    pub fn set_output(&mut self, text: &str) {
        self.output.clear();
        let _ = self.output.push_str(truncate_to_fit(text, OUTPUT_MAX));
    }

    /// Append an entry to the history ring, evicting the oldest when full
    pub fn push_history(&mut self, entry: &str) {
        if self.history.is_full() {
            self.history.pop_front();
        }
        let mut line = String::new();
        let _ = line.push_str(truncate_to_fit(entry, ENTRY_MAX));
        // Cannot fail: we just made room
        let _ = self.history.push_back(line);
    }

    /// Drop all history entries
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Reset everything and return to Idle, as on page exit
    pub fn clear(&mut self) {
        self.input.clear();
        self.output.clear();
        self.history.clear();
        self.state = CommandState::Idle;
    }

    pub fn set_state(&mut self, state: CommandState) {
        self.state = state;
    }

    pub fn state(&self) -> CommandState {
        self.state
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    /// History entries, oldest first
    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(|s| s.as_str())
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

/// Longest prefix of `text` that fits in `max` bytes on a char boundary
fn truncate_to_fit(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
