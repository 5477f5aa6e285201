//! Keyboard line editor
//!
//! Consumes one keycode at a time and maintains the line being typed.
//! Printable ASCII appends (overflow is rejected, never written past
//! capacity), Backspace/Delete remove the last character, Enter submits a
//! non-empty line, Escape cancels. The reserved function band is
//! intercepted before any of that and always clears the line.
//!
//! The editor only edits while active (the command page is showing);
//! when inactive every key except the function band is swallowed.

use heapless::String;
use herald_protocol::keys::{FunctionKey, Key};

/// Line capacity, matching the shared buffer's input field
pub const LINE_MAX: usize = crate::buffer::ENTRY_MAX;

/// What a keycode did to the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditorEvent {
    /// Nothing visible happened
    Pending,
    /// The line content changed
    Changed,
    /// A printable key was rejected because the line is full
    Overflow,
    /// Enter on a non-empty line; fetch it with [`LineEditor::take_line`]
    Submitted,
    /// Escape pressed; the line was cleared
    Cancelled,
    /// A mapped function key was pressed
    Function(FunctionKey),
    /// A function-band keycode with no mapping
    UnmappedFunction(u8),
}

/// Line editing state machine
#[derive(Debug, Default)]
pub struct LineEditor {
    line: String<LINE_MAX>,
    active: bool,
}

impl LineEditor {
    pub const fn new() -> Self {
        Self {
            line: String::new(),
            active: false,
        }
    }

    /// Enable or disable editing; disabling clears the line
    pub fn set_active(&mut self, active: bool) {
        if !active {
            self.line.clear();
        }
        self.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The line as typed so far
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Take the current line, leaving the editor empty
    pub fn take_line(&mut self) -> String<LINE_MAX> {
        core::mem::take(&mut self.line)
    }

    /// Process one keycode
    pub fn feed(&mut self, code: u8) -> EditorEvent {
        // Function band first, regardless of editing state
        match Key::from_code(code) {
            Key::Function(f) => {
                self.line.clear();
                return EditorEvent::Function(f);
            }
            Key::UnmappedFunction(raw) => {
                self.line.clear();
                return EditorEvent::UnmappedFunction(raw);
            }
            _ if !self.active => return EditorEvent::Pending,
            Key::Escape => {
                self.line.clear();
                EditorEvent::Cancelled
            }
            Key::Backspace => {
                if self.line.pop().is_some() {
                    EditorEvent::Changed
                } else {
                    EditorEvent::Pending
                }
            }
            Key::Enter => {
                if self.line.is_empty() {
                    EditorEvent::Pending
                } else {
                    EditorEvent::Submitted
                }
            }
            Key::Printable(c) => {
                if self.line.push(c as char).is_ok() {
                    EditorEvent::Changed
                } else {
                    EditorEvent::Overflow
                }
            }
            Key::Unknown(_) => EditorEvent::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_editor() -> LineEditor {
        let mut editor = LineEditor::new();
        editor.set_active(true);
        editor
    }

    fn type_str(editor: &mut LineEditor, text: &str) {
        for b in text.bytes() {
            editor.feed(b);
        }
    }

    #[test]
    fn test_typing_builds_line() {
        let mut editor = active_editor();
        assert_eq!(editor.feed(b'h'), EditorEvent::Changed);
        assert_eq!(editor.feed(b'i'), EditorEvent::Changed);
        assert_eq!(editor.line(), "hi");
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut editor = active_editor();
        type_str(&mut editor, "abc");
        assert_eq!(editor.feed(0x08), EditorEvent::Changed);
        assert_eq!(editor.line(), "ab");
        assert_eq!(editor.feed(0x7F), EditorEvent::Changed);
        assert_eq!(editor.line(), "a");
        editor.feed(0x08);
        // Backspace on an empty line does nothing
        assert_eq!(editor.feed(0x08), EditorEvent::Pending);
    }

    #[test]
    fn test_enter_submits_nonempty_only() {
        let mut editor = active_editor();
        assert_eq!(editor.feed(0x0D), EditorEvent::Pending);
        type_str(&mut editor, "/help");
        assert_eq!(editor.feed(0x0D), EditorEvent::Submitted);
        assert_eq!(editor.take_line().as_str(), "/help");
        assert_eq!(editor.line(), "");
    }

    #[test]
    fn test_escape_cancels() {
        let mut editor = active_editor();
        type_str(&mut editor, "abc");
        assert_eq!(editor.feed(0x1B), EditorEvent::Cancelled);
        assert_eq!(editor.line(), "");
    }

    #[test]
    fn test_overflow_rejected_without_overrun() {
        let mut editor = active_editor();
        for _ in 0..LINE_MAX {
            assert_eq!(editor.feed(b'x'), EditorEvent::Changed);
        }
        assert_eq!(editor.feed(b'x'), EditorEvent::Overflow);
        assert_eq!(editor.line().len(), LINE_MAX);
    }

    #[test]
    fn test_function_band_intercepted_and_clears_line() {
        let mut editor = active_editor();
        type_str(&mut editor, "abc");
        assert_eq!(
            editor.feed(0x9F),
            EditorEvent::Function(FunctionKey::ShowHome)
        );
        assert_eq!(editor.line(), "");
        assert_eq!(editor.feed(0x81), EditorEvent::UnmappedFunction(0x81));
    }

    #[test]
    fn test_inactive_swallows_normal_keys() {
        let mut editor = LineEditor::new();
        assert_eq!(editor.feed(b'a'), EditorEvent::Pending);
        assert_eq!(editor.feed(0x0D), EditorEvent::Pending);
        assert_eq!(editor.line(), "");
        // Function keys still get through
        assert_eq!(
            editor.feed(0xA8),
            EditorEvent::Function(FunctionKey::ShowCommand)
        );
    }

    #[test]
    fn test_deactivate_clears_line() {
        let mut editor = active_editor();
        type_str(&mut editor, "abc");
        editor.set_active(false);
        assert_eq!(editor.line(), "");
    }
}
