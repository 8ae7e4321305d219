//! Keyboard bindings.
//!
//! [`resolve`] maps a key press to an editor [`Command`]. Bindings are
//! suppressed while a host text field has focus or an element is in text
//! edit mode; Escape always resolves.

use crate::document::LayerMove;
use crate::input::{Key, KeyInput};

/// An editor command triggered from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Escape,
    /// Delete the selection, or the current page when nothing is selected.
    Delete,
    /// Move the selection by whole steps along each axis.
    Nudge { dx: i8, dy: i8 },
    Copy,
    Cut,
    Paste,
    Undo,
    Redo,
    CycleSelection { forward: bool },
    SelectAll,
    Duplicate,
    Group,
    Ungroup,
    Layer(LayerMove),
}

/// Resolve a key press. `editing_text` is true while an element is in text
/// edit mode.
pub fn resolve(input: &KeyInput, editing_text: bool) -> Option<Command> {
    if input.key == Key::Escape {
        return Some(Command::Escape);
    }
    if input.editable_focus || editing_text {
        return None;
    }

    let m = input.modifiers;
    let command = match (input.key.to_ascii_lowercase(), m.command(), m.shift) {
        (Key::Backspace | Key::Delete, false, _) => Command::Delete,
        (Key::ArrowUp, false, _) => Command::Nudge { dx: 0, dy: -1 },
        (Key::ArrowDown, false, _) => Command::Nudge { dx: 0, dy: 1 },
        (Key::ArrowLeft, false, _) => Command::Nudge { dx: -1, dy: 0 },
        (Key::ArrowRight, false, _) => Command::Nudge { dx: 1, dy: 0 },
        (Key::Tab, false, shift) => Command::CycleSelection { forward: !shift },
        (Key::Char('c'), true, false) => Command::Copy,
        (Key::Char('x'), true, false) => Command::Cut,
        (Key::Char('v'), true, false) => Command::Paste,
        (Key::Char('z'), true, false) => Command::Undo,
        (Key::Char('z'), true, true) | (Key::Char('y'), true, false) => Command::Redo,
        (Key::Char('a'), true, false) => Command::SelectAll,
        (Key::Char('d'), true, false) => Command::Duplicate,
        (Key::Char('g'), true, false) => Command::Group,
        (Key::Char('g'), true, true) => Command::Ungroup,
        (Key::Char(']'), true, false) => Command::Layer(LayerMove::Forward),
        (Key::Char('['), true, false) => Command::Layer(LayerMove::Backward),
        (Key::Char(']') | Key::Char('}'), true, true) => Command::Layer(LayerMove::Front),
        (Key::Char('[') | Key::Char('{'), true, true) => Command::Layer(LayerMove::Back),
        _ => return None,
    };
    Some(command)
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub command: bool,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: &'static str, command: bool, shift: bool, description: &'static str) -> Self {
        Self {
            key,
            command,
            shift,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl/Cmd+Shift+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.command {
            parts.push("Ctrl/Cmd");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Escape", false, false, "Clear selection and stop editing"),
            Shortcut::new("Delete", false, false, "Delete selection or current page"),
            Shortcut::new("Backspace", false, false, "Delete selection or current page"),
            Shortcut::new("Arrows", false, false, "Nudge selection by one unit"),
            Shortcut::new("Tab", false, false, "Select next element"),
            Shortcut::new("Tab", false, true, "Select previous element"),
            Shortcut::new("A", true, false, "Select all"),
            Shortcut::new("C", true, false, "Copy elements (or page)"),
            Shortcut::new("X", true, false, "Cut elements"),
            Shortcut::new("V", true, false, "Paste elements (or page)"),
            Shortcut::new("D", true, false, "Duplicate selection"),
            Shortcut::new("Z", true, false, "Undo"),
            Shortcut::new("Z", true, true, "Redo"),
            Shortcut::new("Y", true, false, "Redo"),
            Shortcut::new("G", true, false, "Group selection"),
            Shortcut::new("G", true, true, "Ungroup selection"),
            Shortcut::new("]", true, false, "Bring forward"),
            Shortcut::new("[", true, false, "Send backward"),
            Shortcut::new("]", true, true, "Bring to front"),
            Shortcut::new("[", true, true, "Send to back"),
        ]
    }

    /// Render the shortcut table as text lines.
    pub fn describe() -> Vec<String> {
        Self::all()
            .iter()
            .map(|s| format!("{:20} {}", s.format(), s.description))
            .collect()
    }
}
