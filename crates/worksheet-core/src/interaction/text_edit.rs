//! In-place text editing session.
//!
//! The session owns a working copy of the element's runs. The document is
//! only touched when the session ends and its outcome is applied.

use crate::elements::{ElementId, TextElement, WidthMode};
use crate::measure::TextMeasurer;
use crate::rich_text::{RichText, RunStyle, word_range_at};
use kurbo::Size;
use std::ops::Range;

/// Inline formats the session can toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Bold,
    Italic,
    Underline,
}

impl Format {
    fn get(self, style: &RunStyle) -> bool {
        match self {
            Format::Bold => style.bold,
            Format::Italic => style.italic,
            Format::Underline => style.underline,
        }
    }

    fn set(self, style: &mut RunStyle, on: bool) {
        match self {
            Format::Bold => style.bold = on,
            Format::Italic => style.italic = on,
            Format::Underline => style.underline = on,
        }
    }
}

/// What leaving the session does to the element.
#[derive(Debug, Clone, PartialEq)]
pub enum TextEditOutcome {
    Commit(RichText),
    /// Nothing visible is left; the element should be removed.
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextEditSession {
    element_id: ElementId,
    content: RichText,
    caret: usize,
    anchor: usize,
    /// Style for the next insertion after a toggle with no selection.
    pending_style: Option<RunStyle>,
}

impl TextEditSession {
    /// Start with the caret after the last char.
    pub fn new(element: &TextElement) -> Self {
        let content = element.runs();
        let end = content.char_len();
        Self {
            element_id: element.base.id,
            content,
            caret: end,
            anchor: end,
            pending_style: None,
        }
    }

    pub fn element_id(&self) -> ElementId {
        self.element_id
    }

    pub fn content(&self) -> &RichText {
        &self.content
    }

    pub fn text(&self) -> String {
        self.content.plain_text()
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Selected char range, empty when there is only a caret.
    pub fn selection(&self) -> Range<usize> {
        self.caret.min(self.anchor)..self.caret.max(self.anchor)
    }

    pub fn has_selection(&self) -> bool {
        self.caret != self.anchor
    }

    pub fn set_caret(&mut self, idx: usize, extend: bool) {
        self.caret = idx.min(self.content.char_len());
        if !extend {
            self.anchor = self.caret;
        }
        self.pending_style = None;
    }

    pub fn select(&mut self, range: Range<usize>) {
        let len = self.content.char_len();
        self.anchor = range.start.min(len);
        self.caret = range.end.min(len);
        self.pending_style = None;
    }

    pub fn select_all(&mut self) {
        self.select(0..self.content.char_len());
    }

    pub fn select_word_at(&mut self, idx: usize) {
        let range = word_range_at(&self.text(), idx);
        self.select(range);
    }

    /// Replace the selection with `text`.
    pub fn insert(&mut self, text: &str) {
        let range = self.selection();
        let style = self
            .pending_style
            .clone()
            .unwrap_or_else(|| self.content.style_at(range.start));
        self.content.delete(range.clone());
        self.content.insert(range.start, text, Some(&style));
        let caret = range.start + text.chars().count();
        self.caret = caret;
        self.anchor = caret;
    }

    pub fn backspace(&mut self) {
        if self.has_selection() {
            self.delete_selection();
        } else if self.caret > 0 {
            self.content.delete(self.caret - 1..self.caret);
            self.set_caret(self.caret - 1, false);
        }
    }

    pub fn delete_forward(&mut self) {
        if self.has_selection() {
            self.delete_selection();
        } else {
            self.content.delete(self.caret..self.caret + 1);
            self.pending_style = None;
        }
    }

    fn delete_selection(&mut self) {
        let range = self.selection();
        self.content.delete(range.clone());
        self.set_caret(range.start, false);
    }

    pub fn move_left(&mut self, extend: bool) {
        if self.has_selection() && !extend {
            let start = self.selection().start;
            self.set_caret(start, false);
        } else {
            self.set_caret(self.caret.saturating_sub(1), extend);
        }
    }

    pub fn move_right(&mut self, extend: bool) {
        if self.has_selection() && !extend {
            let end = self.selection().end;
            self.set_caret(end, false);
        } else {
            self.set_caret(self.caret + 1, extend);
        }
    }

    /// Caret to the start of the current line.
    pub fn move_home(&mut self, extend: bool) {
        let chars: Vec<char> = self.text().chars().collect();
        let mut idx = self.caret.min(chars.len());
        while idx > 0 && chars[idx - 1] != '\n' {
            idx -= 1;
        }
        self.set_caret(idx, extend);
    }

    /// Caret to the end of the current line.
    pub fn move_end(&mut self, extend: bool) {
        let chars: Vec<char> = self.text().chars().collect();
        let mut idx = self.caret.min(chars.len());
        while idx < chars.len() && chars[idx] != '\n' {
            idx += 1;
        }
        self.set_caret(idx, extend);
    }

    /// Whether the format is on for the whole selection, or at the caret.
    pub fn is_active(&self, format: Format) -> bool {
        if !self.has_selection() {
            if let Some(style) = &self.pending_style {
                return format.get(style);
            }
        }
        self.content
            .all_in_range(self.selection(), |style| format.get(style))
    }

    /// Turn the format off if the whole selection has it, on otherwise.
    /// With no selection the change applies to the next typed text.
    pub fn toggle(&mut self, format: Format) {
        let on = !self.is_active(format);
        if self.has_selection() {
            self.content
                .apply(self.selection(), |style| format.set(style, on));
        } else {
            let mut style = self
                .pending_style
                .take()
                .unwrap_or_else(|| self.content.style_at(self.caret));
            format.set(&mut style, on);
            self.pending_style = Some(style);
        }
    }

    pub fn is_blank(&self) -> bool {
        self.content.is_blank()
    }

    pub fn finish(self) -> TextEditOutcome {
        if self.content.is_blank() {
            TextEditOutcome::Delete
        } else {
            TextEditOutcome::Commit(self.content)
        }
    }
}

/// Store edited runs into the element and refit its box.
///
/// Auto-width boxes take the measured size of the text. Fixed-width boxes
/// keep their width and take the wrapped height.
pub fn commit_text(element: &mut TextElement, runs: RichText, measurer: &dyn TextMeasurer, min: Size) {
    element.set_runs(runs);
    match element.width_mode {
        WidthMode::Auto => {
            let size = measurer.measure(&element.text, &element.style, None);
            element.w = size.width.max(min.width);
            element.h = size.height.max(min.height);
        }
        WidthMode::Fixed => {
            let size = measurer.measure(&element.text, &element.style, Some(element.w));
            element.h = size.height.max(min.height);
        }
    }
}
