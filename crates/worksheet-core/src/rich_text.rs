//! Attributed text: an ordered list of styled runs.
//!
//! All positions are char indices into the concatenated plain text.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Inline formatting carried by a run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStyle {
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub underline: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A stretch of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    #[serde(flatten)]
    pub style: RunStyle,
}

/// Styled text content of a text element.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RichText {
    pub runs: Vec<TextRun>,
}

/// Characters that render nothing and count as blank.
const ZERO_WIDTH: [char; 4] = ['\u{200B}', '\u{200C}', '\u{200D}', '\u{FEFF}'];

/// True when the string holds only whitespace or zero-width characters.
pub fn is_blank(text: &str) -> bool {
    text.chars().all(|c| c.is_whitespace() || ZERO_WIDTH.contains(&c))
}

fn byte_index(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

impl RichText {
    pub fn from_plain(text: &str) -> Self {
        let mut rich = Self::default();
        if !text.is_empty() {
            rich.runs.push(TextRun {
                text: text.to_string(),
                style: RunStyle::default(),
            });
        }
        rich
    }

    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    pub fn char_len(&self) -> usize {
        self.runs.iter().map(|r| r.text.chars().count()).sum()
    }

    pub fn is_blank(&self) -> bool {
        self.runs.iter().all(|r| is_blank(&r.text))
    }

    /// Whether any run carries non-default formatting.
    pub fn has_styling(&self) -> bool {
        self.runs.iter().any(|r| r.style != RunStyle::default())
    }

    /// Style a character typed at `idx` would inherit.
    pub fn style_at(&self, idx: usize) -> RunStyle {
        let mut offset = 0;
        for run in &self.runs {
            let len = run.text.chars().count();
            if idx > offset && idx <= offset + len {
                return run.style.clone();
            }
            offset += len;
        }
        self.runs
            .first()
            .map(|r| r.style.clone())
            .unwrap_or_default()
    }

    /// Ensure a run boundary at `idx`; returns the index of the run starting there.
    fn split_at(&mut self, idx: usize) -> usize {
        let mut offset = 0;
        for i in 0..self.runs.len() {
            if idx == offset {
                return i;
            }
            let len = self.runs[i].text.chars().count();
            if idx < offset + len {
                let byte = byte_index(&self.runs[i].text, idx - offset);
                let tail = self.runs[i].text.split_off(byte);
                let style = self.runs[i].style.clone();
                self.runs.insert(i + 1, TextRun { text: tail, style });
                return i + 1;
            }
            offset += len;
        }
        self.runs.len()
    }

    /// Insert text at a char index. Without an explicit style the text
    /// inherits the style of the preceding character.
    pub fn insert(&mut self, idx: usize, text: &str, style: Option<&RunStyle>) {
        if text.is_empty() {
            return;
        }
        let idx = idx.min(self.char_len());
        let style = style.cloned().unwrap_or_else(|| self.style_at(idx));
        let at = self.split_at(idx);
        self.runs.insert(
            at,
            TextRun {
                text: text.to_string(),
                style,
            },
        );
        self.normalize();
    }

    /// Remove the chars in `range`.
    pub fn delete(&mut self, range: Range<usize>) {
        let len = self.char_len();
        let range = range.start.min(len)..range.end.min(len);
        if range.is_empty() {
            return;
        }
        let start = self.split_at(range.start);
        let end = self.split_at(range.end);
        self.runs.drain(start..end);
        self.normalize();
    }

    /// Apply a formatting change to every char in `range`.
    pub fn apply(&mut self, range: Range<usize>, f: impl Fn(&mut RunStyle)) {
        let len = self.char_len();
        let range = range.start.min(len)..range.end.min(len);
        if range.is_empty() {
            return;
        }
        let start = self.split_at(range.start);
        let end = self.split_at(range.end);
        for run in &mut self.runs[start..end] {
            f(&mut run.style);
        }
        self.normalize();
    }

    /// Whether every char in `range` satisfies `pred`. An empty range tests
    /// the style at the caret.
    pub fn all_in_range(&self, range: Range<usize>, pred: impl Fn(&RunStyle) -> bool) -> bool {
        if range.is_empty() {
            return pred(&self.style_at(range.start));
        }
        let mut offset = 0;
        for run in &self.runs {
            let len = run.text.chars().count();
            let overlaps = offset < range.end && offset + len > range.start;
            if overlaps && !pred(&run.style) {
                return false;
            }
            offset += len;
        }
        true
    }

    /// Drop empty runs and merge neighbours with equal styles.
    pub fn normalize(&mut self) {
        let mut merged: Vec<TextRun> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            if run.text.is_empty() {
                continue;
            }
            match merged.last_mut() {
                Some(last) if last.style == run.style => last.text.push_str(&run.text),
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }
}

/// Char range of the word (or run of non-word chars) around `idx`.
pub fn word_range_at(text: &str, idx: usize) -> Range<usize> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return 0..0;
    }
    let is_word = |c: char| c.is_alphanumeric() || c == '_' || c == '\'';
    let probe = idx.min(chars.len() - 1);
    let class = is_word(chars[probe]);

    let mut start = probe;
    while start > 0 && is_word(chars[start - 1]) == class {
        start -= 1;
    }
    let mut end = probe + 1;
    while end < chars.len() && is_word(chars[end]) == class {
        end += 1;
    }
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bold(s: &mut RunStyle) {
        s.bold = true;
    }

    #[test]
    fn test_apply_splits_runs() {
        let mut rich = RichText::from_plain("hello world");
        rich.apply(6..11, bold);
        assert_eq!(rich.runs.len(), 2);
        assert_eq!(rich.runs[0].text, "hello ");
        assert_eq!(rich.runs[1].text, "world");
        assert!(rich.runs[1].style.bold);
        assert_eq!(rich.plain_text(), "hello world");
    }

    #[test]
    fn test_apply_then_clear_merges_back() {
        let mut rich = RichText::from_plain("abc");
        rich.apply(1..2, bold);
        assert_eq!(rich.runs.len(), 3);
        rich.apply(1..2, |s| s.bold = false);
        assert_eq!(rich.runs.len(), 1);
        assert!(!rich.has_styling());
    }

    #[test]
    fn test_insert_inherits_preceding_style() {
        let mut rich = RichText::from_plain("ab");
        rich.apply(0..1, bold);
        rich.insert(1, "X", None);
        assert_eq!(rich.plain_text(), "aXb");
        assert_eq!(rich.runs[0].text, "aX");
        assert!(rich.runs[0].style.bold);
    }

    #[test]
    fn test_delete_across_runs() {
        let mut rich = RichText::from_plain("one two three");
        rich.apply(4..7, bold);
        rich.delete(2..9);
        assert_eq!(rich.plain_text(), "onhree");
        assert_eq!(rich.char_len(), 6);
        assert!(!rich.has_styling());
    }

    #[test]
    fn test_multibyte_positions() {
        let mut rich = RichText::from_plain("héllo");
        rich.insert(2, "ü", None);
        assert_eq!(rich.plain_text(), "héüllo");
        rich.delete(0..2);
        assert_eq!(rich.plain_text(), "üllo");
    }

    #[test]
    fn test_all_in_range() {
        let mut rich = RichText::from_plain("abcd");
        rich.apply(0..2, bold);
        assert!(rich.all_in_range(0..2, |s| s.bold));
        assert!(!rich.all_in_range(1..3, |s| s.bold));
        assert!(rich.all_in_range(1..1, |s| s.bold));
    }

    #[test]
    fn test_blank_ignores_zero_width() {
        assert!(is_blank(""));
        assert!(is_blank(" \t\u{200B}\n"));
        assert!(!is_blank(" a "));
    }

    #[test]
    fn test_word_range_at() {
        assert_eq!(word_range_at("hello big world", 7), 6..9);
        assert_eq!(word_range_at("hello big world", 15), 10..15);
        assert_eq!(word_range_at("a  b", 1), 1..3);
        assert_eq!(word_range_at("", 3), 0..0);
    }
}
