//! Text measurement.
//!
//! The engine never renders glyphs. Hosts with real font metrics plug in
//! their own [`TextMeasurer`]; [`ApproxMeasurer`] estimates from an average
//! glyph width.

use crate::elements::{FontWeight, TextStyle};
use kurbo::{Point, Size};
use std::ops::Range;

/// Measures laid-out text for a given style.
pub trait TextMeasurer {
    /// Size of `text` laid out with `style`, wrapping at `max_width` if given.
    fn measure(&self, text: &str, style: &TextStyle, max_width: Option<f64>) -> Size;

    /// Char index nearest to a point local to the text box.
    fn char_index_at(&self, text: &str, style: &TextStyle, max_width: Option<f64>, local: Point) -> usize;
}

/// Average-glyph-width estimator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxMeasurer;

impl ApproxMeasurer {
    pub fn new() -> Self {
        Self
    }

    fn char_width(style: &TextStyle) -> f64 {
        let factor = match style.font_weight {
            FontWeight::Normal => 0.55,
            FontWeight::Bold => 0.6,
        };
        (style.font_size * factor + style.letter_spacing.unwrap_or(0.0)).max(0.1)
    }

    /// Char ranges of each laid-out line. Breaks on newlines, then greedily
    /// at the last space that fits.
    fn wrap(text: &str, char_width: f64, max_width: Option<f64>) -> Vec<Range<usize>> {
        let chars: Vec<char> = text.chars().collect();
        let max_cols = max_width.map(|w| ((w / char_width).floor() as usize).max(1));
        let mut lines = Vec::new();
        let mut start = 0;
        let mut last_space: Option<usize> = None;
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            if c == '\n' {
                lines.push(start..i);
                start = i + 1;
                last_space = None;
                i += 1;
                continue;
            }
            if let Some(cols) = max_cols {
                if i - start >= cols && c != ' ' {
                    let brk = match last_space {
                        Some(s) if s >= start => s + 1,
                        _ => i,
                    };
                    lines.push(start..brk);
                    start = brk;
                    last_space = None;
                    continue;
                }
            }
            if c == ' ' {
                last_space = Some(i);
            }
            i += 1;
        }
        lines.push(start..chars.len());
        lines
    }
}

impl TextMeasurer for ApproxMeasurer {
    fn measure(&self, text: &str, style: &TextStyle, max_width: Option<f64>) -> Size {
        let cw = Self::char_width(style);
        let chars: Vec<char> = text.chars().collect();
        let lines = Self::wrap(text, cw, max_width);
        let widest = lines
            .iter()
            .map(|line| {
                let visible = chars[line.clone()]
                    .iter()
                    .rev()
                    .skip_while(|c| **c == ' ')
                    .count();
                visible as f64 * cw
            })
            .fold(0.0, f64::max);
        Size::new(widest, lines.len() as f64 * style.line_px())
    }

    fn char_index_at(&self, text: &str, style: &TextStyle, max_width: Option<f64>, local: Point) -> usize {
        let cw = Self::char_width(style);
        let lines = Self::wrap(text, cw, max_width);
        let row = (local.y / style.line_px()).floor().max(0.0) as usize;
        let Some(line) = lines.get(row.min(lines.len() - 1)) else {
            return 0;
        };
        let col = (local.x / cw).round().max(0.0) as usize;
        line.start + col.min(line.len())
    }
}
