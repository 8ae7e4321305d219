//! Text element.

use super::ElementBase;
use crate::rich_text::RichText;
use kurbo::Rect;
use serde::{Deserialize, Serialize};

/// How the width of a text box is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WidthMode {
    /// Width follows the content.
    #[default]
    Auto,
    /// Width is set by the user; content wraps.
    Fixed,
}

/// Font weight options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Horizontal alignment inside the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlignX {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical alignment inside the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlignY {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Typography of a text element or of a shape's inline text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font_size: f64,
    #[serde(default)]
    pub font_weight: FontWeight,
    pub color: String,
    #[serde(default)]
    pub align_x: AlignX,
    #[serde(default)]
    pub align_y: AlignY,
    /// Line height as a multiple of the font size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
}

impl TextStyle {
    pub const DEFAULT_FONT_SIZE: f64 = 16.0;
    pub const DEFAULT_LINE_HEIGHT: f64 = 1.2;

    pub fn line_height(&self) -> f64 {
        self.line_height
            .filter(|lh| lh.is_finite() && *lh > 0.0)
            .unwrap_or(Self::DEFAULT_LINE_HEIGHT)
    }

    /// Height of one line in document units.
    pub fn line_px(&self) -> f64 {
        self.font_size * self.line_height()
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: Self::DEFAULT_FONT_SIZE,
            font_weight: FontWeight::default(),
            color: "#000000".to_string(),
            align_x: AlignX::default(),
            align_y: AlignY::default(),
            line_height: None,
            letter_spacing: None,
            underline: None,
        }
    }
}

/// A free-standing text box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    #[serde(flatten)]
    pub base: ElementBase,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub text: String,
    /// Styled runs; `text` always holds the plain content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rich_text: Option<RichText>,
    #[serde(default)]
    pub width_mode: WidthMode,
    pub style: TextStyle,
}

impl TextElement {
    /// Create a text box at the given rectangle.
    pub fn new(rect: Rect, text: impl Into<String>) -> Self {
        Self {
            base: ElementBase::new(),
            x: rect.x0,
            y: rect.y0,
            w: rect.width(),
            h: rect.height(),
            text: text.into(),
            rich_text: None,
            width_mode: WidthMode::Auto,
            style: TextStyle::default(),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.w, self.y + self.h)
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.x = rect.x0;
        self.y = rect.y0;
        self.w = rect.width();
        self.h = rect.height();
    }

    pub fn line_height(&self) -> f64 {
        self.style.line_height()
    }

    /// The editable content as styled runs.
    pub fn runs(&self) -> RichText {
        self.rich_text
            .clone()
            .unwrap_or_else(|| RichText::from_plain(&self.text))
    }

    /// Store edited runs, keeping `text` in sync.
    pub fn set_runs(&mut self, runs: RichText) {
        self.text = runs.plain_text();
        self.rich_text = if runs.has_styling() { Some(runs) } else { None };
    }

    /// True when nothing but whitespace remains.
    pub fn is_blank(&self) -> bool {
        match &self.rich_text {
            Some(runs) => runs.is_blank(),
            None => crate::rich_text::is_blank(&self.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rich_text::RunStyle;

    #[test]
    fn test_rect_round_trip() {
        let mut text = TextElement::new(Rect::new(10.0, 20.0, 60.0, 40.0), "a");
        assert!((text.w - 50.0).abs() < f64::EPSILON);
        text.set_rect(Rect::new(0.0, 0.0, 5.0, 6.0));
        assert_eq!(text.rect(), Rect::new(0.0, 0.0, 5.0, 6.0));
    }

    #[test]
    fn test_set_runs_keeps_plain_text() {
        let mut text = TextElement::new(Rect::new(0.0, 0.0, 10.0, 10.0), "");
        let mut runs = RichText::from_plain("hello");
        text.set_runs(runs.clone());
        assert_eq!(text.text, "hello");
        assert!(text.rich_text.is_none());

        runs.apply(0..2, |s: &mut RunStyle| s.bold = true);
        text.set_runs(runs);
        assert_eq!(text.text, "hello");
        assert!(text.rich_text.is_some());
    }

    #[test]
    fn test_blank_detection() {
        let text = TextElement::new(Rect::new(0.0, 0.0, 10.0, 10.0), " \n\u{200B} ");
        assert!(text.is_blank());
    }

    #[test]
    fn test_invalid_line_height_falls_back() {
        let style = TextStyle {
            line_height: Some(0.0),
            ..TextStyle::default()
        };
        assert!((style.line_height() - TextStyle::DEFAULT_LINE_HEIGHT).abs() < f64::EPSILON);
    }
}
