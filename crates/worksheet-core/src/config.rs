//! Editor configuration.
//!
//! Every tunable constant of the engine lives here. All sections default,
//! so a partial JSON object is a valid config.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Undo history tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Consecutive unlabeled records closer than this collapse into one step.
    pub merge_window_ms: u64,
    /// Records are ignored for this long after an undo or redo is applied.
    pub suppress_window_ms: u64,
    /// Oldest entries are dropped past this depth. Unbounded when `None`.
    pub max_depth: Option<usize>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            merge_window_ms: 500,
            suppress_window_ms: 100,
            max_depth: None,
        }
    }
}

/// Pointer gesture tuning. Distances are in document units unless noted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Marquee smaller than this on both axes is a click.
    pub drag_threshold: f64,
    /// Pointer travel in screen pixels before a gesture opens.
    pub gesture_threshold_px: f64,
    pub text_min_width: f64,
    pub text_min_height: f64,
    pub shape_min_width: f64,
    pub shape_min_height: f64,
    pub crop_min_size: f64,
    pub line_min_length: f64,
    pub min_font_size: f64,
    pub max_font_size: f64,
    /// Handle grab radius in screen pixels.
    pub handle_tolerance_px: f64,
    /// Document units moved per arrow key press.
    pub nudge_step: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 3.0,
            gesture_threshold_px: 1.0,
            text_min_width: 10.0,
            text_min_height: 10.0,
            shape_min_width: 80.0,
            shape_min_height: 80.0,
            crop_min_size: 20.0,
            line_min_length: 1.0,
            min_font_size: 8.0,
            max_font_size: 200.0,
            handle_tolerance_px: 8.0,
            nudge_step: 1.0,
        }
    }
}

/// Selection and alignment tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Vertical distance within which elements share a reading-order row.
    pub row_tolerance: f64,
    /// Slack around a shape's box when locating its caption.
    pub label_tolerance: f64,
    /// Distance within which alignment guides are reported.
    pub guide_threshold: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            row_tolerance: 10.0,
            label_tolerance: 5.0,
            guide_threshold: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipboardConfig {
    /// Offset applied when pasting onto the source page.
    pub paste_offset: f64,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self { paste_offset: 10.0 }
    }
}

/// Defaults for newly created text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    pub default_font_size: f64,
    pub default_color: String,
    /// Gap between an inserted image and its caption.
    pub label_gap: f64,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            default_font_size: 16.0,
            default_color: "#000000".to_string(),
            label_gap: 8.0,
        }
    }
}

/// Complete editor configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub history: HistoryConfig,
    pub interaction: InteractionConfig,
    pub selection: SelectionConfig,
    pub clipboard: ClipboardConfig,
    pub text: TextConfig,
}

impl EditorConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would make gestures degenerate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let i = &self.interaction;
        let positive = [
            ("interaction.text_min_width", i.text_min_width),
            ("interaction.text_min_height", i.text_min_height),
            ("interaction.shape_min_width", i.shape_min_width),
            ("interaction.shape_min_height", i.shape_min_height),
            ("interaction.crop_min_size", i.crop_min_size),
            ("interaction.min_font_size", i.min_font_size),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive")));
            }
        }
        if i.max_font_size < i.min_font_size {
            return Err(ConfigError::Invalid(
                "interaction.max_font_size is below min_font_size".to_string(),
            ));
        }
        if i.drag_threshold < 0.0 || i.gesture_threshold_px < 0.0 {
            return Err(ConfigError::Invalid("thresholds must not be negative".to_string()));
        }
        if self.history.max_depth == Some(0) {
            return Err(ConfigError::Invalid("history.max_depth must be at least 1".to_string()));
        }
        Ok(())
    }
}
