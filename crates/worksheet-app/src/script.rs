//! Input scripts: a JSON list of steps replayed through the editor.
//!
//! ```json
//! { "steps": [
//!   { "step": "pointer", "event": { "kind": "down", "position": { "x": 10, "y": 10 } } },
//!   { "step": "key", "key": "z", "modifiers": { "ctrl": true } },
//!   { "step": "wait", "ms": 600 }
//! ] }
//! ```

use serde::{Deserialize, Serialize};
use worksheet_core::{ImageInsertRequest, Modifiers, Orientation, PointerEvent};

use crate::error::AppError;

/// One scripted host action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "camelCase")]
pub enum ScriptStep {
    Pointer {
        event: PointerEvent,
    },
    /// A key press; `key` is a DOM-style name such as `"Escape"` or `"z"`.
    Key {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
        #[serde(default, rename = "editableFocus")]
        editable_focus: bool,
    },
    /// Typed characters, delivered to an open text session.
    Text {
        text: String,
    },
    InsertImage {
        request: ImageInsertRequest,
    },
    AddPage {
        #[serde(default)]
        orientation: Option<Orientation>,
    },
    /// Activate the page at `index` in document order.
    SelectPage {
        index: usize,
    },
    Scale {
        scale: f64,
    },
    Undo,
    Redo,
    /// Advance the script clock.
    Wait {
        ms: u64,
    },
}

/// A parsed input script.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub steps: Vec<ScriptStep>,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use worksheet_core::MouseButton;

    #[test]
    fn test_parse_mixed_steps() {
        let json = r#"{ "steps": [
            { "step": "pointer", "event": { "kind": "down", "position": { "x": 10, "y": 20 } } },
            { "step": "pointer", "event": { "kind": "cancel" } },
            { "step": "key", "key": "z", "modifiers": { "ctrl": true, "shift": true } },
            { "step": "text", "text": "hi" },
            { "step": "insertImage", "request": { "imageUrl": "https://example.com/a.png", "label": "a" } },
            { "step": "addPage", "orientation": "landscape" },
            { "step": "selectPage", "index": 0 },
            { "step": "scale", "scale": 2.0 },
            { "step": "undo" },
            { "step": "wait", "ms": 600 }
        ] }"#;

        let script = Script::from_json(json).unwrap();
        assert_eq!(script.len(), 10);
        assert_eq!(
            script.steps[0],
            ScriptStep::Pointer {
                event: PointerEvent::Down {
                    position: Point::new(10.0, 20.0),
                    button: MouseButton::Left,
                    modifiers: Modifiers::NONE,
                }
            }
        );
        assert_eq!(script.steps[1], ScriptStep::Pointer { event: PointerEvent::Cancel });
        assert_eq!(
            script.steps[2],
            ScriptStep::Key {
                key: "z".to_string(),
                modifiers: Modifiers::ctrl_shift(),
                editable_focus: false,
            }
        );
        match &script.steps[4] {
            ScriptStep::InsertImage { request } => {
                assert_eq!(request.image_url, "https://example.com/a.png");
                assert_eq!(request.label.as_deref(), Some("a"));
            }
            other => panic!("unexpected step {other:?}"),
        }
        assert_eq!(
            script.steps[5],
            ScriptStep::AddPage {
                orientation: Some(Orientation::Landscape)
            }
        );
        assert_eq!(script.steps[9], ScriptStep::Wait { ms: 600 });
    }

    #[test]
    fn test_unknown_step_is_an_error() {
        let result = Script::from_json(r#"{ "steps": [ { "step": "explode" } ] }"#);
        assert!(matches!(result, Err(AppError::Json(_))));
    }

    #[test]
    fn test_missing_steps_is_empty() {
        assert!(Script::from_json("{}").unwrap().is_empty());
    }
}
