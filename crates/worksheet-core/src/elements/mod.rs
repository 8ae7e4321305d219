//! Element definitions for worksheet pages.

mod line;
mod shape;
mod text;

pub use line::{LineElement, LineKind, Stroke};
pub use shape::{Border, BorderStyle, Fill, ImageBox, ImageFill, ShapeElement, ShapeKind};
pub use text::{AlignX, AlignY, FontWeight, TextElement, TextStyle, WidthMode};

use kurbo::{Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Shared identifier carried by every member of a group.
pub type GroupId = Uuid;

/// Fields shared by every element variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementBase {
    pub id: ElementId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selectable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
}

impl Default for ElementBase {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementBase {
    /// Create a base with a fresh id and every flag unset.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            visible: None,
            locked: None,
            selectable: None,
            group_id: None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible != Some(false)
    }

    pub fn is_locked(&self) -> bool {
        self.locked == Some(true)
    }

    pub fn is_selectable(&self) -> bool {
        self.selectable != Some(false)
    }
}

/// One placeable object on a page.
///
/// Serialized with a `type` discriminator: `text`, `rect`, `roundRect`,
/// `ellipse`, `line` or `arrow`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ElementRepr", into = "ElementRepr")]
pub enum CanvasElement {
    Text(TextElement),
    Shape(ShapeElement),
    Line(LineElement),
}

/// Wire representation with one tag per concrete kind.
#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum ElementRepr {
    Text(TextElement),
    Rect(ShapeElement),
    RoundRect(ShapeElement),
    Ellipse(ShapeElement),
    Line(LineElement),
    Arrow(LineElement),
}

impl From<ElementRepr> for CanvasElement {
    fn from(repr: ElementRepr) -> Self {
        match repr {
            ElementRepr::Text(t) => CanvasElement::Text(t),
            ElementRepr::Rect(s) => CanvasElement::Shape(ShapeElement { kind: ShapeKind::Rect, ..s }),
            ElementRepr::RoundRect(s) => {
                CanvasElement::Shape(ShapeElement { kind: ShapeKind::RoundRect, ..s })
            }
            ElementRepr::Ellipse(s) => {
                CanvasElement::Shape(ShapeElement { kind: ShapeKind::Ellipse, ..s })
            }
            ElementRepr::Line(l) => CanvasElement::Line(LineElement { kind: LineKind::Line, ..l }),
            ElementRepr::Arrow(l) => CanvasElement::Line(LineElement { kind: LineKind::Arrow, ..l }),
        }
    }
}

impl From<CanvasElement> for ElementRepr {
    fn from(element: CanvasElement) -> Self {
        match element {
            CanvasElement::Text(t) => ElementRepr::Text(t),
            CanvasElement::Shape(s) => match s.kind {
                ShapeKind::Rect => ElementRepr::Rect(s),
                ShapeKind::RoundRect => ElementRepr::RoundRect(s),
                ShapeKind::Ellipse => ElementRepr::Ellipse(s),
            },
            CanvasElement::Line(l) => match l.kind {
                LineKind::Line => ElementRepr::Line(l),
                LineKind::Arrow => ElementRepr::Arrow(l),
            },
        }
    }
}

impl CanvasElement {
    pub fn base(&self) -> &ElementBase {
        match self {
            CanvasElement::Text(e) => &e.base,
            CanvasElement::Shape(e) => &e.base,
            CanvasElement::Line(e) => &e.base,
        }
    }

    pub fn base_mut(&mut self) -> &mut ElementBase {
        match self {
            CanvasElement::Text(e) => &mut e.base,
            CanvasElement::Shape(e) => &mut e.base,
            CanvasElement::Line(e) => &mut e.base,
        }
    }

    pub fn id(&self) -> ElementId {
        self.base().id
    }

    pub fn group_id(&self) -> Option<GroupId> {
        self.base().group_id
    }

    pub fn is_visible(&self) -> bool {
        self.base().is_visible()
    }

    pub fn is_locked(&self) -> bool {
        self.base().is_locked()
    }

    pub fn is_selectable(&self) -> bool {
        self.base().is_selectable()
    }

    /// Wire name of the element kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            CanvasElement::Text(_) => "text",
            CanvasElement::Shape(s) => match s.kind {
                ShapeKind::Rect => "rect",
                ShapeKind::RoundRect => "roundRect",
                ShapeKind::Ellipse => "ellipse",
            },
            CanvasElement::Line(l) => match l.kind {
                LineKind::Line => "line",
                LineKind::Arrow => "arrow",
            },
        }
    }

    /// The element's own box, for box-shaped elements.
    pub fn box_rect(&self) -> Option<Rect> {
        match self {
            CanvasElement::Text(t) => Some(t.rect()),
            CanvasElement::Shape(s) => Some(s.rect()),
            CanvasElement::Line(_) => None,
        }
    }

    /// Replace the box of a box-shaped element. Lines are left untouched.
    pub fn set_box_rect(&mut self, rect: Rect) {
        match self {
            CanvasElement::Text(t) => t.set_rect(rect),
            CanvasElement::Shape(s) => s.set_rect(rect),
            CanvasElement::Line(_) => {}
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        match self {
            CanvasElement::Text(t) => {
                t.x += delta.x;
                t.y += delta.y;
            }
            CanvasElement::Shape(s) => {
                s.x += delta.x;
                s.y += delta.y;
            }
            CanvasElement::Line(l) => {
                l.start += delta;
                l.end += delta;
            }
        }
    }

    pub fn as_text(&self) -> Option<&TextElement> {
        match self {
            CanvasElement::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextElement> {
        match self {
            CanvasElement::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_shape(&self) -> Option<&ShapeElement> {
        match self {
            CanvasElement::Shape(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_shape_mut(&mut self) -> Option<&mut ShapeElement> {
        match self {
            CanvasElement::Shape(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_line(&self) -> Option<&LineElement> {
        match self {
            CanvasElement::Line(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_line_mut(&mut self) -> Option<&mut LineElement> {
        match self {
            CanvasElement::Line(l) => Some(l),
            _ => None,
        }
    }

    /// The label text element referenced by a shape, if any.
    pub fn label_id(&self) -> Option<ElementId> {
        self.as_shape().and_then(|s| s.label_id)
    }
}

/// Copy a batch of elements with fresh ids.
///
/// Group and label references are remapped through one shared table so the
/// copies reference each other exactly as the originals did. A label
/// reference pointing outside the batch is dropped.
pub fn duplicate_elements(elements: &[CanvasElement]) -> Vec<CanvasElement> {
    let id_map: HashMap<ElementId, ElementId> =
        elements.iter().map(|e| (e.id(), Uuid::new_v4())).collect();
    let mut group_map: HashMap<GroupId, GroupId> = HashMap::new();

    elements
        .iter()
        .map(|element| {
            let mut copy = element.clone();
            let base = copy.base_mut();
            base.id = id_map[&element.id()];
            base.group_id = base
                .group_id
                .map(|g| *group_map.entry(g).or_insert_with(Uuid::new_v4));
            if let CanvasElement::Shape(shape) = &mut copy {
                shape.label_id = shape.label_id.and_then(|l| id_map.get(&l).copied());
            }
            copy
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    #[test]
    fn test_wire_tags_round_trip() {
        let elements = vec![
            CanvasElement::Text(TextElement::new(Rect::new(0.0, 0.0, 50.0, 20.0), "hi")),
            CanvasElement::Shape(ShapeElement::new(ShapeKind::RoundRect, Rect::new(0.0, 0.0, 80.0, 80.0))),
            CanvasElement::Shape(ShapeElement::new(ShapeKind::Ellipse, Rect::new(0.0, 0.0, 80.0, 80.0))),
            CanvasElement::Line(LineElement::new(LineKind::Arrow, Point::new(0.0, 0.0), Point::new(10.0, 0.0))),
        ];
        let json = serde_json::to_string(&elements).unwrap();
        assert!(json.contains("\"type\":\"roundRect\""));
        assert!(json.contains("\"type\":\"arrow\""));
        assert!(json.contains("\"widthMode\""));

        let back: Vec<CanvasElement> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, elements);
        assert_eq!(back[2].type_name(), "ellipse");
    }

    #[test]
    fn test_parse_minimal_text() {
        let json = r##"{
            "type": "text",
            "id": "6f1c1c9e-3b58-4c53-8d1e-0d6b1d1f2a10",
            "x": 1, "y": 2, "w": 30, "h": 10,
            "text": "Name",
            "widthMode": "fixed",
            "style": {"fontSize": 16, "fontWeight": "bold", "color": "#333333", "alignX": "center", "alignY": "middle"},
            "locked": true
        }"##;
        let element: CanvasElement = serde_json::from_str(json).unwrap();
        assert!(element.is_locked());
        let text = element.as_text().unwrap();
        assert_eq!(text.width_mode, WidthMode::Fixed);
        assert_eq!(text.style.font_weight, FontWeight::Bold);
        assert!((text.line_height() - TextStyle::DEFAULT_LINE_HEIGHT).abs() < f64::EPSILON);
    }

    #[test]
    fn test_flags_default_to_interactive() {
        let base = ElementBase::new();
        assert!(base.is_visible());
        assert!(!base.is_locked());
        assert!(base.is_selectable());
    }

    #[test]
    fn test_duplicate_remaps_group_and_label() {
        let group = Uuid::new_v4();
        let mut label = TextElement::new(Rect::new(0.0, 90.0, 80.0, 20.0), "Happy");
        label.base.group_id = Some(group);
        let mut shape = ShapeElement::new(ShapeKind::Rect, Rect::new(0.0, 0.0, 80.0, 80.0));
        shape.base.group_id = Some(group);
        shape.label_id = Some(label.base.id);

        let originals = vec![CanvasElement::Shape(shape), CanvasElement::Text(label)];
        let copies = duplicate_elements(&originals);

        assert_ne!(copies[0].id(), originals[0].id());
        assert_ne!(copies[1].id(), originals[1].id());
        assert_eq!(copies[0].label_id(), Some(copies[1].id()));
        let new_group = copies[0].group_id().unwrap();
        assert_ne!(new_group, group);
        assert_eq!(copies[1].group_id(), Some(new_group));
    }

    #[test]
    fn test_duplicate_drops_external_label() {
        let mut shape = ShapeElement::new(ShapeKind::Rect, Rect::new(0.0, 0.0, 80.0, 80.0));
        shape.label_id = Some(Uuid::new_v4());
        let copies = duplicate_elements(&[CanvasElement::Shape(shape)]);
        assert_eq!(copies[0].label_id(), None);
    }

    #[test]
    fn test_translate_line() {
        let mut element =
            CanvasElement::Line(LineElement::new(LineKind::Line, Point::new(0.0, 0.0), Point::new(10.0, 10.0)));
        element.translate(Vec2::new(5.0, -5.0));
        let line = element.as_line().unwrap();
        assert_eq!(line.start, Point::new(5.0, -5.0));
        assert_eq!(line.end, Point::new(15.0, 5.0));
    }
}
