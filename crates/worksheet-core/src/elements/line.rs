//! Straight lines and arrows.

use super::ElementBase;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Whether the line ends in an arrowhead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineKind {
    #[default]
    Line,
    Arrow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: String,
    pub width: f64,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            color: "#000000".to_string(),
            width: 2.0,
        }
    }
}

/// A straight line segment between two points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineElement {
    #[serde(flatten)]
    pub base: ElementBase,
    /// Carried by the wire `type` tag.
    #[serde(skip)]
    pub kind: LineKind,
    pub start: Point,
    pub end: Point,
    #[serde(default)]
    pub stroke: Stroke,
}

impl LineElement {
    pub fn new(kind: LineKind, start: Point, end: Point) -> Self {
        Self {
            base: ElementBase::new(),
            kind,
            start,
            end,
            stroke: Stroke::default(),
        }
    }

    pub fn is_arrow(&self) -> bool {
        self.kind == LineKind::Arrow
    }

    pub fn midpoint(&self) -> Point {
        self.start.midpoint(self.end)
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Axis-aligned box spanned by the endpoints, without stroke padding.
    pub fn endpoint_bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }
}
