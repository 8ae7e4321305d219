//! Box shapes: rectangles, rounded rectangles and ellipses.

use super::{ElementBase, ElementId, TextStyle};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Which outline a shape element draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeKind {
    #[default]
    Rect,
    RoundRect,
    Ellipse,
}

/// Stroke style of a shape border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BorderStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl BorderStyle {
    /// Cycle to the next border style.
    pub fn next(self) -> Self {
        match self {
            BorderStyle::Solid => BorderStyle::Dashed,
            BorderStyle::Dashed => BorderStyle::Dotted,
            BorderStyle::Dotted => BorderStyle::Solid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Border {
    pub enabled: bool,
    pub color: String,
    pub width: f64,
    #[serde(default)]
    pub style: BorderStyle,
}

impl Default for Border {
    fn default() -> Self {
        Self {
            enabled: true,
            color: "#000000".to_string(),
            width: 2.0,
            style: BorderStyle::Solid,
        }
    }
}

/// Reference to an image painted inside a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFill {
    pub image_url: String,
}

/// Fill of a shape: a CSS color string or an embedded image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Fill {
    Color(String),
    Image(ImageFill),
}

impl Default for Fill {
    fn default() -> Self {
        Fill::Color("transparent".to_string())
    }
}

impl Fill {
    pub fn image(url: impl Into<String>) -> Self {
        Fill::Image(ImageFill { image_url: url.into() })
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Fill::Image(_))
    }
}

/// Crop box of an image fill, in element-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageBox {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl ImageBox {
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            x: rect.x0,
            y: rect.y0,
            w: rect.width(),
            h: rect.height(),
        }
    }

    pub fn to_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.w, self.y + self.h)
    }
}

/// A rectangle, rounded rectangle or ellipse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeElement {
    #[serde(flatten)]
    pub base: ElementBase,
    /// Carried by the wire `type` tag.
    #[serde(skip)]
    pub kind: ShapeKind,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    #[serde(default)]
    pub fill: Fill,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_box: Option<ImageBox>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_offset: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_style: Option<TextStyle>,
    /// Text element acting as this shape's caption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_id: Option<ElementId>,
}

impl ShapeElement {
    pub fn new(kind: ShapeKind, rect: Rect) -> Self {
        Self {
            base: ElementBase::new(),
            kind,
            x: rect.x0,
            y: rect.y0,
            w: rect.width(),
            h: rect.height(),
            fill: Fill::default(),
            radius: None,
            border: Some(Border::default()),
            image_box: None,
            image_scale: None,
            image_offset: None,
            text: None,
            text_style: None,
            label_id: None,
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

    /// Local rectangle covering the whole shape.
    pub fn local_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.w, self.h)
    }

    /// The visible crop of the image fill, defaulting to the full shape.
    pub fn crop_rect(&self) -> Rect {
        self.image_box
            .map(ImageBox::to_rect)
            .unwrap_or_else(|| self.local_rect())
    }

    /// The crop box in document coordinates.
    pub fn crop_rect_in_document(&self) -> Rect {
        self.crop_rect() + kurbo::Vec2::new(self.x, self.y)
    }
}
