//! Manipulation handles: the 8 box grips, line endpoints and crop grips.

use crate::elements::{CanvasElement, ShapeElement};
use kurbo::{Point, Rect};

/// One of the 8 resize grips of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    N,
    S,
    E,
    W,
    NW,
    NE,
    SW,
    SE,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::NW,
        ResizeHandle::N,
        ResizeHandle::NE,
        ResizeHandle::E,
        ResizeHandle::SE,
        ResizeHandle::S,
        ResizeHandle::SW,
        ResizeHandle::W,
    ];

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            ResizeHandle::NW | ResizeHandle::NE | ResizeHandle::SW | ResizeHandle::SE
        )
    }

    pub fn moves_left(self) -> bool {
        matches!(self, ResizeHandle::W | ResizeHandle::NW | ResizeHandle::SW)
    }

    pub fn moves_right(self) -> bool {
        matches!(self, ResizeHandle::E | ResizeHandle::NE | ResizeHandle::SE)
    }

    pub fn moves_top(self) -> bool {
        matches!(self, ResizeHandle::N | ResizeHandle::NW | ResizeHandle::NE)
    }

    pub fn moves_bottom(self) -> bool {
        matches!(self, ResizeHandle::S | ResizeHandle::SW | ResizeHandle::SE)
    }

    /// Whether the handle changes width.
    pub fn is_horizontal(self) -> bool {
        self.moves_left() || self.moves_right()
    }

    /// Whether the handle changes height.
    pub fn is_vertical(self) -> bool {
        self.moves_top() || self.moves_bottom()
    }

    /// Grip location on `rect`.
    pub fn position(self, rect: Rect) -> Point {
        let c = rect.center();
        let x = if self.moves_left() {
            rect.x0
        } else if self.moves_right() {
            rect.x1
        } else {
            c.x
        };
        let y = if self.moves_top() {
            rect.y0
        } else if self.moves_bottom() {
            rect.y1
        } else {
            c.y
        };
        Point::new(x, y)
    }

    pub fn name(self) -> &'static str {
        match self {
            ResizeHandle::N => "n",
            ResizeHandle::S => "s",
            ResizeHandle::E => "e",
            ResizeHandle::W => "w",
            ResizeHandle::NW => "nw",
            ResizeHandle::NE => "ne",
            ResizeHandle::SW => "sw",
            ResizeHandle::SE => "se",
        }
    }
}

/// Which endpoint of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineEnd {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    /// Resizes a box element.
    Resize(ResizeHandle),
    /// Rotates a line about its midpoint.
    LineEnd(LineEnd),
    /// Resizes the crop box of an image fill.
    Crop(ResizeHandle),
}

/// A handle with its position in document coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Handle {
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// `tolerance` is in document units, already divided by the render scale.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.position.distance(point) <= tolerance
    }
}

/// Handles shown on a selected element.
pub fn element_handles(element: &CanvasElement) -> Vec<Handle> {
    match element {
        CanvasElement::Line(l) => vec![
            Handle::new(l.start, HandleKind::LineEnd(LineEnd::Start)),
            Handle::new(l.end, HandleKind::LineEnd(LineEnd::End)),
        ],
        _ => match element.box_rect() {
            Some(rect) => box_handles(rect.abs(), HandleKind::Resize),
            None => Vec::new(),
        },
    }
}

/// Handles of a shape's crop box while in crop mode.
pub fn crop_handles(shape: &ShapeElement) -> Vec<Handle> {
    box_handles(shape.crop_rect_in_document(), HandleKind::Crop)
}

fn box_handles(rect: Rect, kind: fn(ResizeHandle) -> HandleKind) -> Vec<Handle> {
    ResizeHandle::ALL
        .iter()
        .map(|h| Handle::new(h.position(rect), kind(*h)))
        .collect()
}

/// The closest handle within `tolerance` of `point`.
pub fn hit_test_handles(handles: &[Handle], point: Point, tolerance: f64) -> Option<HandleKind> {
    handles
        .iter()
        .filter(|h| h.hit_test(point, tolerance))
        .min_by(|a, b| {
            a.position
                .distance(point)
                .total_cmp(&b.position.distance(point))
        })
        .map(|h| h.kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{LineElement, LineKind, ShapeKind};

    #[test]
    fn test_box_handle_positions() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(ResizeHandle::NW.position(rect), Point::new(0.0, 0.0));
        assert_eq!(ResizeHandle::S.position(rect), Point::new(50.0, 50.0));
        assert_eq!(ResizeHandle::E.position(rect), Point::new(100.0, 25.0));
    }

    #[test]
    fn test_handle_flags() {
        assert!(ResizeHandle::NW.is_corner());
        assert!(!ResizeHandle::N.is_corner());
        assert!(ResizeHandle::N.is_vertical());
        assert!(!ResizeHandle::N.is_horizontal());
        assert!(ResizeHandle::SW.moves_left() && ResizeHandle::SW.moves_bottom());
    }

    #[test]
    fn test_element_handles() {
        let shape = CanvasElement::Shape(ShapeElement::new(ShapeKind::Rect, Rect::new(0.0, 0.0, 80.0, 80.0)));
        assert_eq!(element_handles(&shape).len(), 8);

        let line = CanvasElement::Line(LineElement::new(LineKind::Line, Point::ZERO, Point::new(10.0, 0.0)));
        let handles = element_handles(&line);
        assert_eq!(handles.len(), 2);
        assert_eq!(handles[1].kind, HandleKind::LineEnd(LineEnd::End));
    }

    #[test]
    fn test_hit_test_picks_nearest() {
        let shape = CanvasElement::Shape(ShapeElement::new(ShapeKind::Rect, Rect::new(0.0, 0.0, 10.0, 10.0)));
        let handles = element_handles(&shape);
        let hit = hit_test_handles(&handles, Point::new(9.0, 9.5), 8.0);
        assert_eq!(hit, Some(HandleKind::Resize(ResizeHandle::SE)));
        assert_eq!(hit_test_handles(&handles, Point::new(40.0, 40.0), 8.0), None);
    }

    #[test]
    fn test_crop_handles_follow_image_box() {
        let mut shape = ShapeElement::new(ShapeKind::Rect, Rect::new(100.0, 100.0, 200.0, 200.0));
        shape.image_box = Some(crate::elements::ImageBox { x: 10.0, y: 10.0, w: 50.0, h: 50.0 });
        let handles = crop_handles(&shape);
        assert_eq!(handles[0].position, Point::new(110.0, 110.0));
        assert!(matches!(handles[0].kind, HandleKind::Crop(ResizeHandle::NW)));
    }
}
