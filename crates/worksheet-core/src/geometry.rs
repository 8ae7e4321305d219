//! Geometry helpers shared by selection and interaction.
//!
//! All functions are pure. Elements whose geometry cannot be resolved
//! (non-finite coordinates) yield `None` and are skipped by callers.

use crate::elements::{CanvasElement, LineElement};
use kurbo::{Point, Rect};

/// Minimum grab padding around lines, in document units.
pub const LINE_MIN_PADDING: f64 = 6.0;
/// Grab padding around arrowheads.
pub const ARROW_MARKER_PADDING: f64 = 12.0;

fn is_finite_rect(rect: Rect) -> bool {
    rect.x0.is_finite() && rect.y0.is_finite() && rect.x1.is_finite() && rect.y1.is_finite()
}

/// The element's own box. Lines use their endpoint box inflated by half the
/// stroke width (at least 1).
pub fn rect_from_element(element: &CanvasElement) -> Option<Rect> {
    let rect = match element {
        CanvasElement::Text(t) => t.rect().abs(),
        CanvasElement::Shape(s) => s.rect().abs(),
        CanvasElement::Line(l) => {
            let pad = (l.stroke.width / 2.0).max(1.0);
            l.endpoint_bounds().inflate(pad, pad)
        }
    };
    is_finite_rect(rect).then_some(rect)
}

/// Padding used to make thin lines and arrowheads easy to grab.
pub fn line_padding(line: &LineElement) -> f64 {
    let marker = if line.is_arrow() { ARROW_MARKER_PADDING } else { 0.0 };
    LINE_MIN_PADDING.max(line.stroke.width).max(marker)
}

/// Bounds used for selection. `None` for invisible or unselectable elements.
pub fn selection_bounds(element: &CanvasElement) -> Option<Rect> {
    if !element.is_visible() || !element.is_selectable() {
        return None;
    }
    match element {
        CanvasElement::Line(l) => {
            let pad = line_padding(l);
            let rect = l.endpoint_bounds().inflate(pad, pad);
            is_finite_rect(rect).then_some(rect)
        }
        _ => rect_from_element(element),
    }
}

/// Rectangle spanned by two drag points with non-negative size.
pub fn normalize_rect(p0: Point, p1: Point) -> Rect {
    Rect::from_points(p0, p1)
}

/// Open-interval overlap test; touching edges do not intersect.
pub fn rects_intersect(a: Rect, b: Rect) -> bool {
    let a = a.abs();
    let b = b.abs();
    a.x0 < b.x1 && a.x1 > b.x0 && a.y0 < b.y1 && a.y1 > b.y0
}

/// Smallest rectangle covering every input rect.
pub fn union_bounds(rects: impl IntoIterator<Item = Rect>) -> Option<Rect> {
    rects.into_iter().reduce(|acc, r| acc.union(r))
}

/// Distance from `point` to the segment `a`-`b`.
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return point.distance(a);
    }
    let t = ((point - a).dot(seg) / len_sq).clamp(0.0, 1.0);
    point.distance(a + seg * t)
}

/// Whether `point` lands on a visible, selectable element.
pub fn hit_test_element(element: &CanvasElement, point: Point, tolerance: f64) -> bool {
    if !element.is_visible() || !element.is_selectable() {
        return false;
    }
    match element {
        CanvasElement::Line(l) => {
            point_to_segment_dist(point, l.start, l.end) <= line_padding(l) + tolerance
        }
        _ => rect_from_element(element)
            .map(|r| r.inflate(tolerance, tolerance).contains(point))
            .unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{LineKind, ShapeElement, ShapeKind, TextElement};

    fn line(kind: LineKind, width: f64) -> CanvasElement {
        let mut l = LineElement::new(kind, Point::new(10.0, 10.0), Point::new(50.0, 10.0));
        l.stroke.width = width;
        CanvasElement::Line(l)
    }

    #[test]
    fn test_line_rect_uses_half_stroke() {
        let rect = rect_from_element(&line(LineKind::Line, 4.0)).unwrap();
        assert_eq!(rect, Rect::new(8.0, 8.0, 52.0, 12.0));

        let thin = rect_from_element(&line(LineKind::Line, 0.5)).unwrap();
        assert_eq!(thin, Rect::new(9.0, 9.0, 51.0, 11.0));
    }

    #[test]
    fn test_selection_bounds_padding() {
        let plain = selection_bounds(&line(LineKind::Line, 2.0)).unwrap();
        assert_eq!(plain, Rect::new(4.0, 4.0, 56.0, 16.0));

        let thick = selection_bounds(&line(LineKind::Line, 9.0)).unwrap();
        assert_eq!(thick, Rect::new(1.0, 1.0, 59.0, 19.0));

        let arrow = selection_bounds(&line(LineKind::Arrow, 2.0)).unwrap();
        assert_eq!(arrow, Rect::new(-2.0, -2.0, 62.0, 22.0));
    }

    #[test]
    fn test_selection_bounds_skips_hidden_and_unselectable() {
        let mut text = TextElement::new(Rect::new(0.0, 0.0, 10.0, 10.0), "a");
        text.base.visible = Some(false);
        assert!(selection_bounds(&CanvasElement::Text(text.clone())).is_none());
        assert!(rect_from_element(&CanvasElement::Text(text.clone())).is_some());

        text.base.visible = None;
        text.base.selectable = Some(false);
        assert!(selection_bounds(&CanvasElement::Text(text)).is_none());
    }

    #[test]
    fn test_non_finite_geometry_is_skipped() {
        let mut shape = ShapeElement::new(ShapeKind::Rect, Rect::new(0.0, 0.0, 10.0, 10.0));
        shape.x = f64::NAN;
        assert!(rect_from_element(&CanvasElement::Shape(shape)).is_none());
    }

    #[test]
    fn test_normalize_rect_any_direction() {
        let r = normalize_rect(Point::new(50.0, 40.0), Point::new(10.0, 10.0));
        assert_eq!(r, Rect::new(10.0, 10.0, 50.0, 40.0));
        assert!((r.width() - 40.0).abs() < f64::EPSILON);
        assert!((r.height() - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rects_intersect_open_interval() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rects_intersect(a, Rect::new(5.0, 5.0, 15.0, 15.0)));
        assert!(!rects_intersect(a, Rect::new(10.0, 0.0, 20.0, 10.0)));
        assert!(!rects_intersect(a, Rect::new(20.0, 20.0, 30.0, 30.0)));
    }

    #[test]
    fn test_hit_test_line() {
        let element = line(LineKind::Line, 2.0);
        assert!(hit_test_element(&element, Point::new(30.0, 15.0), 0.0));
        assert!(!hit_test_element(&element, Point::new(30.0, 30.0), 0.0));
    }

    #[test]
    fn test_point_to_segment_degenerate() {
        let d = point_to_segment_dist(Point::new(3.0, 4.0), Point::ZERO, Point::ZERO);
        assert!((d - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_union_bounds() {
        let u = union_bounds([Rect::new(0.0, 0.0, 1.0, 1.0), Rect::new(5.0, 5.0, 6.0, 7.0)]);
        assert_eq!(u, Some(Rect::new(0.0, 0.0, 6.0, 7.0)));
        assert_eq!(union_bounds(Vec::new()), None);
    }
}
