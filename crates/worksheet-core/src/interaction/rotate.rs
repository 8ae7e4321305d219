//! Line and arrow rotation about the midpoint.

use crate::elements::LineElement;
use crate::handles::LineEnd;
use crate::snap::{ANGLE_SNAP_INCREMENT, snap_angle};
use kurbo::{Point, Vec2};

/// New endpoints after dragging `end` toward `pointer`.
///
/// The midpoint and length are preserved; the dragged end points from the
/// midpoint at the pointer. With `snap`, the angle rounds to 15 degrees.
pub fn rotate_line(original: &LineElement, end: LineEnd, pointer: Point, snap: bool, min_length: f64) -> (Point, Point) {
    let mid = original.midpoint();
    let dir = pointer - mid;
    if dir.hypot() < f64::EPSILON {
        return (original.start, original.end);
    }

    let mut angle = dir.y.atan2(dir.x).to_degrees();
    if snap {
        angle = snap_angle(angle, ANGLE_SNAP_INCREMENT);
    }
    let half = original.length().max(min_length) / 2.0;
    let offset = Vec2::from_angle(angle.to_radians()) * half;
    match end {
        LineEnd::End => (mid - offset, mid + offset),
        LineEnd::Start => (mid + offset, mid - offset),
    }
}
