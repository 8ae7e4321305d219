//! Crop-box editing for image fills.
//!
//! Crop rects are local to the shape, with the shape box as `(0, 0, w, h)`.

use super::resize::{anchored_rect, dominant_scale, resize_rect};
use crate::handles::ResizeHandle;
use kurbo::{Rect, Size, Vec2};

/// Shrink `rect` to fit `bounds`, then shift it inside.
pub fn fit_inside(rect: Rect, bounds: Rect) -> Rect {
    let rect = rect.abs();
    let w = rect.width().min(bounds.width());
    let h = rect.height().min(bounds.height());
    let x0 = rect.x0.max(bounds.x0).min(bounds.x1 - w);
    let y0 = rect.y0.max(bounds.y0).min(bounds.y1 - h);
    Rect::new(x0, y0, x0 + w, y0 + h)
}

/// Move or resize the crop box. `None` as handle moves the whole box.
///
/// The result never leaves `bounds` and never drops below `min_size` unless
/// the bounds themselves are smaller. Corner handles keep the aspect ratio.
pub fn crop_box(original: Rect, bounds: Rect, handle: Option<ResizeHandle>, delta: Vec2, min_size: f64) -> Rect {
    let original = original.abs();
    let Some(handle) = handle else {
        return fit_inside(original + delta, bounds);
    };

    if !handle.is_corner() {
        let resized = resize_rect(original, handle, delta, Size::new(min_size, min_size));
        return resized.intersect(bounds).abs();
    }

    let w = original.width().max(f64::EPSILON);
    let h = original.height().max(f64::EPSILON);
    let anchor_x = if handle.moves_left() { original.x1 } else { original.x0 };
    let anchor_y = if handle.moves_top() { original.y1 } else { original.y0 };
    let room_x = if handle.moves_left() {
        anchor_x - bounds.x0
    } else {
        bounds.x1 - anchor_x
    };
    let room_y = if handle.moves_top() {
        anchor_y - bounds.y0
    } else {
        bounds.y1 - anchor_y
    };

    let max_scale = (room_x / w).min(room_y / h);
    let scale = dominant_scale(original, handle, delta)
        .max(min_size / w)
        .max(min_size / h)
        .min(max_scale);
    anchored_rect(original, handle, Size::new(w * scale, h * scale))
}
