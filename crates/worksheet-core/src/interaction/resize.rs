//! Box resizing for the 8 handles.

use crate::config::InteractionConfig;
use crate::elements::{ImageBox, ShapeElement, TextElement, WidthMode};
use crate::handles::ResizeHandle;
use crate::measure::TextMeasurer;
use kurbo::{Point, Rect, Size, Vec2};

/// Move the edges under `handle` by `delta`, then clamp to `min`.
///
/// When clamping, the edge opposite the dragged one stays put, so a north or
/// west drag past the minimum leaves the south or east edge fixed.
pub fn resize_rect(original: Rect, handle: ResizeHandle, delta: Vec2, min: Size) -> Rect {
    let original = original.abs();
    let mut r = original;
    if handle.moves_left() {
        r.x0 += delta.x;
    }
    if handle.moves_right() {
        r.x1 += delta.x;
    }
    if handle.moves_top() {
        r.y0 += delta.y;
    }
    if handle.moves_bottom() {
        r.y1 += delta.y;
    }

    if r.x1 - r.x0 < min.width {
        if handle.moves_left() {
            r.x0 = r.x1 - min.width;
        } else {
            r.x1 = r.x0 + min.width;
        }
    }
    if r.y1 - r.y0 < min.height {
        if handle.moves_top() {
            r.y0 = r.y1 - min.height;
        } else {
            r.y1 = r.y0 + min.height;
        }
    }
    r
}

/// Signed growth of the box along each axis for a handle drag.
fn growth(handle: ResizeHandle, delta: Vec2) -> Vec2 {
    let gx = if handle.moves_left() { -delta.x } else { delta.x };
    let gy = if handle.moves_top() { -delta.y } else { delta.y };
    Vec2::new(gx, gy)
}

/// Uniform scale factor for a corner drag, taken from whichever axis the
/// pointer moved further along. Ties go to the horizontal axis.
pub fn dominant_scale(original: Rect, handle: ResizeHandle, delta: Vec2) -> f64 {
    let g = growth(handle, delta);
    let w = original.width().max(f64::EPSILON);
    let h = original.height().max(f64::EPSILON);
    if g.x.abs() >= g.y.abs() { (w + g.x) / w } else { (h + g.y) / h }
}

/// Rect of `size` anchored at the corner opposite `handle`.
pub fn anchored_rect(original: Rect, handle: ResizeHandle, size: Size) -> Rect {
    let original = original.abs();
    let x0 = if handle.moves_left() {
        original.x1 - size.width
    } else {
        original.x0
    };
    let y0 = if handle.moves_top() {
        original.y1 - size.height
    } else {
        original.y0
    };
    Rect::from_origin_size(Point::new(x0, y0), size)
}

/// Resize a text box.
///
/// Corner handles scale the box uniformly and derive the font size from the
/// new height. Side handles change the wrap width, fix the width mode and
/// re-measure the height; the font size is untouched.
pub fn resize_text(
    original: &TextElement,
    handle: ResizeHandle,
    delta: Vec2,
    limits: &InteractionConfig,
    measurer: &dyn TextMeasurer,
) -> TextElement {
    let mut text = original.clone();
    let rect = original.rect();
    let min = Size::new(limits.text_min_width, limits.text_min_height);

    if handle.is_corner() {
        let w = rect.width().max(f64::EPSILON);
        let h = rect.height().max(f64::EPSILON);
        let scale = dominant_scale(rect, handle, delta)
            .max(min.width / w)
            .max(min.height / h);
        let new_size = Size::new(w * scale, h * scale);
        text.set_rect(anchored_rect(rect, handle, new_size));

        let line_px = original.style.line_px().max(f64::EPSILON);
        let lines = (h / line_px).round().max(1.0);
        let font = (new_size.height / (original.line_height() * lines)).round();
        text.style.font_size = font.max(limits.min_font_size).min(limits.max_font_size);
        return text;
    }

    let mut new_rect = resize_rect(rect, handle, delta, min);
    if handle.is_horizontal() {
        let measured = measurer.measure(&original.text, &original.style, Some(new_rect.width()));
        let height = measured.height.max(min.height);
        if handle.moves_top() {
            new_rect.y0 = new_rect.y1 - height;
        } else {
            new_rect.y1 = new_rect.y0 + height;
        }
        text.width_mode = WidthMode::Fixed;
    }
    text.set_rect(new_rect);
    text
}

/// Resize a shape, keeping any crop box inside the new bounds.
pub fn resize_shape(
    original: &ShapeElement,
    handle: ResizeHandle,
    delta: Vec2,
    limits: &InteractionConfig,
) -> ShapeElement {
    let mut shape = original.clone();
    let min = Size::new(limits.shape_min_width, limits.shape_min_height);
    shape.set_rect(resize_rect(original.rect(), handle, delta, min));
    if let Some(crop) = shape.image_box {
        let fitted = super::crop::fit_inside(crop.to_rect(), shape.local_rect());
        shape.image_box = Some(ImageBox::from_rect(fitted));
    }
    shape
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ShapeKind;
    use crate::measure::ApproxMeasurer;

    fn eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_resize_east() {
        let r = resize_rect(Rect::new(0.0, 0.0, 100.0, 100.0), ResizeHandle::E, Vec2::new(20.0, 5.0), Size::new(10.0, 10.0));
        assert_eq!(r, Rect::new(0.0, 0.0, 120.0, 100.0));
    }

    #[test]
    fn test_clamp_west_keeps_east_edge() {
        let r = resize_rect(Rect::new(0.0, 0.0, 100.0, 100.0), ResizeHandle::W, Vec2::new(95.0, 0.0), Size::new(80.0, 80.0));
        assert!(eq(r.width(), 80.0));
        assert!(eq(r.x1, 100.0));
    }

    #[test]
    fn test_clamp_north_keeps_south_edge() {
        let r = resize_rect(Rect::new(0.0, 0.0, 100.0, 100.0), ResizeHandle::NW, Vec2::new(0.0, 500.0), Size::new(80.0, 80.0));
        assert!(eq(r.height(), 80.0));
        assert!(eq(r.y1, 100.0));
    }

    #[test]
    fn test_clamp_southeast_keeps_origin() {
        let r = resize_rect(Rect::new(10.0, 10.0, 110.0, 110.0), ResizeHandle::SE, Vec2::new(-200.0, -200.0), Size::new(80.0, 80.0));
        assert_eq!(r, Rect::new(10.0, 10.0, 90.0, 90.0));
    }

    #[test]
    fn test_dominant_scale() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert!(eq(dominant_scale(rect, ResizeHandle::SE, Vec2::new(10.0, 25.0)), 1.5));
        assert!(eq(dominant_scale(rect, ResizeHandle::NW, Vec2::new(-50.0, 0.0)), 1.5));
        // The wider drag wins even though it is the smaller relative change.
        assert!(eq(dominant_scale(rect, ResizeHandle::SE, Vec2::new(30.0, 20.0)), 1.3));
    }

    #[test]
    fn test_text_corner_resize_scales_font() {
        let mut text = TextElement::new(Rect::new(0.0, 0.0, 100.0, 19.2), "Hello");
        text.style.font_size = 16.0;
        let limits = InteractionConfig::default();
        let out = resize_text(&text, ResizeHandle::SE, Vec2::new(100.0, 0.0), &limits, &ApproxMeasurer::new());

        assert!(eq(out.w, 200.0));
        assert!(eq(out.h, 38.4));
        assert!(eq(out.style.font_size, 32.0));
    }

    #[test]
    fn test_text_corner_resize_clamps_font() {
        let text = TextElement::new(Rect::new(0.0, 0.0, 100.0, 19.2), "Hello");
        let limits = InteractionConfig::default();
        let out = resize_text(&text, ResizeHandle::SE, Vec2::new(5000.0, 0.0), &limits, &ApproxMeasurer::new());
        assert!(eq(out.style.font_size, limits.max_font_size));
    }

    #[test]
    fn test_text_side_resize_remeasures() {
        let text = TextElement::new(Rect::new(0.0, 0.0, 200.0, 19.2), "aaaa bbbb cccc dddd");
        let limits = InteractionConfig::default();
        let measurer = ApproxMeasurer::new();
        let out = resize_text(&text, ResizeHandle::E, Vec2::new(-150.0, 0.0), &limits, &measurer);

        assert!(eq(out.w, 50.0));
        assert!(out.h > text.h);
        assert_eq!(out.width_mode, WidthMode::Fixed);
        assert!(eq(out.style.font_size, text.style.font_size));
    }

    #[test]
    fn test_shape_resize_refits_crop() {
        let mut shape = ShapeElement::new(ShapeKind::Rect, Rect::new(0.0, 0.0, 200.0, 200.0));
        shape.image_box = Some(ImageBox { x: 100.0, y: 100.0, w: 100.0, h: 100.0 });
        let out = resize_shape(&shape, ResizeHandle::SE, Vec2::new(-100.0, -100.0), &InteractionConfig::default());

        assert!(eq(out.w, 100.0));
        let crop = out.image_box.unwrap().to_rect();
        assert!(crop.x1 <= 100.0 && crop.y1 <= 100.0);
    }
}
