//! Pointer gesture state machine.
//!
//! A [`Gesture`] lives from pointer-down to pointer-up. It keeps the
//! elements as they were at pointer-down and recomputes every move from
//! those originals and the cumulative pointer delta, so coalesced or dropped
//! move events never accumulate error.

pub mod capture;
pub mod crop;
pub mod resize;
pub mod rotate;
pub mod text_edit;

pub use capture::{CaptureGuard, PointerCapture};
pub use text_edit::{Format, TextEditOutcome, TextEditSession};

use crate::config::InteractionConfig;
use crate::document::{Page, PageId};
use crate::elements::{CanvasElement, ElementId, ImageBox};
use crate::geometry::rect_from_element;
use crate::handles::{LineEnd, ResizeHandle};
use crate::measure::TextMeasurer;
use crate::selection::MarqueeState;
use crate::viewport::Viewport;
use kurbo::{Point, Rect};

/// The kind of change a [`TransformHook`] is asked to constrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    Move,
    Resize,
    Rotate,
    Crop,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformContext {
    pub kind: TransformKind,
    pub handle: Option<ResizeHandle>,
    pub element_id: ElementId,
}

/// Host-supplied constraint on candidate rects, applied after clamping.
pub trait TransformHook {
    fn transform(&self, rect: Rect, ctx: &TransformContext) -> Rect;
}

impl<F> TransformHook for F
where
    F: Fn(Rect, &TransformContext) -> Rect,
{
    fn transform(&self, rect: Rect, ctx: &TransformContext) -> Rect {
        self(rect, ctx)
    }
}

/// What the pointer is doing.
#[derive(Debug, Clone)]
pub enum GestureKind {
    Drag,
    Resize(ResizeHandle),
    RotateLine(LineEnd),
    /// Move the crop box, or resize it with a handle.
    Crop(Option<ResizeHandle>),
    Marquee(MarqueeState),
}

/// Coarse state reported to hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    Selecting,
    Dragging,
    Resizing,
    RotatingLine,
    EditingText,
    EditingImageCrop,
}

/// Modal editing state that outlives single gestures.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InteractionMode {
    #[default]
    Idle,
    EditingText(TextEditSession),
    EditingImageCrop(ElementId),
}

/// Inputs a gesture needs to compute a frame.
pub struct GestureEnv<'a> {
    pub limits: &'a InteractionConfig,
    pub measurer: &'a dyn TextMeasurer,
    pub hook: Option<&'a dyn TransformHook>,
    /// Shift held: snap line angles.
    pub snap: bool,
}

/// One pointer-down to pointer-up interaction.
#[derive(Debug)]
pub struct Gesture {
    kind: GestureKind,
    page_id: PageId,
    start_screen: Point,
    start_doc: Point,
    primary: Option<ElementId>,
    originals: Vec<CanvasElement>,
    opened: bool,
    /// The primary was already the sole selection at pointer-down.
    pub pressed_selected: bool,
    _capture: CaptureGuard,
}

impl Gesture {
    pub fn new(
        kind: GestureKind,
        page_id: PageId,
        start_screen: Point,
        start_doc: Point,
        primary: Option<ElementId>,
        originals: Vec<CanvasElement>,
        capture: CaptureGuard,
    ) -> Self {
        log::debug!("Gesture started: {:?}", kind);
        Self {
            kind,
            page_id,
            start_screen,
            start_doc,
            primary,
            originals,
            opened: false,
            pressed_selected: false,
            _capture: capture,
        }
    }

    pub fn kind(&self) -> &GestureKind {
        &self.kind
    }

    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    pub fn primary(&self) -> Option<ElementId> {
        self.primary
    }

    pub fn originals(&self) -> &[CanvasElement] {
        &self.originals
    }

    pub fn start_doc(&self) -> Point {
        self.start_doc
    }

    pub fn marquee(&self) -> Option<&MarqueeState> {
        match &self.kind {
            GestureKind::Marquee(m) => Some(m),
            _ => None,
        }
    }

    pub fn state(&self) -> InteractionState {
        match self.kind {
            GestureKind::Drag => InteractionState::Dragging,
            GestureKind::Resize(_) => InteractionState::Resizing,
            GestureKind::RotateLine(_) => InteractionState::RotatingLine,
            GestureKind::Crop(_) => InteractionState::EditingImageCrop,
            GestureKind::Marquee(_) => InteractionState::Selecting,
        }
    }

    /// Whether the gesture has moved far enough to count.
    pub fn is_opened(&self) -> bool {
        self.opened
    }

    /// True when `screen` is at least `threshold_px` from the press point.
    pub fn exceeds_threshold(&self, screen: Point, threshold_px: f64) -> bool {
        (screen - self.start_screen).hypot() >= threshold_px
    }

    pub fn open(&mut self) {
        self.opened = true;
    }

    /// Whether the gesture edits the document (as opposed to selecting).
    pub fn mutates(&self) -> bool {
        !matches!(self.kind, GestureKind::Marquee(_))
    }

    /// Recompute the page for the pointer at `screen`.
    ///
    /// Returns the primary element's new rect, if any.
    pub fn apply(&mut self, page: &mut Page, screen: Point, viewport: &Viewport, env: &GestureEnv<'_>) -> Option<Rect> {
        let delta = viewport.pixel_delta_to_document(screen - self.start_screen);
        let pointer = self.start_doc + delta;

        if let GestureKind::Marquee(marquee) = &mut self.kind {
            marquee.update(pointer);
            return None;
        }

        let original = self
            .primary
            .and_then(|id| self.originals.iter().find(|e| e.id() == id));
        match &self.kind {
            GestureKind::Marquee(_) => return None,
            GestureKind::Drag => {
                for original in &self.originals {
                    let mut moved = original.clone();
                    moved.translate(delta);
                    constrain(&mut moved, TransformKind::Move, None, env);
                    replace(page, moved);
                }
            }
            GestureKind::Resize(handle) => {
                let mut resized = match original? {
                    CanvasElement::Text(t) => {
                        CanvasElement::Text(resize::resize_text(t, *handle, delta, env.limits, env.measurer))
                    }
                    CanvasElement::Shape(s) => CanvasElement::Shape(resize::resize_shape(s, *handle, delta, env.limits)),
                    CanvasElement::Line(_) => return None,
                };
                constrain(&mut resized, TransformKind::Resize, Some(*handle), env);
                replace(page, resized);
            }
            GestureKind::RotateLine(end) => {
                let from = original?.as_line()?;
                let (start, finish) = rotate::rotate_line(from, *end, pointer, env.snap, env.limits.line_min_length);
                let mut rotated = from.clone();
                rotated.start = start;
                rotated.end = finish;
                replace(page, CanvasElement::Line(rotated));
            }
            GestureKind::Crop(handle) => {
                let mut shape = original?.as_shape()?.clone();
                let bounds = shape.local_rect();
                let mut crop = crop::crop_box(shape.crop_rect(), bounds, *handle, delta, env.limits.crop_min_size);
                if let Some(hook) = env.hook {
                    let ctx = TransformContext {
                        kind: TransformKind::Crop,
                        handle: *handle,
                        element_id: shape.base.id,
                    };
                    crop = crop::fit_inside(hook.transform(crop, &ctx), bounds);
                }
                shape.image_box = Some(ImageBox::from_rect(crop));
                replace(page, CanvasElement::Shape(shape));
            }
        }

        self.primary
            .and_then(|id| page.element(id))
            .and_then(rect_from_element)
    }
}

/// Run the host hook over a box element's rect.
fn constrain(element: &mut CanvasElement, kind: TransformKind, handle: Option<ResizeHandle>, env: &GestureEnv<'_>) {
    let (Some(hook), Some(rect)) = (env.hook, element.box_rect()) else {
        return;
    };
    let ctx = TransformContext {
        kind,
        handle,
        element_id: element.id(),
    };
    element.set_box_rect(hook.transform(rect, &ctx));
}

fn replace(page: &mut Page, element: CanvasElement) {
    if let Some(slot) = page.element_mut(element.id()) {
        *slot = element;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{LineElement, LineKind, ShapeElement, ShapeKind, TextElement};
    use crate::measure::ApproxMeasurer;

    fn env<'a>(limits: &'a InteractionConfig, measurer: &'a ApproxMeasurer, hook: Option<&'a dyn TransformHook>) -> GestureEnv<'a> {
        GestureEnv {
            limits,
            measurer,
            hook,
            snap: false,
        }
    }

    fn gesture(kind: GestureKind, page: &Page, primary: ElementId, capture: &PointerCapture) -> Gesture {
        Gesture::new(
            kind,
            page.id,
            Point::ZERO,
            Point::ZERO,
            Some(primary),
            page.elements.clone(),
            capture.acquire().unwrap(),
        )
    }

    fn page_with(element: CanvasElement) -> (Page, ElementId) {
        let mut page = Page::new(1);
        let id = element.id();
        page.elements.push(element);
        (page, id)
    }

    #[test]
    fn test_drag_is_cumulative_and_scaled() {
        let (mut page, id) = page_with(CanvasElement::Text(TextElement::new(Rect::new(0.0, 0.0, 50.0, 20.0), "a")));
        let capture = PointerCapture::new();
        let mut g = gesture(GestureKind::Drag, &page, id, &capture);
        let mut viewport = Viewport::new();
        viewport.set_scale(2.0);
        let limits = InteractionConfig::default();
        let measurer = ApproxMeasurer::new();

        g.apply(&mut page, Point::new(10.0, 10.0), &viewport, &env(&limits, &measurer, None));
        let rect = g.apply(&mut page, Point::new(40.0, 20.0), &viewport, &env(&limits, &measurer, None));
        assert_eq!(rect, Some(Rect::new(20.0, 10.0, 70.0, 30.0)));
    }

    #[test]
    fn test_hook_runs_after_clamp() {
        let (mut page, id) = page_with(CanvasElement::Shape(ShapeElement::new(ShapeKind::Rect, Rect::new(0.0, 0.0, 100.0, 100.0))));
        let capture = PointerCapture::new();
        let mut g = gesture(GestureKind::Resize(ResizeHandle::E), &page, id, &capture);
        let limits = InteractionConfig::default();
        let measurer = ApproxMeasurer::new();
        let seen = std::cell::Cell::new(0.0);
        let hook = |rect: Rect, ctx: &TransformContext| {
            assert_eq!(ctx.kind, TransformKind::Resize);
            seen.set(rect.width());
            Rect::new(rect.x0, rect.y0, rect.x1 + 1.0, rect.y1)
        };

        let rect = g.apply(&mut page, Point::new(-90.0, 0.0), &Viewport::new(), &env(&limits, &measurer, Some(&hook)));
        assert!((seen.get() - 80.0).abs() < 1e-9);
        assert_eq!(rect, Some(Rect::new(0.0, 0.0, 81.0, 100.0)));
    }

    #[test]
    fn test_rotate_line_gesture() {
        let line = LineElement::new(LineKind::Line, Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let (mut page, id) = page_with(CanvasElement::Line(line));
        let capture = PointerCapture::new();
        let mut g = Gesture::new(
            GestureKind::RotateLine(LineEnd::End),
            page.id,
            Point::new(100.0, 0.0),
            Point::new(100.0, 0.0),
            Some(id),
            page.elements.clone(),
            capture.acquire().unwrap(),
        );
        let limits = InteractionConfig::default();
        let measurer = ApproxMeasurer::new();
        g.apply(&mut page, Point::new(50.0, 80.0), &Viewport::new(), &env(&limits, &measurer, None));

        let rotated = page.element(id).and_then(CanvasElement::as_line).unwrap();
        assert!(rotated.end.distance(Point::new(50.0, 50.0)) < 1e-9);
    }

    #[test]
    fn test_crop_gesture_stays_inside_shape() {
        let mut shape = ShapeElement::new(ShapeKind::Rect, Rect::new(100.0, 100.0, 200.0, 200.0));
        shape.image_box = Some(ImageBox { x: 0.0, y: 0.0, w: 50.0, h: 50.0 });
        let (mut page, id) = page_with(CanvasElement::Shape(shape));
        let capture = PointerCapture::new();
        let mut g = gesture(GestureKind::Crop(None), &page, id, &capture);
        let limits = InteractionConfig::default();
        let measurer = ApproxMeasurer::new();
        g.apply(&mut page, Point::new(500.0, 10.0), &Viewport::new(), &env(&limits, &measurer, None));

        let crop = page.element(id).and_then(CanvasElement::as_shape).unwrap().image_box.unwrap();
        assert_eq!(crop, ImageBox { x: 50.0, y: 10.0, w: 50.0, h: 50.0 });
    }

    #[test]
    fn test_threshold_and_capture_release() {
        let (page, id) = page_with(CanvasElement::Text(TextElement::new(Rect::new(0.0, 0.0, 10.0, 10.0), "a")));
        let capture = PointerCapture::new();
        let g = gesture(GestureKind::Drag, &page, id, &capture);
        assert!(!g.exceeds_threshold(Point::new(0.5, 0.0), 1.0));
        assert!(g.exceeds_threshold(Point::new(1.0, 0.0), 1.0));
        assert_eq!(g.state(), InteractionState::Dragging);
        assert!(capture.is_held());
        drop(g);
        assert!(!capture.is_held());
    }
}
