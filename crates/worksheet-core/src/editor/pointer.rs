//! Pointer input. One gesture runs from press to release and holds the
//! pointer capture for that whole time.

use super::Editor;
use crate::elements::{CanvasElement, ElementId, WidthMode};
use crate::events::EditorEvent;
use crate::geometry::rect_from_element;
use crate::handles::{HandleKind, ResizeHandle, crop_handles, element_handles, hit_test_handles};
use crate::input::{Modifiers, MouseButton, PointerEvent};
use crate::interaction::{Gesture, GestureEnv, GestureKind, InteractionMode};
use crate::selection::{MarqueeOutcome, MarqueeState, hit_test_point, with_group};
use kurbo::{Point, Rect, Vec2};

impl Editor {
    /// Feed one pointer event. Returns true when it was consumed.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Down {
                position,
                button,
                modifiers,
            } => button == MouseButton::Left && self.pointer_down(position, modifiers),
            PointerEvent::Move { position, modifiers } => self.pointer_move(position, modifiers),
            PointerEvent::Up { position, modifiers } => self.pointer_up(position, modifiers),
            PointerEvent::DoubleClick { position, .. } => self.double_click(position),
            PointerEvent::Cancel => self.cancel_gesture(),
        }
    }

    /// The marquee being drawn, in document units.
    pub fn marquee_rect(&self) -> Option<Rect> {
        self.gesture
            .as_ref()
            .filter(|g| g.is_opened())
            .and_then(Gesture::marquee)
            .map(MarqueeState::rect)
    }

    fn pointer_down(&mut self, screen: Point, modifiers: Modifiers) -> bool {
        // A press with no release since the last one abandons that gesture.
        self.cancel_gesture();
        let point = self.viewport.screen_to_document(screen);
        let tolerance = self
            .viewport
            .pixels_to_document(self.config.interaction.handle_tolerance_px);

        if let Some(target) = self.crop_target() {
            if let Some(handle) = self.crop_hit(target, point, tolerance) {
                return self.start_gesture(GestureKind::Crop(handle), screen, point, Some(target), &[target]);
            }
            self.exit_crop_mode();
        }

        if self.selection.editing_text().is_some() {
            if let Some(idx) = self.caret_index_at(point) {
                if let InteractionMode::EditingText(session) = &mut self.mode {
                    session.set_caret(idx, modifiers.shift);
                }
                return true;
            }
            self.end_text_edit();
        }

        if let Some(id) = self.selection.sole() {
            let handle = self
                .active_page()
                .and_then(|p| p.element(id))
                .filter(|e| !e.is_locked())
                .and_then(|e| hit_test_handles(&element_handles(e), point, tolerance));
            match handle {
                Some(HandleKind::Resize(h)) => {
                    return self.start_gesture(GestureKind::Resize(h), screen, point, Some(id), &[id]);
                }
                Some(HandleKind::LineEnd(end)) => {
                    return self.start_gesture(GestureKind::RotateLine(end), screen, point, Some(id), &[id]);
                }
                _ => {}
            }
        }

        let Some(page) = self.active_page() else {
            return false;
        };
        let Some(id) = hit_test_point(&page.elements, point, 0.0) else {
            let marquee = MarqueeState::new(point, modifiers.additive(), self.selection.ids().to_vec());
            return self.start_gesture(GestureKind::Marquee(marquee), screen, point, None, &[]);
        };
        if page.element(id).is_some_and(CanvasElement::is_locked) {
            log::debug!("Press on locked element {} ignored", id);
            return false;
        }

        let group = with_group(page, id);
        let pressed_selected = self.selection.sole() == Some(id);
        if modifiers.additive() {
            if self.selection.contains(id) {
                let ids = self
                    .selection
                    .ids()
                    .iter()
                    .copied()
                    .filter(|s| !group.contains(s))
                    .collect();
                self.set_selection(ids);
                return true;
            }
            let mut ids = self.selection.ids().to_vec();
            for member in group {
                if !ids.contains(&member) {
                    ids.push(member);
                }
            }
            self.set_selection(ids);
        } else if !self.selection.contains(id) {
            self.set_selection(group);
        }

        let moving = self.with_captions(self.selection.ids());
        if !self.start_gesture(GestureKind::Drag, screen, point, Some(id), &moving) {
            return false;
        }
        if let Some(gesture) = self.gesture.as_mut() {
            gesture.pressed_selected = pressed_selected && !modifiers.additive();
        }
        true
    }

    fn pointer_move(&mut self, screen: Point, modifiers: Modifiers) -> bool {
        let threshold = self.config.interaction.gesture_threshold_px;
        let now = self.now();
        let Some(gesture) = self.gesture.as_mut() else {
            return false;
        };
        let opening = !gesture.is_opened();
        if opening {
            if !gesture.exceeds_threshold(screen, threshold) {
                return false;
            }
            gesture.open();
        }
        let mutates = gesture.mutates();
        let dragged: Option<Vec<ElementId>> = matches!(gesture.kind(), GestureKind::Drag)
            .then(|| gesture.originals().iter().map(CanvasElement::id).collect());

        if opening && mutates {
            self.history
                .begin_transaction_at(&self.document.pages, Some(self.active_page), self.selection.ids(), now);
            self.emit(EditorEvent::DragState {
                dragging: true,
                rect: None,
            });
        }
        self.update_gesture(screen, modifiers.shift);
        if mutates {
            self.emit(EditorEvent::DocumentChanged);
        }
        if let Some(ids) = dragged {
            let guides = self.guides_for(&ids, Vec2::ZERO);
            self.set_guides(guides);
        }
        true
    }

    fn pointer_up(&mut self, screen: Point, modifiers: Modifiers) -> bool {
        if self.gesture.as_ref().is_some_and(Gesture::is_opened) {
            self.update_gesture(screen, modifiers.shift);
        }
        let Some(gesture) = self.gesture.take() else {
            return false;
        };

        if let Some(marquee) = gesture.marquee() {
            let threshold = self.config.interaction.drag_threshold;
            let outcome = match self.active_page() {
                Some(page) => marquee.finish(&page.elements, threshold),
                None => return true,
            };
            drop(gesture);
            match outcome {
                MarqueeOutcome::Click { additive: false } => self.clear_selection(),
                MarqueeOutcome::Click { additive: true } => {}
                MarqueeOutcome::Select(ids) => self.set_selection(ids),
            }
            return true;
        }

        if !gesture.is_opened() {
            let second_click = gesture.pressed_selected.then(|| gesture.primary()).flatten();
            drop(gesture);
            if let Some(id) = second_click {
                let is_text = self
                    .active_page()
                    .and_then(|p| p.element(id))
                    .is_some_and(|e| e.as_text().is_some());
                if is_text {
                    self.begin_text_edit(id, None);
                }
            }
            return true;
        }

        let label = match gesture.kind() {
            GestureKind::Drag => "Move",
            GestureKind::Resize(_) => "Resize",
            GestureKind::RotateLine(_) => "Rotate",
            GestureKind::Crop(_) => "Crop",
            GestureKind::Marquee(_) => "Select",
        };
        let rect = gesture
            .primary()
            .and_then(|id| self.active_page()?.element(id))
            .and_then(rect_from_element);
        drop(gesture);

        let now = self.now();
        let committed = self.history.commit_transaction_at(
            &self.document.pages,
            Some(self.active_page),
            self.selection.ids(),
            Some(label),
            now,
        );
        self.set_guides(Vec::new());
        self.emit(EditorEvent::DragState { dragging: false, rect });
        if committed {
            self.emit_history();
        }
        true
    }

    /// Text: edit with the word under the pointer selected. Image-filled
    /// shapes: edit the crop box.
    fn double_click(&mut self, screen: Point) -> bool {
        self.cancel_gesture();
        let point = self.viewport.screen_to_document(screen);
        if let Some(idx) = self.caret_index_at(point) {
            if let InteractionMode::EditingText(session) = &mut self.mode {
                session.select_word_at(idx);
            }
            return true;
        }

        let Some(page) = self.active_page() else {
            return false;
        };
        let Some(element) = hit_test_point(&page.elements, point, 0.0).and_then(|id| page.element(id)) else {
            return false;
        };
        if element.is_locked() {
            return false;
        }
        let id = element.id();
        let is_image = element.as_shape().is_some_and(|s| s.fill.is_image());
        if element.as_text().is_some() {
            self.set_selection(vec![id]);
            return self.begin_text_edit(id, Some(point));
        }
        is_image && self.enter_crop_mode(id)
    }

    fn start_gesture(
        &mut self,
        kind: GestureKind,
        screen: Point,
        point: Point,
        primary: Option<ElementId>,
        ids: &[ElementId],
    ) -> bool {
        let Some(capture) = self.capture.acquire() else {
            return false;
        };
        let originals: Vec<CanvasElement> = self
            .active_page()
            .map(|p| {
                p.elements
                    .iter()
                    .filter(|e| ids.contains(&e.id()) && !e.is_locked())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        self.gesture = Some(Gesture::new(kind, self.active_page, screen, point, primary, originals, capture));
        true
    }

    fn update_gesture(&mut self, screen: Point, snap: bool) -> Option<Rect> {
        let gesture = self.gesture.as_mut()?;
        let page = self.document.page_mut(gesture.page_id())?;
        let env = GestureEnv {
            limits: &self.config.interaction,
            measurer: self.measurer.as_ref(),
            hook: self.hook.as_deref(),
            snap,
        };
        gesture.apply(page, screen, &self.viewport, &env)
    }

    /// Caret position under `point` inside the text being edited.
    fn caret_index_at(&self, point: Point) -> Option<usize> {
        let session = self.text_session()?;
        let text = self
            .active_page()?
            .element(session.element_id())?
            .as_text()?;
        if !text.rect().abs().contains(point) {
            return None;
        }
        let max_width = match text.width_mode {
            WidthMode::Fixed => Some(text.w),
            WidthMode::Auto => None,
        };
        let local = Point::new(point.x - text.x, point.y - text.y);
        Some(
            self.measurer
                .char_index_at(&session.text(), &text.style, max_width, local),
        )
    }

    /// Crop handle or crop box under `point`.
    fn crop_hit(&self, target: ElementId, point: Point, tolerance: f64) -> Option<Option<ResizeHandle>> {
        let shape = self.active_page()?.element(target)?.as_shape()?;
        match hit_test_handles(&crop_handles(shape), point, tolerance) {
            Some(HandleKind::Crop(handle)) => Some(Some(handle)),
            _ if shape.crop_rect_in_document().contains(point) => Some(None),
            _ => None,
        }
    }
}
