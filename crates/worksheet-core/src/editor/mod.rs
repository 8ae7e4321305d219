//! The editor service.
//!
//! [`Editor`] owns the live document together with the selection, history,
//! clipboard and gesture state, and publishes [`EditorEvent`]s to
//! subscribers. Hosts feed it pointer and keyboard input and read the
//! document back; every mutation goes through here.

mod commands;
mod pointer;
mod requests;

#[cfg(test)]
mod testing;

pub use requests::ImageInsertRequest;

use crate::clipboard::Clipboard;
use crate::config::EditorConfig;
use crate::document::{CanvasDocument, Page, PageId};
use crate::elements::{CanvasElement, ElementId};
use crate::events::{EditorEvent, EventBus, SubscriptionId};
use crate::geometry::{rect_from_element, union_bounds};
use crate::history::{History, HistoryEntry};
use crate::interaction::{
    Gesture, InteractionMode, InteractionState, PointerCapture, TextEditOutcome, TextEditSession, TransformHook,
    text_edit::commit_text,
};
use crate::measure::{ApproxMeasurer, TextMeasurer};
use crate::selection::Selection;
use crate::snap::{AlignmentGuide, alignment_guides};
use crate::storage::{MemorySessionStore, SessionStore};
use crate::viewport::Viewport;
use kurbo::{Point, Rect, Size, Vec2};
use std::sync::Arc;

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// Time source for history timestamps.
pub type Clock = Box<dyn Fn() -> Instant>;

pub struct Editor {
    config: EditorConfig,
    document: CanvasDocument,
    active_page: PageId,
    selection: Selection,
    history: History,
    clipboard: Clipboard,
    viewport: Viewport,
    measurer: Box<dyn TextMeasurer>,
    hook: Option<Box<dyn TransformHook>>,
    clock: Clock,
    capture: PointerCapture,
    gesture: Option<Gesture>,
    mode: InteractionMode,
    guides: Vec<AlignmentGuide>,
    events: EventBus<EditorEvent>,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("active_page", &self.active_page)
            .field("selection", &self.selection)
            .field("mode", &self.mode)
            .field("gesture", &self.gesture)
            .finish_non_exhaustive()
    }
}

impl Editor {
    /// An editor over a fresh one-page document with a private clipboard.
    pub fn new(config: EditorConfig) -> Self {
        Self::with_session_store(config, Arc::new(MemorySessionStore::new()))
    }

    /// An editor sharing `store` for clipboard entries.
    pub fn with_session_store(config: EditorConfig, store: Arc<dyn SessionStore>) -> Self {
        let document = CanvasDocument::new();
        let active_page = document.pages[0].id;
        let mut history = History::new(&config.history);
        history.init(&document.pages, Some(active_page), &[]);
        Self {
            clipboard: Clipboard::new(store, &config.clipboard),
            config,
            document,
            active_page,
            selection: Selection::new(),
            history,
            viewport: Viewport::new(),
            measurer: Box::new(ApproxMeasurer::new()),
            hook: None,
            clock: Box::new(Instant::now),
            capture: PointerCapture::new(),
            gesture: None,
            mode: InteractionMode::Idle,
            guides: Vec::new(),
            events: EventBus::new(),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn document(&self) -> &CanvasDocument {
        &self.document
    }

    pub fn active_page_id(&self) -> PageId {
        self.active_page
    }

    pub fn active_page(&self) -> Option<&Page> {
        self.document.page(self.active_page)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_ids(&self) -> &[ElementId] {
        self.selection.ids()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Render scale reported by the host; invalid values are ignored.
    pub fn set_scale(&mut self, scale: f64) {
        self.viewport.set_scale(scale);
    }

    pub fn set_measurer(&mut self, measurer: Box<dyn TextMeasurer>) {
        self.measurer = measurer;
    }

    pub fn set_transform_hook(&mut self, hook: impl TransformHook + 'static) {
        self.hook = Some(Box::new(hook));
    }

    pub fn clear_transform_hook(&mut self) {
        self.hook = None;
    }

    /// Replace the time source used for history timestamps.
    pub fn set_clock(&mut self, clock: Clock) {
        self.clock = clock;
    }

    pub fn interaction_state(&self) -> InteractionState {
        if let Some(gesture) = &self.gesture {
            return gesture.state();
        }
        match self.mode {
            InteractionMode::Idle => InteractionState::Idle,
            InteractionMode::EditingText(_) => InteractionState::EditingText,
            InteractionMode::EditingImageCrop(_) => InteractionState::EditingImageCrop,
        }
    }

    pub fn text_session(&self) -> Option<&TextEditSession> {
        match &self.mode {
            InteractionMode::EditingText(session) => Some(session),
            _ => None,
        }
    }

    /// Shape whose crop box is being edited.
    pub fn crop_target(&self) -> Option<ElementId> {
        match self.mode {
            InteractionMode::EditingImageCrop(id) => Some(id),
            _ => None,
        }
    }

    /// Guides computed by the last nudge or drag frame.
    pub fn alignment_guides(&self) -> &[AlignmentGuide] {
        &self.guides
    }

    /// True while a gesture owns the pointer.
    pub fn is_pointer_captured(&self) -> bool {
        self.capture.is_held()
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&EditorEvent) + 'static) -> SubscriptionId {
        self.events.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Load a document and start a fresh history.
    pub fn load_document(&mut self, document: CanvasDocument) {
        self.cancel_gesture();
        self.mode = InteractionMode::Idle;
        self.document = CanvasDocument::from_pages(document.pages);
        self.active_page = self.document.pages[0].id;
        self.selection.clear();
        self.guides.clear();
        let now = self.now();
        self.history.init_at(&self.document.pages, Some(self.active_page), &[], now);
        log::info!("Loaded document with {} page(s)", self.document.pages.len());

        self.emit(EditorEvent::DocumentChanged);
        self.emit(EditorEvent::ActivePageChanged(self.active_page));
        self.emit(EditorEvent::SelectionChanged(Vec::new()));
        self.emit_history();
    }

    /// Swap in an external snapshot as one undoable step.
    pub fn replace_document(&mut self, document: CanvasDocument) {
        self.cancel_gesture();
        self.end_text_edit();
        self.exit_crop_mode();
        self.document = CanvasDocument::from_pages(document.pages);
        if self.document.page(self.active_page).is_none() {
            self.set_active_page_unchecked(self.document.pages[0].id);
        }
        self.prune_selection();
        self.commit(Some("Replace document"));
    }

    /// Cancel any gesture and drop all subscribers and history.
    pub fn teardown(&mut self) {
        self.cancel_gesture();
        self.mode = InteractionMode::Idle;
        self.selection.clear();
        self.guides.clear();
        self.history.teardown();
        self.events.clear();
        log::info!("Editor torn down");
    }

    /// Make another page active. Ends any edit mode and clears the selection.
    pub fn set_active_page(&mut self, id: PageId) -> bool {
        if self.document.page(id).is_none() || id == self.active_page {
            return false;
        }
        self.cancel_gesture();
        self.end_text_edit();
        self.exit_crop_mode();
        self.set_active_page_unchecked(id);
        self.set_selection(Vec::new());
        true
    }

    fn set_active_page_unchecked(&mut self, id: PageId) {
        if self.active_page != id {
            self.active_page = id;
            self.emit(EditorEvent::ActivePageChanged(id));
        }
    }

    /// Replace the selection with elements of the active page.
    pub fn select(&mut self, ids: Vec<ElementId>) {
        let Some(page) = self.document.page(self.active_page) else {
            return;
        };
        let ids: Vec<ElementId> = ids.into_iter().filter(|id| page.contains(*id)).collect();
        self.set_selection(ids);
    }

    pub fn clear_selection(&mut self) {
        self.end_text_edit();
        self.set_selection(Vec::new());
    }

    fn set_selection(&mut self, ids: Vec<ElementId>) {
        let before = self.selection.ids().to_vec();
        if let Some(editing) = self.selection.editing_text() {
            if ids != [editing] {
                self.end_text_edit();
            }
        }
        self.selection.set(ids);
        if self.selection.ids() != before.as_slice() {
            self.emit(EditorEvent::SelectionChanged(self.selection.ids().to_vec()));
        }
    }

    /// Drop selected ids that no longer exist on the active page.
    fn prune_selection(&mut self) {
        let page = self.document.page(self.active_page);
        let ids: Vec<ElementId> = self
            .selection
            .ids()
            .iter()
            .copied()
            .filter(|id| page.is_some_and(|p| p.contains(*id)))
            .collect();
        self.set_selection(ids);
    }

    /// Enter text edit mode on the sole selected text element.
    ///
    /// With `word_at`, the word under that document point is selected.
    pub fn begin_text_edit(&mut self, id: ElementId, word_at: Option<Point>) -> bool {
        if self.selection.editing_text() == Some(id) {
            return false;
        }
        let Some(text) = self
            .active_page()
            .and_then(|p| p.element(id))
            .filter(|e| !e.is_locked())
            .and_then(CanvasElement::as_text)
            .cloned()
        else {
            return false;
        };
        self.end_text_edit();
        self.exit_crop_mode();
        if !self.selection.begin_text_edit(id) {
            return false;
        }

        let mut session = TextEditSession::new(&text);
        if let Some(point) = word_at {
            let local = Point::new(point.x - text.x, point.y - text.y);
            let max_width = match text.width_mode {
                crate::elements::WidthMode::Fixed => Some(text.w),
                crate::elements::WidthMode::Auto => None,
            };
            let idx = self.measurer.char_index_at(&session.text(), &text.style, max_width, local);
            session.select_word_at(idx);
        }
        self.mode = InteractionMode::EditingText(session);
        log::debug!("Text edit started on {}", id);
        self.emit(EditorEvent::TextEditStarted(id));
        true
    }

    /// Leave text edit mode, committing the session. A blank result removes
    /// the element instead. Returns the element that was being edited.
    pub fn end_text_edit(&mut self) -> Option<ElementId> {
        if !matches!(self.mode, InteractionMode::EditingText(_)) {
            return None;
        }
        let InteractionMode::EditingText(session) = std::mem::take(&mut self.mode) else {
            return None;
        };
        let id = session.element_id();
        self.selection.end_text_edit();

        match session.finish() {
            TextEditOutcome::Commit(runs) => {
                let min = Size::new(self.config.interaction.text_min_width, self.config.interaction.text_min_height);
                let measurer = self.measurer.as_ref();
                let changed = match self
                    .document
                    .page_mut(self.active_page)
                    .and_then(|p| p.element_mut(id))
                    .and_then(CanvasElement::as_text_mut)
                {
                    Some(text) if text.runs() != runs => {
                        commit_text(text, runs, measurer, min);
                        true
                    }
                    _ => false,
                };
                if changed {
                    self.commit(Some("Edit text"));
                }
            }
            TextEditOutcome::Delete => {
                self.emit(EditorEvent::DeleteRequested(id));
                let removed = self.document.remove_elements(self.active_page, &[id]);
                if !removed.is_empty() {
                    self.selection.remove(id);
                    self.emit(EditorEvent::SelectionChanged(self.selection.ids().to_vec()));
                    self.commit(Some("Delete"));
                }
            }
        }
        log::debug!("Text edit ended on {}", id);
        self.emit(EditorEvent::TextEditEnded(id));
        Some(id)
    }

    /// Edit the crop box of an image-filled shape.
    pub fn enter_crop_mode(&mut self, id: ElementId) -> bool {
        let eligible = self
            .active_page()
            .and_then(|p| p.element(id))
            .filter(|e| !e.is_locked())
            .and_then(CanvasElement::as_shape)
            .is_some_and(|s| s.fill.is_image());
        if !eligible || self.crop_target() == Some(id) {
            return false;
        }
        self.end_text_edit();
        self.set_selection(vec![id]);
        self.mode = InteractionMode::EditingImageCrop(id);
        self.emit(EditorEvent::CropModeChanged(Some(id)));
        true
    }

    pub fn exit_crop_mode(&mut self) -> bool {
        if self.crop_target().is_none() {
            return false;
        }
        self.mode = InteractionMode::Idle;
        self.emit(EditorEvent::CropModeChanged(None));
        true
    }

    /// Abandon the active gesture, restoring the document if it had started
    /// changing it.
    pub fn cancel_gesture(&mut self) -> bool {
        let Some(gesture) = self.gesture.take() else {
            return false;
        };
        if gesture.is_opened() && gesture.mutates() {
            if let Some(start) = self.history.rollback_transaction() {
                self.document.pages = (*start.pages).clone();
                self.emit(EditorEvent::DocumentChanged);
            }
            self.emit(EditorEvent::DragState {
                dragging: false,
                rect: None,
            });
        }
        self.set_guides(Vec::new());
        log::debug!("Gesture cancelled");
        true
    }

    fn now(&self) -> Instant {
        (self.clock)()
    }

    fn emit(&mut self, event: EditorEvent) {
        self.events.emit(&event);
    }

    fn emit_history(&mut self) {
        let event = EditorEvent::HistoryChanged {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        };
        self.emit(event);
    }

    /// Publish a document change and record it in history.
    fn commit(&mut self, label: Option<&str>) {
        self.emit(EditorEvent::DocumentChanged);
        let now = self.now();
        let recorded = self.history.record_at(
            &self.document.pages,
            Some(self.active_page),
            self.selection.ids(),
            label,
            now,
        );
        if recorded {
            self.emit_history();
        }
    }

    /// Make a history entry the live state.
    fn restore(&mut self, entry: &HistoryEntry) {
        self.document.pages = (*entry.pages).clone();
        if self.document.pages.is_empty() {
            self.document = CanvasDocument::new();
        }
        let page = entry
            .selected_page_id
            .filter(|id| self.document.page(*id).is_some())
            .unwrap_or(self.document.pages[0].id);
        self.set_active_page_unchecked(page);
        self.emit(EditorEvent::DocumentChanged);
        let ids: Vec<ElementId> = match self.document.page(page) {
            Some(p) => entry.selected_ids.iter().copied().filter(|id| p.contains(*id)).collect(),
            None => Vec::new(),
        };
        self.set_selection(ids);
    }

    /// Guides for `ids` displaced by `delta`, against the other visible
    /// elements of the active page.
    fn guides_for(&self, ids: &[ElementId], delta: Vec2) -> Vec<AlignmentGuide> {
        let Some(page) = self.active_page() else {
            return Vec::new();
        };
        let moving = union_bounds(
            page.elements
                .iter()
                .filter(|e| ids.contains(&e.id()))
                .filter_map(rect_from_element),
        );
        let Some(moving) = moving else {
            return Vec::new();
        };
        let others: Vec<Rect> = page
            .elements
            .iter()
            .filter(|e| e.is_visible() && !ids.contains(&e.id()))
            .filter_map(rect_from_element)
            .collect();
        alignment_guides(moving + delta, &others, self.config.selection.guide_threshold)
    }

    fn set_guides(&mut self, guides: Vec<AlignmentGuide>) {
        if guides.is_empty() && self.guides.is_empty() {
            return;
        }
        self.guides = guides;
        self.emit(EditorEvent::AlignmentGuides(self.guides.clone()));
    }

    /// `ids` plus the texts linked to any shapes among them by `labelId`.
    fn with_labels(&self, ids: &[ElementId]) -> Vec<ElementId> {
        self.extend_unlocked(ids, |page, id| page.linked_label(id))
    }

    /// `ids` plus the captions a move carries along: linked labels, or
    /// text lying on an unlinked shape.
    fn with_captions(&self, ids: &[ElementId]) -> Vec<ElementId> {
        let tolerance = self.config.selection.label_tolerance;
        self.extend_unlocked(ids, |page, id| page.paired_label(id, tolerance))
    }

    fn extend_unlocked(
        &self,
        ids: &[ElementId],
        label_of: impl Fn(&Page, ElementId) -> Option<ElementId>,
    ) -> Vec<ElementId> {
        let Some(page) = self.active_page() else {
            return ids.to_vec();
        };
        let mut out = ids.to_vec();
        for id in ids {
            if let Some(label) = label_of(page, *id) {
                let unlocked = page.element(label).is_some_and(|e| !e.is_locked());
                if unlocked && !out.contains(&label) {
                    out.push(label);
                }
            }
        }
        out
    }
}
