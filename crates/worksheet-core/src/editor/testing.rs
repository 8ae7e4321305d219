//! Fixtures shared by the editor unit tests.

use super::Editor;
use crate::config::EditorConfig;
use crate::document::{CanvasDocument, Page};
use crate::elements::{CanvasElement, ElementId, Fill, ShapeElement, ShapeKind, TextElement};
use crate::events::EditorEvent;
use kurbo::Rect;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

/// An editor over one page holding `elements`, driven by a manual clock.
pub(crate) fn editor_with(elements: Vec<CanvasElement>) -> (Editor, Rc<Cell<Instant>>) {
    let clock = Rc::new(Cell::new(Instant::now()));
    let mut editor = Editor::new(EditorConfig::default());
    let source = Rc::clone(&clock);
    editor.set_clock(Box::new(move || source.get()));

    let mut page = Page::new(1);
    page.elements = elements;
    editor.load_document(CanvasDocument::from_pages(vec![page]));
    (editor, clock)
}

pub(crate) fn advance(clock: &Cell<Instant>, ms: u64) {
    clock.set(clock.get() + Duration::from_millis(ms));
}

pub(crate) fn text_at(rect: Rect, text: &str) -> CanvasElement {
    CanvasElement::Text(TextElement::new(rect, text))
}

pub(crate) fn shape_at(rect: Rect) -> CanvasElement {
    CanvasElement::Shape(ShapeElement::new(ShapeKind::Rect, rect))
}

pub(crate) fn image_at(rect: Rect) -> CanvasElement {
    let mut shape = ShapeElement::new(ShapeKind::Rect, rect);
    shape.fill = Fill::image("https://example.com/cat.png");
    CanvasElement::Shape(shape)
}

pub(crate) fn element_rect(editor: &Editor, id: ElementId) -> Option<Rect> {
    editor.active_page()?.element(id)?.box_rect()
}

pub(crate) fn record_events(editor: &mut Editor) -> Rc<RefCell<Vec<EditorEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    editor.subscribe(move |e| sink.borrow_mut().push(e.clone()));
    events
}
