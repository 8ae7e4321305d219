//! End-to-end editing scenarios driven through the public editor API.

use kurbo::{Point, Rect};
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};
use worksheet_core::config::HistoryConfig;
use worksheet_core::elements::{ShapeKind, WidthMode};
use worksheet_core::{
    CanvasDocument, CanvasElement, EditorConfig, Editor, ElementId, History, Key, KeyInput, Modifiers, MouseButton,
    Page, PointerEvent, ShapeElement, TextElement,
};

struct Harness {
    editor: Editor,
    clock: Rc<Cell<Instant>>,
}

impl Harness {
    fn new(elements: Vec<CanvasElement>) -> Self {
        let mut page = Page::new(1);
        page.elements = elements;
        Self::with_pages(vec![page])
    }

    fn with_pages(pages: Vec<Page>) -> Self {
        let clock = Rc::new(Cell::new(Instant::now()));
        let mut editor = Editor::new(EditorConfig::default());
        let source = Rc::clone(&clock);
        editor.set_clock(Box::new(move || source.get()));
        editor.load_document(CanvasDocument::from_pages(pages));
        Self { editor, clock }
    }

    fn wait(&self, ms: u64) {
        self.clock.set(self.clock.get() + Duration::from_millis(ms));
    }

    fn press(&mut self, x: f64, y: f64, modifiers: Modifiers) {
        self.editor.handle_pointer(PointerEvent::Down {
            position: Point::new(x, y),
            button: MouseButton::Left,
            modifiers,
        });
    }

    fn drag_to(&mut self, x: f64, y: f64) {
        self.editor.handle_pointer(PointerEvent::Move {
            position: Point::new(x, y),
            modifiers: Modifiers::NONE,
        });
    }

    fn release(&mut self, x: f64, y: f64) {
        self.editor.handle_pointer(PointerEvent::Up {
            position: Point::new(x, y),
            modifiers: Modifiers::NONE,
        });
    }

    fn key(&mut self, key: Key, modifiers: Modifiers) -> bool {
        self.editor.handle_key(&KeyInput::new(key, modifiers))
    }

    fn rect_of(&self, id: ElementId) -> Option<Rect> {
        self.editor.active_page()?.element(id)?.box_rect()
    }
}

fn text(rect: Rect, content: &str) -> CanvasElement {
    CanvasElement::Text(TextElement::new(rect, content))
}

fn rect_shape(rect: Rect) -> CanvasElement {
    CanvasElement::Shape(ShapeElement::new(ShapeKind::Rect, rect))
}

#[test]
fn test_click_versus_marquee() {
    let hit = text(Rect::new(30.0, 20.0, 60.0, 35.0), "hit");
    let miss = text(Rect::new(60.0, 60.0, 90.0, 80.0), "miss");
    let mut hidden = rect_shape(Rect::new(12.0, 12.0, 92.0, 92.0));
    hidden.base_mut().selectable = Some(false);
    let hit_id = hit.id();
    let mut h = Harness::new(vec![hidden, hit, miss]);

    h.editor.select(vec![hit_id]);
    h.press(10.0, 10.0, Modifiers::NONE);
    h.release(10.0, 10.0);
    assert!(h.editor.selected_ids().is_empty());

    h.press(10.0, 10.0, Modifiers::NONE);
    h.drag_to(30.0, 30.0);
    h.drag_to(50.0, 40.0);
    h.release(50.0, 40.0);
    assert_eq!(h.editor.selected_ids(), &[hit_id]);
}

#[test]
fn test_marquee_under_threshold_is_a_click() {
    let a = text(Rect::new(100.0, 100.0, 120.0, 110.0), "a");
    let id = a.id();
    let mut h = Harness::new(vec![a]);
    h.editor.select(vec![id]);

    h.press(10.0, 10.0, Modifiers::NONE);
    h.drag_to(8.0, 8.0);
    h.release(8.0, 8.0);
    assert!(h.editor.selected_ids().is_empty());
}

#[test]
fn test_paste_offset_depends_on_target_page() {
    let source = text(Rect::new(100.0, 100.0, 150.0, 120.0), "Name");
    let source_id = source.id();
    let mut page_a = Page::new(1);
    page_a.elements.push(source);
    let page_b = Page::new(2);
    let (a, b) = (page_a.id, page_b.id);
    let mut h = Harness::with_pages(vec![page_a, page_b]);

    h.editor.select(vec![source_id]);
    assert!(h.key(Key::Char('c'), Modifiers::ctrl()));
    assert!(h.key(Key::Char('v'), Modifiers::ctrl()));
    let pasted = h.editor.selected_ids()[0];
    assert_ne!(pasted, source_id);
    assert_eq!(h.rect_of(pasted), Some(Rect::new(110.0, 110.0, 160.0, 130.0)));

    assert!(h.editor.set_active_page(b));
    assert!(h.key(Key::Char('v'), Modifiers::ctrl()));
    let pasted_b = h.editor.selected_ids()[0];
    assert_eq!(h.rect_of(pasted_b), Some(Rect::new(100.0, 100.0, 150.0, 120.0)));
    assert_eq!(h.editor.document().page(a).map(|p| p.elements.len()), Some(2));
}

#[test]
fn test_tab_cycle_reading_order() {
    let top_right = text(Rect::new(50.0, 0.0, 80.0, 20.0), "1");
    let near_left = text(Rect::new(10.0, 5.0, 40.0, 25.0), "2");
    let below = text(Rect::new(0.0, 100.0, 30.0, 120.0), "3");
    let order = [near_left.id(), top_right.id(), below.id()];
    let mut h = Harness::new(vec![top_right, near_left, below]);

    for expected in order.iter().chain(order.first()) {
        h.key(Key::Tab, Modifiers::NONE);
        assert_eq!(h.editor.selected_ids(), &[*expected]);
    }
}

#[test]
fn test_history_merge_window() {
    let start = Instant::now();
    let mut history = History::new(&HistoryConfig::default());
    let mut page = Page::new(1);
    history.init_at(std::slice::from_ref(&page), Some(page.id), &[], start);

    let mut edit = |history: &mut History, n: f64, at: u64, label: Option<&str>| {
        page.elements = vec![text(Rect::new(n, 0.0, n + 10.0, 10.0), "x")];
        history.record_at(
            std::slice::from_ref(&page),
            Some(page.id),
            &[],
            label,
            start + Duration::from_millis(at),
        )
    };

    edit(&mut history, 1.0, 1000, None);
    edit(&mut history, 2.0, 1200, None);
    edit(&mut history, 3.0, 1400, None);
    assert_eq!(history.past_len(), 1);

    edit(&mut history, 4.0, 2000, None);
    assert_eq!(history.past_len(), 2);

    edit(&mut history, 5.0, 2100, Some("Move"));
    assert_eq!(history.past_len(), 3);
}

#[test]
fn test_noop_record_is_idempotent() {
    let mut history = History::new(&HistoryConfig::default());
    let page = Page::new(1);
    history.init(std::slice::from_ref(&page), Some(page.id), &[]);
    for _ in 0..3 {
        assert!(!history.record(std::slice::from_ref(&page), Some(page.id), &[], Some("Nothing")));
    }
    assert_eq!(history.past_len(), 0);
    assert_eq!(history.future_len(), 0);
}

#[test]
fn test_drag_back_to_start_adds_no_entry() {
    let a = text(Rect::new(0.0, 0.0, 40.0, 20.0), "a");
    let mut h = Harness::new(vec![a]);

    h.press(10.0, 10.0, Modifiers::NONE);
    h.drag_to(40.0, 40.0);
    h.drag_to(10.0, 10.0);
    h.release(10.0, 10.0);
    assert_eq!(h.editor.history().past_len(), 0);
    assert!(!h.editor.history().in_transaction());
}

#[test]
fn test_undo_redo_round_trip() {
    for n in 0..5usize {
        let a = text(Rect::new(0.0, 0.0, 40.0, 20.0), "a");
        let id = a.id();
        let mut h = Harness::new(vec![a]);
        let initial = h.editor.document().clone();
        h.editor.select(vec![id]);

        for _ in 0..n {
            h.wait(1000);
            h.key(Key::ArrowRight, Modifiers::NONE);
        }
        let edited = h.editor.document().clone();

        for _ in 0..n {
            h.wait(1000);
            assert!(h.key(Key::Char('z'), Modifiers::ctrl()));
        }
        assert_eq!(h.editor.document(), &initial);
        assert!(!h.editor.undo());

        for _ in 0..n {
            h.wait(1000);
            assert!(h.key(Key::Char('z'), Modifiers::ctrl_shift()));
        }
        assert_eq!(h.editor.document(), &edited);
    }
}

#[test]
fn test_text_corner_resize_scales_font() {
    let mut element = TextElement::new(Rect::new(0.0, 0.0, 100.0, 19.2), "Hello");
    element.width_mode = WidthMode::Fixed;
    let id = element.base.id;
    let mut h = Harness::new(vec![CanvasElement::Text(element)]);
    h.editor.select(vec![id]);

    h.press(100.0, 19.2, Modifiers::NONE);
    h.drag_to(200.0, 19.2);
    h.release(200.0, 19.2);

    let resized = h
        .editor
        .active_page()
        .and_then(|p| p.element(id))
        .and_then(CanvasElement::as_text)
        .cloned()
        .unwrap();
    assert!((resized.w - 200.0).abs() < 1e-9);
    assert!((resized.h - 38.4).abs() < 1e-9);
    assert!((resized.style.font_size - 32.0).abs() < 1e-9);
}

#[test]
fn test_shape_resize_clamps_from_north_west() {
    let shape = rect_shape(Rect::new(100.0, 100.0, 200.0, 200.0));
    let id = shape.id();
    let mut h = Harness::new(vec![shape]);
    h.editor.select(vec![id]);

    h.press(100.0, 100.0, Modifiers::NONE);
    h.drag_to(400.0, 400.0);
    h.release(400.0, 400.0);
    assert_eq!(h.rect_of(id), Some(Rect::new(120.0, 120.0, 200.0, 200.0)));
}

#[test]
fn test_teardown_mid_drag_restores_document() {
    let a = text(Rect::new(0.0, 0.0, 40.0, 20.0), "a");
    let id = a.id();
    let mut h = Harness::new(vec![a]);

    h.press(10.0, 10.0, Modifiers::NONE);
    h.drag_to(100.0, 10.0);
    assert!(h.editor.is_pointer_captured());
    h.editor.teardown();

    assert!(!h.editor.is_pointer_captured());
    assert_eq!(h.rect_of(id), Some(Rect::new(0.0, 0.0, 40.0, 20.0)));
}

#[test]
fn test_document_snapshot_round_trips() {
    let mut h = Harness::new(vec![
        text(Rect::new(0.0, 0.0, 40.0, 20.0), "a"),
        rect_shape(Rect::new(50.0, 50.0, 130.0, 130.0)),
    ]);
    h.editor.add_page(None);

    let json = h.editor.document().to_json().unwrap();
    let decoded = CanvasDocument::from_json(&json).unwrap();
    assert_eq!(&decoded, h.editor.document());
}
