//! Replays a [`Script`] through an [`Editor`] on a script-controlled clock.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use worksheet_core::{CanvasDocument, Editor, EditorConfig, EditorEvent, Key, KeyInput};

use crate::error::{AppError, AppResult};
use crate::script::{Script, ScriptStep};

/// Outcome counters of one script run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub steps: usize,
    /// Steps the editor reported as handled.
    pub handled: usize,
    pub document_changes: usize,
}

pub struct ScriptRunner {
    editor: Editor,
    clock: Rc<Cell<Instant>>,
    changes: Rc<Cell<usize>>,
    deleted: Rc<RefCell<Vec<String>>>,
}

impl ScriptRunner {
    pub fn new(config: EditorConfig, document: Option<CanvasDocument>) -> Self {
        let clock = Rc::new(Cell::new(Instant::now()));
        let mut editor = Editor::new(config);
        let source = Rc::clone(&clock);
        editor.set_clock(Box::new(move || source.get()));
        if let Some(document) = document {
            editor.load_document(document);
        }

        let changes = Rc::new(Cell::new(0));
        let deleted = Rc::new(RefCell::new(Vec::new()));
        let (change_sink, delete_sink) = (Rc::clone(&changes), Rc::clone(&deleted));
        editor.subscribe(move |event| match event {
            EditorEvent::DocumentChanged => change_sink.set(change_sink.get() + 1),
            EditorEvent::DeleteRequested(id) => delete_sink.borrow_mut().push(id.to_string()),
            _ => {}
        });

        Self {
            editor,
            clock,
            changes,
            deleted,
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    /// Ids of elements the editor asked the host to delete.
    pub fn delete_requests(&self) -> Vec<String> {
        self.deleted.borrow().clone()
    }

    pub fn run(&mut self, script: &Script) -> AppResult<RunReport> {
        let before = self.changes.get();
        let mut report = RunReport::default();
        for (index, step) in script.steps.iter().enumerate() {
            let handled = self.apply(index, step)?;
            log::debug!("Step {}: {:?} -> {}", index, step, handled);
            report.steps += 1;
            if handled {
                report.handled += 1;
            }
        }
        report.document_changes = self.changes.get() - before;
        log::info!(
            "Replayed {} step(s), {} handled, {} document change(s)",
            report.steps,
            report.handled,
            report.document_changes
        );
        Ok(report)
    }

    /// Apply one step. Returns whether the editor acted on it.
    pub fn apply(&mut self, index: usize, step: &ScriptStep) -> AppResult<bool> {
        let handled = match step {
            ScriptStep::Pointer { event } => self.editor.handle_pointer(event.clone()),
            ScriptStep::Key {
                key,
                modifiers,
                editable_focus,
            } => {
                let Some(parsed) = Key::from_name(key) else {
                    return Err(AppError::UnknownKey {
                        index,
                        name: key.clone(),
                    });
                };
                let mut input = KeyInput::new(parsed, *modifiers);
                input.editable_focus = *editable_focus;
                self.editor.handle_key(&input)
            }
            ScriptStep::Text { text } => self.editor.type_text(text),
            ScriptStep::InsertImage { request } => self.editor.insert_image(request.clone()).is_some(),
            ScriptStep::AddPage { orientation } => {
                self.editor.add_page(*orientation);
                true
            }
            ScriptStep::SelectPage { index: page } => match self.editor.document().pages.get(*page) {
                Some(target) => {
                    let id = target.id;
                    self.editor.set_active_page(id)
                }
                None => {
                    log::warn!("Step {}: no page at index {}", index, page);
                    false
                }
            },
            ScriptStep::Scale { scale } => {
                self.editor.set_scale(*scale);
                true
            }
            ScriptStep::Undo => self.editor.undo(),
            ScriptStep::Redo => self.editor.redo(),
            ScriptStep::Wait { ms } => {
                self.clock.set(self.clock.get() + Duration::from_millis(*ms));
                true
            }
        };
        Ok(handled)
    }

    /// Cancel any open gesture and hand back the final document.
    pub fn finish(mut self) -> CanvasDocument {
        self.editor.teardown();
        self.editor.document().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Rect};
    use worksheet_core::{CanvasElement, Modifiers, Page, PointerEvent, TextElement};

    fn runner_with_text() -> (ScriptRunner, worksheet_core::ElementId) {
        let text = TextElement::new(Rect::new(0.0, 0.0, 40.0, 20.0), "a");
        let id = text.base.id;
        let mut page = Page::new(1);
        page.elements.push(CanvasElement::Text(text));
        let runner = ScriptRunner::new(
            EditorConfig::default(),
            Some(CanvasDocument::from_pages(vec![page])),
        );
        (runner, id)
    }

    fn rect_of(runner: &ScriptRunner, id: worksheet_core::ElementId) -> Option<Rect> {
        runner.editor().active_page()?.element(id)?.box_rect()
    }

    #[test]
    fn test_drag_script_moves_element() {
        let (mut runner, id) = runner_with_text();
        let script = Script {
            steps: vec![
                ScriptStep::Pointer {
                    event: PointerEvent::Down {
                        position: Point::new(10.0, 10.0),
                        button: Default::default(),
                        modifiers: Modifiers::NONE,
                    },
                },
                ScriptStep::Pointer {
                    event: PointerEvent::Move {
                        position: Point::new(60.0, 30.0),
                        modifiers: Modifiers::NONE,
                    },
                },
                ScriptStep::Pointer {
                    event: PointerEvent::Up {
                        position: Point::new(60.0, 30.0),
                        modifiers: Modifiers::NONE,
                    },
                },
            ],
        };

        let report = runner.run(&script).unwrap();
        assert_eq!(report.steps, 3);
        assert!(report.document_changes > 0);
        assert_eq!(rect_of(&runner, id), Some(Rect::new(50.0, 20.0, 90.0, 40.0)));
        assert_eq!(runner.editor().history().past_len(), 1);
    }

    #[test]
    fn test_wait_separates_nudges() {
        let (mut runner, id) = runner_with_text();
        runner.editor_mut().select(vec![id]);
        let json = r#"{ "steps": [
            { "step": "key", "key": "ArrowRight" },
            { "step": "wait", "ms": 1000 },
            { "step": "key", "key": "ArrowRight" },
            { "step": "wait", "ms": 1000 },
            { "step": "undo" }
        ] }"#;

        let report = runner.run(&Script::from_json(json).unwrap()).unwrap();
        assert_eq!(report.handled, 5);
        assert_eq!(runner.editor().history().past_len(), 1);
        assert_eq!(runner.editor().history().future_len(), 1);
    }

    #[test]
    fn test_unknown_key_reports_step_index() {
        let (mut runner, _) = runner_with_text();
        let json = r#"{ "steps": [ { "step": "wait", "ms": 1 }, { "step": "key", "key": "PageUp" } ] }"#;

        let err = runner.run(&Script::from_json(json).unwrap()).unwrap_err();
        assert!(matches!(err, AppError::UnknownKey { index: 1, .. }));
    }

    #[test]
    fn test_pages_and_images() {
        let mut runner = ScriptRunner::new(EditorConfig::default(), None);
        let json = r#"{ "steps": [
            { "step": "addPage", "orientation": "landscape" },
            { "step": "insertImage", "request": { "imageUrl": "https://example.com/a.png" } },
            { "step": "selectPage", "index": 0 },
            { "step": "selectPage", "index": 7 }
        ] }"#;

        let report = runner.run(&Script::from_json(json).unwrap()).unwrap();
        assert_eq!(report.handled, 3);
        let document = runner.finish();
        assert_eq!(document.pages.len(), 2);
        assert_eq!(document.pages[1].elements.len(), 1);
    }

    #[test]
    fn test_finish_rolls_back_open_drag() {
        let (mut runner, id) = runner_with_text();
        let json = r#"{ "steps": [
            { "step": "pointer", "event": { "kind": "down", "position": { "x": 10, "y": 10 } } },
            { "step": "pointer", "event": { "kind": "move", "position": { "x": 90, "y": 10 } } }
        ] }"#;
        runner.run(&Script::from_json(json).unwrap()).unwrap();

        let document = runner.finish();
        let moved = document.pages[0].element(id).and_then(CanvasElement::box_rect);
        assert_eq!(moved, Some(Rect::new(0.0, 0.0, 40.0, 20.0)));
    }
}
