//! Keyboard commands and in-place text editing keys.

use super::Editor;
use crate::clipboard::ClipboardContent;
use crate::document::{LayerMove, PageId};
use crate::elements::{CanvasElement, ElementId, duplicate_elements};
use crate::events::EditorEvent;
use crate::input::{Key, KeyInput};
use crate::interaction::{Format, InteractionMode};
use crate::keyboard::{self, Command};
use crate::selection::{cycle, reading_order, selectable_ids};
use kurbo::Vec2;

impl Editor {
    /// Route a key press. Returns true when it changed something.
    ///
    /// While a text element is being edited every key except Escape goes
    /// to the edit session.
    pub fn handle_key(&mut self, input: &KeyInput) -> bool {
        if input.key != Key::Escape && !input.editable_focus && self.text_session().is_some() {
            return self.edit_text_key(input);
        }
        match keyboard::resolve(input, self.selection.editing_text().is_some()) {
            Some(command) => self.execute(command),
            None => false,
        }
    }

    /// Insert typed text into the active edit session.
    pub fn type_text(&mut self, text: &str) -> bool {
        match &mut self.mode {
            InteractionMode::EditingText(session) if !text.is_empty() => {
                session.insert(text);
                true
            }
            _ => false,
        }
    }

    /// Toggle an inline format in the active edit session.
    pub fn toggle_format(&mut self, format: Format) -> bool {
        match &mut self.mode {
            InteractionMode::EditingText(session) => {
                session.toggle(format);
                true
            }
            _ => false,
        }
    }

    fn edit_text_key(&mut self, input: &KeyInput) -> bool {
        let InteractionMode::EditingText(session) = &mut self.mode else {
            return false;
        };
        let m = input.modifiers;
        match input.key {
            Key::Backspace => session.backspace(),
            Key::Delete => session.delete_forward(),
            Key::ArrowLeft => session.move_left(m.shift),
            Key::ArrowRight => session.move_right(m.shift),
            // No vertical layout here; up and down go to the line ends.
            Key::ArrowUp | Key::Home => session.move_home(m.shift),
            Key::ArrowDown | Key::End => session.move_end(m.shift),
            Key::Enter => session.insert("\n"),
            Key::Char(c) if m.command() => match c.to_ascii_lowercase() {
                'a' => session.select_all(),
                'b' => session.toggle(Format::Bold),
                'i' => session.toggle(Format::Italic),
                'u' => session.toggle(Format::Underline),
                _ => return false,
            },
            Key::Char(c) => {
                let mut buf = [0u8; 4];
                session.insert(c.encode_utf8(&mut buf));
            }
            Key::Escape | Key::Tab => return false,
        }
        true
    }

    /// Run a command. Returns true when it changed something.
    pub fn execute(&mut self, command: Command) -> bool {
        log::debug!("Command {:?}", command);
        match command {
            Command::Escape => self.escape(),
            Command::Delete => self.delete_selection(),
            Command::Nudge { dx, dy } => self.nudge(dx, dy),
            Command::Copy => self.copy(),
            Command::Cut => self.cut(),
            Command::Paste => self.paste(),
            Command::Undo => self.undo(),
            Command::Redo => self.redo(),
            Command::CycleSelection { forward } => self.cycle_selection(forward),
            Command::SelectAll => self.select_all(),
            Command::Duplicate => self.duplicate_selection(),
            Command::Group => self.group_selection(),
            Command::Ungroup => self.ungroup_selection(),
            Command::Layer(direction) => self.move_selection_layer(direction),
        }
    }

    /// Cancel the gesture, leave any edit mode and clear the selection.
    pub fn escape(&mut self) -> bool {
        let cancelled = self.cancel_gesture();
        let ended = self.end_text_edit().is_some();
        let exited = self.exit_crop_mode();
        let had_selection = !self.selection.is_empty();
        self.set_selection(Vec::new());
        cancelled || ended || exited || had_selection
    }

    /// Delete the selection with its captions. With nothing selected the
    /// active page is deleted, or cleared when it is the only one.
    pub fn delete_selection(&mut self) -> bool {
        if self.selection.is_empty() {
            return self.delete_page(self.active_page);
        }
        self.end_text_edit();
        let ids = self.with_labels(self.selection.ids());
        let removed = self.document.remove_elements(self.active_page, &ids);
        if removed.is_empty() {
            return false;
        }
        if self.crop_target().is_some_and(|id| removed.contains(&id)) {
            self.exit_crop_mode();
        }
        self.prune_selection();
        self.commit(Some("Delete"));
        true
    }

    /// Move the selection by whole nudge steps.
    pub fn nudge(&mut self, dx: i8, dy: i8) -> bool {
        if self.selection.is_empty() || (dx == 0 && dy == 0) {
            return false;
        }
        let step = self.config.interaction.nudge_step;
        let delta = Vec2::new(f64::from(dx) * step, f64::from(dy) * step);
        let ids = self.with_captions(self.selection.ids());
        let guides = self.guides_for(&ids, delta);

        let Some(page) = self.document.page_mut(self.active_page) else {
            return false;
        };
        let mut moved = 0;
        for element in page
            .elements
            .iter_mut()
            .filter(|e| ids.contains(&e.id()) && !e.is_locked())
        {
            element.translate(delta);
            moved += 1;
        }
        if moved == 0 {
            return false;
        }
        self.set_guides(guides);
        self.commit(None);
        true
    }

    /// Copy the selection, or the active page when nothing is selected.
    pub fn copy(&mut self) -> bool {
        let ids = self.with_labels(self.selection.ids());
        let Some(page) = self.document.page(self.active_page) else {
            return false;
        };
        self.clipboard.copy(page, &ids);
        true
    }

    pub fn cut(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        self.end_text_edit();
        self.copy();
        let ids = self.with_labels(self.selection.ids());
        if self.document.remove_elements(self.active_page, &ids).is_empty() {
            return false;
        }
        self.prune_selection();
        self.commit(Some("Cut"));
        true
    }

    /// Paste clipboard elements onto the active page and select exactly
    /// them. Falls back to pasting a copied page after the active one.
    pub fn paste(&mut self) -> bool {
        self.end_text_edit();
        self.exit_crop_mode();
        let page_id = self.active_page;
        if let Some(elements) = self.clipboard.paste_elements(page_id) {
            let ids = self.document.insert_elements(page_id, elements);
            log::info!("Pasted {} element(s)", ids.len());
            self.set_selection(ids);
            self.commit(Some("Paste"));
            return true;
        }
        match self.clipboard.content() {
            Some(ClipboardContent::Page(source)) => self.paste_page(source),
            _ => false,
        }
    }

    fn paste_page(&mut self, source: PageId) -> bool {
        let Some(copy) = self.document.duplicate_page(source) else {
            log::warn!("Copied page {} no longer exists", source);
            return false;
        };
        if let (Some(from), Some(active)) = (self.document.page_index(copy), self.document.page_index(self.active_page))
        {
            let to = if from > active { active + 1 } else { active };
            self.document.move_page(copy, to);
        }
        self.set_selection(Vec::new());
        self.set_active_page_unchecked(copy);
        self.commit(Some("Paste page"));
        true
    }

    pub fn undo(&mut self) -> bool {
        if self.gesture.is_some() {
            return false;
        }
        self.end_text_edit();
        self.exit_crop_mode();
        let now = self.now();
        let Some(entry) = self.history.request_undo_at(now) else {
            return false;
        };
        self.restore(&entry);
        let request = self.history.undo_request_count();
        log::debug!("Undo #{} applied", request);
        self.emit(EditorEvent::UndoApplied { request });
        self.emit_history();
        true
    }

    pub fn redo(&mut self) -> bool {
        if self.gesture.is_some() {
            return false;
        }
        self.end_text_edit();
        self.exit_crop_mode();
        let now = self.now();
        let Some(entry) = self.history.request_redo_at(now) else {
            return false;
        };
        self.restore(&entry);
        let request = self.history.redo_request_count();
        log::debug!("Redo #{} applied", request);
        self.emit(EditorEvent::RedoApplied { request });
        self.emit_history();
        true
    }

    /// Move the single selection through the page in reading order.
    pub fn cycle_selection(&mut self, forward: bool) -> bool {
        let Some(page) = self.active_page() else {
            return false;
        };
        let order = reading_order(&page.elements, self.config.selection.row_tolerance);
        let Some(next) = cycle(&order, self.selection.active(), forward) else {
            return false;
        };
        self.set_selection(vec![next]);
        true
    }

    pub fn select_all(&mut self) -> bool {
        let Some(page) = self.active_page() else {
            return false;
        };
        let ids = selectable_ids(&page.elements);
        if ids.is_empty() {
            return false;
        }
        self.set_selection(ids);
        true
    }

    /// Copy the selection in place, offset like a same-page paste.
    pub fn duplicate_selection(&mut self) -> bool {
        let ids = self.with_labels(self.selection.ids());
        let Some(page) = self.active_page() else {
            return false;
        };
        let sources: Vec<CanvasElement> = page
            .elements
            .iter()
            .filter(|e| ids.contains(&e.id()))
            .cloned()
            .collect();
        if sources.is_empty() {
            return false;
        }
        let offset = self.config.clipboard.paste_offset;
        let mut copies = duplicate_elements(&sources);
        for copy in &mut copies {
            copy.translate(Vec2::new(offset, offset));
        }
        self.end_text_edit();
        let new_ids = self.document.insert_elements(self.active_page, copies);
        self.set_selection(new_ids);
        self.commit(Some("Duplicate"));
        true
    }

    pub fn group_selection(&mut self) -> bool {
        let ids: Vec<ElementId> = self.selection.ids().to_vec();
        if self.document.group_elements(self.active_page, &ids).is_none() {
            return false;
        }
        self.commit(Some("Group"));
        true
    }

    pub fn ungroup_selection(&mut self) -> bool {
        let ids: Vec<ElementId> = self.selection.ids().to_vec();
        if self.document.ungroup_elements(self.active_page, &ids).is_empty() {
            return false;
        }
        self.commit(Some("Ungroup"));
        true
    }

    pub fn move_selection_layer(&mut self, direction: LayerMove) -> bool {
        let ids = self.with_labels(self.selection.ids());
        if ids.is_empty() || !self.document.move_layer(self.active_page, &ids, direction) {
            return false;
        }
        self.commit(Some("Arrange"));
        true
    }
}
